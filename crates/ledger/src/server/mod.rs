pub mod error;
pub mod identity;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use interface::Identity;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::auth::identity_provider;
use crate::record::TransactionStore;
use crate::service::TransactionService;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TransactionStore>,
    pub jwt_secret: Option<Arc<str>>,
}

impl AppState {
    pub fn new(store: Arc<dyn TransactionStore>, jwt_secret: Option<String>) -> Self {
        Self {
            store,
            jwt_secret: jwt_secret.map(Arc::from),
        }
    }

    /// Access layer bound to one request's caller.
    pub fn service_for(&self, identity: Option<Identity>) -> TransactionService {
        TransactionService::new(self.store.clone(), identity_provider(identity))
    }
}

pub fn create_app(state: AppState) -> Router {
    routes::router()
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start_server(port: u16, state: AppState) -> std::io::Result<()> {
    if state.jwt_secret.is_none() {
        warn!("LEDGER_JWT_SECRET not set, every request is treated as anonymous");
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(&addr).await?;
    info!(
        "Ledger API listening on http://{}/ ({} store)",
        addr,
        state.store.mode()
    );

    axum::serve(listener, create_app(state)).await
}
