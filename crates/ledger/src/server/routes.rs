use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use interface::{ListOptions, NewTransaction, ReportSummary, Transaction, TransactionStats};
use serde::Serialize;
use tracing::info;

use super::error::ApiError;
use super::identity::Caller;
use super::AppState;
use crate::record::StoreMode;
use crate::service::RECENT_TRANSACTIONS;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/transactions", get(list_transactions).post(record_transaction))
        .route("/transactions/stats", get(get_stats))
        .route("/transactions/:id", get(get_transaction))
        .route("/reports/summary", get(report_summary))
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    mode: StoreMode,
}

async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        mode: state.store.mode(),
    })
}

async fn record_transaction(
    State(state): State<AppState>,
    Caller(identity): Caller,
    Json(data): Json<NewTransaction>,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    info!(
        "POST /transactions - {} {} {}",
        data.transaction_type, data.quantity, data.asset.symbol
    );

    let transaction = state.service_for(identity).record(data).await?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

async fn list_transactions(
    State(state): State<AppState>,
    Caller(identity): Caller,
    Query(options): Query<ListOptions>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    info!("GET /transactions - {:?}", options);

    let transactions = state.service_for(identity).list_for_user(&options).await?;

    Ok(Json(transactions))
}

async fn get_transaction(
    State(state): State<AppState>,
    Caller(identity): Caller,
    Path(id): Path<String>,
) -> Result<Json<Transaction>, ApiError> {
    info!("GET /transactions/{}", id);

    let transaction = state.service_for(identity).get_by_id(&id).await?;

    Ok(Json(transaction))
}

async fn get_stats(
    State(state): State<AppState>,
    Caller(identity): Caller,
) -> Result<Json<TransactionStats>, ApiError> {
    let stats = state.service_for(identity).get_stats().await?;

    Ok(Json(stats))
}

async fn report_summary(
    State(state): State<AppState>,
    Caller(identity): Caller,
) -> Result<Json<ReportSummary>, ApiError> {
    let summary = state
        .service_for(identity)
        .recent(RECENT_TRANSACTIONS)
        .await?;

    Ok(Json(summary))
}
