use std::sync::Arc;

use super::{InMemoryTransactionStore, SqliteTransactionStore, StoreError, TransactionStore};
use crate::config::AppConfig;

/// Pick the transaction store for this process.
///
/// A configured database path gives the connected SQLite store and any
/// connection error is returned. Without one the ledger runs degraded on an
/// in-memory store that is lost on exit.
pub async fn open_store(config: &AppConfig) -> Result<Arc<dyn TransactionStore>, StoreError> {
    match &config.db_path {
        Some(path) => {
            let store = SqliteTransactionStore::open(path).await?;
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!(
                "LEDGER_DB_PATH not set, using in-memory transaction store (records are not persisted)"
            );
            Ok(Arc::new(InMemoryTransactionStore::new()))
        }
    }
}
