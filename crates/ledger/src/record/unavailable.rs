use async_trait::async_trait;
use interface::{ListOptions, NewTransaction, Transaction};

use super::{StoreError, StoreMode, TransactionStore};

/// Connected-mode store whose backend is gone. Every call fails.
pub struct UnavailableStore;

fn unavailable() -> StoreError {
    StoreError::Io("database is unavailable".to_string())
}

#[async_trait]
impl TransactionStore for UnavailableStore {
    fn mode(&self) -> StoreMode {
        StoreMode::Connected
    }

    async fn insert(&self, _owner: &str, _data: &NewTransaction) -> Result<Transaction, StoreError> {
        Err(unavailable())
    }

    async fn find_by_id(&self, _id: &str) -> Result<Option<Transaction>, StoreError> {
        Err(unavailable())
    }

    async fn find(
        &self,
        _owner: Option<&str>,
        _options: &ListOptions,
    ) -> Result<Vec<Transaction>, StoreError> {
        Err(unavailable())
    }
}
