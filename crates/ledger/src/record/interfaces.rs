use async_trait::async_trait;
use interface::{AssetRef, AssetType, ListOptions, NewTransaction, Transaction, TransactionType};
use std::fmt::Display;
use std::str::FromStr;

use super::helpers::parse_timestamp;

/// Which kind of backing store a [`TransactionStore`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreMode {
    /// A real database is configured. Owner checks are enforced.
    Connected,
    /// No database is configured. Records live in process memory only.
    Degraded,
}

impl Display for StoreMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreMode::Connected => write!(f, "connected"),
            StoreMode::Degraded => write!(f, "degraded"),
        }
    }
}

/// Transaction record store.
///
/// The store assigns ids and timestamps; callers never supply either.
/// Records are append-only, there is no update or delete.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    fn mode(&self) -> StoreMode;

    /// Append a record owned by `owner` and return it as stored.
    async fn insert(&self, owner: &str, data: &NewTransaction)
    -> Result<Transaction, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Transaction>, StoreError>;

    /// Records matching `options`, newest first. `owner: None` reads every owner.
    async fn find(
        &self,
        owner: Option<&str>,
        options: &ListOptions,
    ) -> Result<Vec<Transaction>, StoreError>;
}

/// SeaORM transaction_record::Model -> Transaction
impl TryFrom<super::entities::transaction_record::Model> for Transaction {
    type Error = StoreError;

    fn try_from(model: super::entities::transaction_record::Model) -> Result<Self, Self::Error> {
        let timestamp = model.timestamp.as_deref().map(parse_timestamp).transpose()?;

        let asset_type =
            AssetType::from_str(&model.asset_type).map_err(StoreError::Decode)?;
        let transaction_type =
            TransactionType::from_str(&model.transaction_type).map_err(StoreError::Decode)?;

        Ok(Transaction {
            id: model.id,
            user_id: model.user_id,
            asset: AssetRef {
                id: model.asset_id,
                name: model.asset_name,
                symbol: model.asset_symbol,
                asset_type,
            },
            transaction_type,
            quantity: model.quantity,
            amount: model.amount,
            price: model.price,
            fees: model.fees,
            status: model.status,
            notes: model.notes,
            platform: model.platform,
            timestamp,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A stored row could not be turned back into a transaction.
    #[error("Corrupt record: {0}")]
    Decode(String),

    #[error("I/O error: {0}")]
    Io(String),
}
