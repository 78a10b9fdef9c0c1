//! Transaction access layer.
//!
//! Reads and writes go through an injected [`TransactionStore`]; the caller's
//! identity comes from an injected [`IdentityProvider`]. How strictly identity
//! and ownership are enforced follows the store's [`StoreMode`]:
//!
//! * `Connected`: every call needs a signed-in user, reads are scoped to that
//!   user and foreign records are refused.
//! * `Degraded`: the in-memory store is a single-user scratch pad. Writes fall
//!   back to [`LOCAL_USER_ID`] when nobody is signed in, reads see every
//!   record and no ownership check is made.

use std::sync::Arc;

use chrono::Utc;
use interface::{ListOptions, NewTransaction, ReportSummary, Transaction, TransactionStats};
use tracing::{debug, error};

use crate::auth::IdentityProvider;
use crate::record::helpers::validate_new_transaction;
use crate::record::{StoreError, StoreMode, TransactionStore};

/// Owner recorded on degraded-mode writes when nobody is signed in.
pub const LOCAL_USER_ID: &str = "mock_user";

/// Number of rows on the reports dashboard.
pub const RECENT_TRANSACTIONS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    #[error("User not authenticated")]
    NotAuthenticated,

    #[error("Transaction not found: {0}")]
    NotFound(String),

    #[error("Unauthorized access to transaction")]
    Unauthorized,

    #[error("Invalid transaction: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone)]
pub struct TransactionService {
    store: Arc<dyn TransactionStore>,
    identity: Arc<dyn IdentityProvider>,
}

impl TransactionService {
    pub fn new(store: Arc<dyn TransactionStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { store, identity }
    }

    pub fn mode(&self) -> StoreMode {
        self.store.mode()
    }

    /// Record a new buy or sell for the signed-in user.
    pub async fn record(&self, data: NewTransaction) -> Result<Transaction, TransactionError> {
        let result = async {
            validate_new_transaction(&data).map_err(TransactionError::Validation)?;
            let owner = self.writer_uid()?;
            Ok::<_, TransactionError>(self.store.insert(&owner, &data).await?)
        }
        .await;

        result.inspect_err(|e| error!("Failed to record transaction: {}", e))
    }

    /// Transaction history, most recent first.
    pub async fn list_for_user(
        &self,
        options: &ListOptions,
    ) -> Result<Vec<Transaction>, TransactionError> {
        let result = async {
            let owner = self.reader_uid()?;
            let mut transactions = self.store.find(owner.as_deref(), options).await?;

            // history rows always carry a time; legacy rows get the read time
            let now = Utc::now();
            for tx in transactions.iter_mut().filter(|tx| tx.timestamp.is_none()) {
                tx.timestamp = Some(now);
            }

            Ok::<_, TransactionError>(transactions)
        }
        .await;

        result.inspect_err(|e| error!("Failed to fetch transactions: {}", e))
    }

    pub async fn get_by_id(&self, transaction_id: &str) -> Result<Transaction, TransactionError> {
        let result = async {
            let owner = self.reader_uid()?;

            let transaction = self
                .store
                .find_by_id(transaction_id)
                .await?
                .ok_or_else(|| TransactionError::NotFound(transaction_id.to_string()))?;

            if let Some(owner) = owner {
                if transaction.user_id != owner {
                    return Err(TransactionError::Unauthorized);
                }
            }

            Ok::<_, TransactionError>(transaction)
        }
        .await;

        result.inspect_err(|e| error!("Failed to fetch transaction: {}", e))
    }

    /// Buy/sell totals over the caller's whole history.
    pub async fn get_stats(&self) -> Result<TransactionStats, TransactionError> {
        let result = async {
            let owner = self.reader_uid()?;
            let transactions = self
                .store
                .find(owner.as_deref(), &ListOptions::default())
                .await?;

            Ok::<_, TransactionError>(TransactionStats::from_transactions(&transactions))
        }
        .await;

        result.inspect_err(|e| error!("Failed to get transaction statistics: {}", e))
    }

    /// Latest `limit` transactions plus overall stats, for the reports dashboard.
    ///
    /// Failures are already logged by the call that hit them.
    pub async fn recent(&self, limit: u64) -> Result<ReportSummary, TransactionError> {
        let recent_transactions = self.list_for_user(&ListOptions::with_limit(limit)).await?;
        let stats = self.get_stats().await?;

        Ok(ReportSummary {
            recent_transactions,
            stats,
        })
    }

    fn writer_uid(&self) -> Result<String, TransactionError> {
        match (self.store.mode(), self.identity.current_user()) {
            (_, Some(identity)) => Ok(identity.uid),
            (StoreMode::Degraded, None) => {
                debug!("No signed-in user, recording as {}", LOCAL_USER_ID);
                Ok(LOCAL_USER_ID.to_string())
            }
            (StoreMode::Connected, None) => Err(TransactionError::NotAuthenticated),
        }
    }

    /// Owner to scope reads to. `None` means unscoped (degraded mode only).
    fn reader_uid(&self) -> Result<Option<String>, TransactionError> {
        match self.store.mode() {
            StoreMode::Degraded => Ok(None),
            StoreMode::Connected => self
                .identity
                .current_user()
                .map(|identity| Some(identity.uid))
                .ok_or(TransactionError::NotAuthenticated),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{identity_provider, Anonymous, SessionIdentity};
    use crate::record::unavailable::UnavailableStore;
    use crate::record::{InMemoryTransactionStore, SqliteTransactionStore};
    use chrono::DateTime;
    use interface::{AssetRef, AssetType, Identity, TransactionType};
    use tempfile::TempDir;

    async fn sqlite_store() -> (TempDir, Arc<dyn TransactionStore>) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteTransactionStore::open(&dir.path().join("ledger.db"))
            .await
            .unwrap();
        (dir, Arc::new(store))
    }

    fn as_user(store: &Arc<dyn TransactionStore>, uid: &str) -> TransactionService {
        TransactionService::new(store.clone(), identity_provider(Some(Identity::new(uid))))
    }

    fn anonymous(store: &Arc<dyn TransactionStore>) -> TransactionService {
        TransactionService::new(store.clone(), Arc::new(Anonymous))
    }

    fn data(asset_type: AssetType, side: TransactionType, amount: f64) -> NewTransaction {
        NewTransaction::new(
            AssetRef {
                id: "msft".to_string(),
                name: "Microsoft".to_string(),
                symbol: "MSFT".to_string(),
                asset_type,
            },
            side,
            2.0,
            amount,
            amount / 2.0,
        )
    }

    async fn record_scenario(service: &TransactionService) {
        for amount in [1000.0, 2000.0, 1500.0] {
            service
                .record(data(AssetType::Stock, TransactionType::Buy, amount))
                .await
                .unwrap();
        }
        service
            .record(data(AssetType::Stock, TransactionType::Sell, 500.0))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_record_echoes_input() {
        let (_dir, store) = sqlite_store().await;
        let service = as_user(&store, "alice");

        let mut input = data(AssetType::Crypto, TransactionType::Sell, 640.0);
        input.fees = Some(1.25);
        input.platform = Some("coinbase".to_string());
        let tx = service.record(input.clone()).await.unwrap();

        assert!(!tx.id.is_empty());
        assert_eq!(tx.user_id, "alice");
        assert_eq!(tx.asset, input.asset);
        assert_eq!(tx.transaction_type, TransactionType::Sell);
        assert_eq!(tx.amount, 640.0);
        assert_eq!(tx.quantity, 2.0);
        assert_eq!(tx.price, 320.0);
        assert_eq!(tx.fees, 1.25);
        assert_eq!(tx.platform, "coinbase");
        assert_eq!(tx.status, "completed");

        let json = serde_json::to_value(&tx).unwrap();
        assert!(DateTime::parse_from_rfc3339(json["timestamp"].as_str().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn test_connected_mode_requires_identity() {
        let (_dir, store) = sqlite_store().await;
        let service = anonymous(&store);

        assert!(matches!(
            service
                .record(data(AssetType::Stock, TransactionType::Buy, 1.0))
                .await,
            Err(TransactionError::NotAuthenticated)
        ));
        assert!(matches!(
            service.list_for_user(&ListOptions::default()).await,
            Err(TransactionError::NotAuthenticated)
        ));
        assert!(matches!(
            service.get_by_id("anything").await,
            Err(TransactionError::NotAuthenticated)
        ));
        assert!(matches!(
            service.get_stats().await,
            Err(TransactionError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn test_invalid_input_rejected_before_write() {
        let (_dir, store) = sqlite_store().await;
        let service = as_user(&store, "alice");

        let mut input = data(AssetType::Stock, TransactionType::Buy, 10.0);
        input.quantity = f64::INFINITY;
        assert!(matches!(
            service.record(input).await,
            Err(TransactionError::Validation(_))
        ));
        assert!(service
            .list_for_user(&ListOptions::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_scoped() {
        let (_dir, store) = sqlite_store().await;
        let alice = as_user(&store, "alice");
        let bob = as_user(&store, "bob");

        record_scenario(&alice).await;
        bob.record(data(AssetType::Bond, TransactionType::Buy, 99.0))
            .await
            .unwrap();

        let history = alice.list_for_user(&ListOptions::default()).await.unwrap();
        assert_eq!(history.len(), 4);
        assert!(history.iter().all(|tx| tx.user_id == "alice"));
        for pair in history.windows(2) {
            assert!(pair[0].timestamp >= pair[1].timestamp);
        }
    }

    #[tokio::test]
    async fn test_list_filters_and_limit() {
        let (_dir, store) = sqlite_store().await;
        let service = as_user(&store, "alice");

        record_scenario(&service).await;
        service
            .record(data(AssetType::Crypto, TransactionType::Buy, 10.0))
            .await
            .unwrap();

        let buys = service
            .list_for_user(&ListOptions {
                transaction_type: Some(TransactionType::Buy),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(buys.len(), 4);
        assert!(buys
            .iter()
            .all(|tx| tx.transaction_type == TransactionType::Buy));

        let stock_buys = service
            .list_for_user(&ListOptions {
                asset_type: Some(AssetType::Stock),
                transaction_type: Some(TransactionType::Buy),
                limit: None,
            })
            .await
            .unwrap();
        assert_eq!(stock_buys.len(), 3);

        let limited = service
            .list_for_user(&ListOptions::with_limit(3))
            .await
            .unwrap();
        assert_eq!(limited.len(), 3);
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_and_unauthorized() {
        let (_dir, store) = sqlite_store().await;
        let alice = as_user(&store, "alice");
        let bob = as_user(&store, "bob");

        let tx = alice
            .record(data(AssetType::Stock, TransactionType::Buy, 5.0))
            .await
            .unwrap();

        assert_eq!(alice.get_by_id(&tx.id).await.unwrap().id, tx.id);
        assert!(matches!(
            alice.get_by_id("does-not-exist").await,
            Err(TransactionError::NotFound(id)) if id == "does-not-exist"
        ));
        assert!(matches!(
            bob.get_by_id(&tx.id).await,
            Err(TransactionError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_stats_scenario_connected() {
        let (_dir, store) = sqlite_store().await;
        let service = as_user(&store, "alice");
        record_scenario(&service).await;

        let stats = service.get_stats().await.unwrap();
        assert_eq!(
            stats,
            TransactionStats {
                total_transactions: 4,
                total_buy_amount: 4500.0,
                total_sell_amount: 500.0,
                net_investment: 4000.0,
            }
        );
    }

    #[tokio::test]
    async fn test_stats_scenario_degraded() {
        let store: Arc<dyn TransactionStore> = Arc::new(InMemoryTransactionStore::new());
        let service = anonymous(&store);
        record_scenario(&service).await;

        let stats = service.get_stats().await.unwrap();
        assert_eq!(stats.total_transactions, 4);
        assert_eq!(stats.net_investment, 4000.0);
        assert_eq!(
            stats.net_investment,
            stats.total_buy_amount - stats.total_sell_amount
        );
    }

    #[tokio::test]
    async fn test_degraded_mode_is_relaxed() {
        let store: Arc<dyn TransactionStore> = Arc::new(InMemoryTransactionStore::new());
        let nobody = anonymous(&store);
        let alice = as_user(&store, "alice");
        assert_eq!(nobody.mode(), StoreMode::Degraded);

        let local = nobody
            .record(data(AssetType::Stock, TransactionType::Buy, 1.0))
            .await
            .unwrap();
        assert_eq!(local.user_id, LOCAL_USER_ID);

        let mine = alice
            .record(data(AssetType::Bond, TransactionType::Sell, 2.0))
            .await
            .unwrap();
        assert_eq!(mine.user_id, "alice");

        // no ownership check, every record visible
        assert_eq!(nobody.get_by_id(&mine.id).await.unwrap().id, mine.id);
        assert_eq!(
            alice
                .list_for_user(&ListOptions::default())
                .await
                .unwrap()
                .len(),
            2
        );

        // filters still apply
        let sells = nobody
            .list_for_user(&ListOptions {
                transaction_type: Some(TransactionType::Sell),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(sells.len(), 1);

        assert!(matches!(
            nobody.get_by_id("missing").await,
            Err(TransactionError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_session_identity_drives_service() {
        let (_dir, store) = sqlite_store().await;
        let session = Arc::new(SessionIdentity::new());
        let service = TransactionService::new(store, session.clone());

        assert!(matches!(
            service.get_stats().await,
            Err(TransactionError::NotAuthenticated)
        ));

        session.bind(Identity::new("carol"));
        let tx = service
            .record(data(AssetType::MutualFund, TransactionType::Buy, 300.0))
            .await
            .unwrap();
        assert_eq!(tx.user_id, "carol");
    }

    #[tokio::test]
    async fn test_recent_summary() {
        let store: Arc<dyn TransactionStore> = Arc::new(InMemoryTransactionStore::new());
        let service = anonymous(&store);
        for i in 0..12 {
            service
                .record(data(AssetType::Stock, TransactionType::Buy, i as f64))
                .await
                .unwrap();
        }

        let summary = service.recent(RECENT_TRANSACTIONS).await.unwrap();
        assert_eq!(summary.recent_transactions.len(), 10);
        assert_eq!(summary.recent_transactions[0].amount, 11.0);
        assert_eq!(summary.stats.total_transactions, 12);
    }

    #[tokio::test]
    async fn test_huge_limit_is_not_a_panic() {
        let (_dir, store) = sqlite_store().await;
        let service = as_user(&store, "alice");
        record_scenario(&service).await;

        let history = service
            .list_for_user(&ListOptions::with_limit(u64::MAX))
            .await
            .unwrap();
        assert_eq!(history.len(), 4);
    }

    #[tokio::test]
    async fn test_untimed_rows_keep_history_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let sqlite = Arc::new(
            SqliteTransactionStore::open(&dir.path().join("ledger.db"))
                .await
                .unwrap(),
        );
        let store: Arc<dyn TransactionStore> = sqlite.clone();
        let service = as_user(&store, "alice");

        for amount in [10.0, 20.0] {
            service
                .record(data(AssetType::Stock, TransactionType::Buy, amount))
                .await
                .unwrap();
        }
        sqlite.insert_untimed("legacy", "alice").await.unwrap();

        let history = service.list_for_user(&ListOptions::default()).await.unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].id, "legacy");
        assert!(history.iter().all(|tx| tx.timestamp.is_some()));
        for pair in history.windows(2) {
            assert!(pair[0].timestamp >= pair[1].timestamp);
        }
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let store: Arc<dyn TransactionStore> = Arc::new(UnavailableStore);
        let service = as_user(&store, "alice");

        assert!(matches!(
            service.get_stats().await,
            Err(TransactionError::Store(StoreError::Io(_)))
        ));
        assert!(matches!(
            service.recent(RECENT_TRANSACTIONS).await,
            Err(TransactionError::Store(_))
        ));
        assert!(matches!(
            service
                .record(data(AssetType::Stock, TransactionType::Buy, 1.0))
                .await,
            Err(TransactionError::Store(_))
        ));
        assert!(matches!(
            service.get_by_id("any").await,
            Err(TransactionError::Store(_))
        ));
    }
}
