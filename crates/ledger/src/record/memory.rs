use async_trait::async_trait;
use chrono::Utc;
use interface::{ListOptions, NewTransaction, Transaction};
use tokio::sync::RwLock;

use super::helpers::build_transaction;
use super::{StoreError, StoreMode, TransactionStore};

/// Process-local transaction store (degraded mode).
///
/// Append-only; nothing survives a restart. Each instance is independent,
/// so tests and callers own their own copy.
#[derive(Default)]
pub struct InMemoryTransactionStore {
    records: RwLock<Vec<Transaction>>,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    fn mode(&self) -> StoreMode {
        StoreMode::Degraded
    }

    async fn insert(
        &self,
        owner: &str,
        data: &NewTransaction,
    ) -> Result<Transaction, StoreError> {
        let transaction = build_transaction(
            format!("local_{}", uuid::Uuid::new_v4().simple()),
            owner,
            data,
            Utc::now(),
        );

        self.records.write().await.push(transaction.clone());

        Ok(transaction)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Transaction>, StoreError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|tx| tx.id == id).cloned())
    }

    async fn find(
        &self,
        owner: Option<&str>,
        options: &ListOptions,
    ) -> Result<Vec<Transaction>, StoreError> {
        let records = self.records.read().await;

        // newest insert first, then a stable sort keeps that order for equal timestamps
        let mut matched: Vec<Transaction> = records
            .iter()
            .rev()
            .filter(|tx| owner.is_none_or(|o| tx.user_id == o))
            .filter(|tx| options.matches(tx))
            .cloned()
            .collect();
        // untimed rows first, same as the SQLite store
        matched.sort_by(|a, b| {
            b.timestamp
                .is_none()
                .cmp(&a.timestamp.is_none())
                .then_with(|| b.timestamp.cmp(&a.timestamp))
        });

        if let Some(limit) = options.effective_limit() {
            matched.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }

        Ok(matched)
    }
}
