use async_trait::async_trait;
use chrono::Utc;
use interface::{ListOptions, NewTransaction, Transaction};
use sea_orm::sea_query::{NullOrdering, Order};
use sea_orm::{
    ColumnTrait, ConnectionTrait, Database, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Schema, Set,
};
use std::env;
use std::path::{Path, PathBuf};
use tracing::info;

use super::entities::transaction_record;
use super::helpers::{build_transaction, format_timestamp};
use super::{StoreError, StoreMode, TransactionStore};

/// SQLite backed transaction store (connected mode)
pub struct SqliteTransactionStore {
    db: DatabaseConnection,
}

impl SqliteTransactionStore {
    /// Open (or create) the database file at `db_path` and make sure the
    /// `transactions` table and its indexes exist.
    pub async fn open(db_path: &Path) -> Result<Self, StoreError> {
        // Resolve relative paths against the working directory
        let mut path = PathBuf::from(db_path);
        if !path.is_absolute() {
            if let Ok(current_dir) = env::current_dir() {
                path = current_dir.join(db_path);
            }
        }

        // Make sure the parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Io(format!("Failed to create DB directory: {}", e)))?;
        }

        // mode=rwc creates the file on first open
        let db_url = format!("sqlite://{}?mode=rwc", path.to_string_lossy());
        info!("Connecting to SQLite database: {}", db_url);

        let db = Database::connect(&db_url).await?;

        // Create the table if it doesn't exist
        let backend = db.get_database_backend();
        let schema = Schema::new(backend);

        let mut create_table_stmt = schema.create_table_from_entity(transaction_record::Entity);
        create_table_stmt.if_not_exists();
        db.execute(backend.build(&create_table_stmt)).await?;

        // Indexes for the owner, time and filter columns used by `find`
        use sea_orm::sea_query::Index;

        let indexes = [
            ("idx_transactions_user_id", transaction_record::Column::UserId),
            ("idx_transactions_timestamp", transaction_record::Column::Timestamp),
            ("idx_transactions_asset_type", transaction_record::Column::AssetType),
            (
                "idx_transactions_transaction_type",
                transaction_record::Column::TransactionType,
            ),
        ];

        for (name, column) in indexes {
            let mut idx = Index::create()
                .name(name)
                .table(transaction_record::Entity)
                .col(column)
                .to_owned();
            idx.if_not_exists();

            if let Err(e) = db.execute(backend.build(&idx)).await {
                tracing::debug!("Index {} creation skipped: {}", name, e);
            }
        }

        info!("Transactions table initialized");

        Ok(Self { db })
    }
}

#[async_trait]
impl TransactionStore for SqliteTransactionStore {
    fn mode(&self) -> StoreMode {
        StoreMode::Connected
    }

    async fn insert(
        &self,
        owner: &str,
        data: &NewTransaction,
    ) -> Result<Transaction, StoreError> {
        let transaction = build_transaction(
            uuid::Uuid::new_v4().to_string(),
            owner,
            data,
            Utc::now(),
        );

        let model = transaction_record::ActiveModel {
            id: Set(transaction.id.clone()),
            user_id: Set(transaction.user_id.clone()),
            asset_id: Set(transaction.asset.id.clone()),
            asset_name: Set(transaction.asset.name.clone()),
            asset_symbol: Set(transaction.asset.symbol.clone()),
            asset_type: Set(transaction.asset.asset_type.to_string()),
            transaction_type: Set(transaction.transaction_type.to_string()),
            quantity: Set(transaction.quantity),
            amount: Set(transaction.amount),
            price: Set(transaction.price),
            fees: Set(transaction.fees),
            status: Set(transaction.status.clone()),
            notes: Set(transaction.notes.clone()),
            platform: Set(transaction.platform.clone()),
            timestamp: Set(transaction.timestamp.map(format_timestamp)),
        };

        transaction_record::Entity::insert(model)
            .exec(&self.db)
            .await?;

        Ok(transaction)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Transaction>, StoreError> {
        let model = transaction_record::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?;

        match model {
            Some(m) => Ok(Some(m.try_into()?)),
            None => Ok(None),
        }
    }

    async fn find(
        &self,
        owner: Option<&str>,
        options: &ListOptions,
    ) -> Result<Vec<Transaction>, StoreError> {
        let mut query = transaction_record::Entity::find();

        // Equality filters; every one that is set must match
        if let Some(owner) = owner {
            query = query.filter(transaction_record::Column::UserId.eq(owner));
        }
        if let Some(asset_type) = options.asset_type {
            query = query.filter(transaction_record::Column::AssetType.eq(asset_type.to_string()));
        }
        if let Some(transaction_type) = options.transaction_type {
            query = query.filter(
                transaction_record::Column::TransactionType.eq(transaction_type.to_string()),
            );
        }

        // Newest first. Rows without a stored time are read as "now" by the
        // service, so they lead the list.
        let mut query = query.order_by_with_nulls(
            transaction_record::Column::Timestamp,
            Order::Desc,
            NullOrdering::First,
        );

        if let Some(limit_val) = options.effective_limit() {
            query = query.limit(limit_val);
        }

        let models = query.all(&self.db).await?;

        // Decode rows; one corrupt row fails the whole read
        models.into_iter().map(|m| m.try_into()).collect()
    }
}

#[cfg(test)]
impl SqliteTransactionStore {
    /// Write a row the way older clients did, without a timestamp.
    pub(crate) async fn insert_untimed(&self, id: &str, owner: &str) -> Result<(), StoreError> {
        let legacy = transaction_record::ActiveModel {
            id: Set(id.to_string()),
            user_id: Set(owner.to_string()),
            asset_id: Set("asset-1".to_string()),
            asset_name: Set("Asset One".to_string()),
            asset_symbol: Set("ONE".to_string()),
            asset_type: Set("stock".to_string()),
            transaction_type: Set("sell".to_string()),
            quantity: Set(1.0),
            amount: Set(5.0),
            price: Set(5.0),
            fees: Set(0.0),
            status: Set("completed".to_string()),
            notes: Set(String::new()),
            platform: Set("default".to_string()),
            timestamp: Set(None),
        };
        transaction_record::Entity::insert(legacy)
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
