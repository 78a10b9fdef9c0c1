pub mod bootstrap;
pub mod entities;
pub mod helpers;
pub mod interfaces;
pub mod memory;
pub mod sqlite;
#[cfg(test)]
pub(crate) mod unavailable;

pub use bootstrap::open_store;
pub use interfaces::{StoreError, StoreMode, TransactionStore};
pub use memory::InMemoryTransactionStore;
pub use sqlite::SqliteTransactionStore;
