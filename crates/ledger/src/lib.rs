pub mod auth;
pub mod config;
pub mod logger;
pub mod record;
pub mod server;
pub mod service;

pub use config::AppConfig;
pub use service::{TransactionError, TransactionService};
