use std::path::PathBuf;

pub const DEFAULT_API_PORT: u16 = 12091;
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Process configuration, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// SQLite file. `None` runs the ledger on the in-memory store.
    pub db_path: Option<PathBuf>,
    pub api_port: u16,
    /// HS256 secret for bearer tokens. Without it every request is anonymous.
    pub jwt_secret: Option<String>,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            api_port: DEFAULT_API_PORT,
            jwt_secret: None,
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            db_path: get("LEDGER_DB_PATH").map(PathBuf::from),
            api_port: get("LEDGER_API_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.api_port),
            jwt_secret: get("LEDGER_JWT_SECRET"),
            log_dir: get("LEDGER_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            log_level: get("RUST_LOG").unwrap_or(defaults.log_level),
        }
    }
}
