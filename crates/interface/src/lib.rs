use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

pub const DEFAULT_STATUS: &str = "completed";
pub const DEFAULT_PLATFORM: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Stock,
    #[serde(rename = "mf")]
    MutualFund,
    Crypto,
    Bond,
}

impl Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetType::Stock => write!(f, "stock"),
            AssetType::MutualFund => write!(f, "mf"),
            AssetType::Crypto => write!(f, "crypto"),
            AssetType::Bond => write!(f, "bond"),
        }
    }
}

impl FromStr for AssetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stock" => Ok(AssetType::Stock),
            "mf" => Ok(AssetType::MutualFund),
            "crypto" => Ok(AssetType::Crypto),
            "bond" => Ok(AssetType::Bond),
            _ => Err(format!("Invalid AssetType: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Buy,
    Sell,
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Buy => write!(f, "buy"),
            TransactionType::Sell => write!(f, "sell"),
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" => Ok(TransactionType::Buy),
            "sell" => Ok(TransactionType::Sell),
            _ => Err(format!("Invalid TransactionType: {}", s)),
        }
    }
}

/// The asset a transaction refers to. Flattened into the transaction on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRef {
    #[serde(rename = "assetId")]
    pub id: String,
    #[serde(rename = "assetName")]
    pub name: String,
    #[serde(rename = "assetSymbol")]
    pub symbol: String,
    #[serde(rename = "assetType")]
    pub asset_type: AssetType,
}

/// Caller supplied data for a new transaction.
///
/// Optional fields fall back to [`DEFAULT_STATUS`], [`DEFAULT_PLATFORM`],
/// an empty note and zero fees when absent or empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(flatten)]
    pub asset: AssetRef,
    pub transaction_type: TransactionType,
    pub quantity: f64,
    pub amount: f64,
    pub price: f64,
    #[serde(default)]
    pub fees: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
}

impl NewTransaction {
    pub fn new(
        asset: AssetRef,
        transaction_type: TransactionType,
        quantity: f64,
        amount: f64,
        price: f64,
    ) -> Self {
        Self {
            asset,
            transaction_type,
            quantity,
            amount,
            price,
            fees: None,
            status: None,
            notes: None,
            platform: None,
        }
    }

    pub fn fees_or_default(&self) -> f64 {
        self.fees.unwrap_or(0.0)
    }

    pub fn status_or_default(&self) -> String {
        non_empty_or(self.status.as_deref(), DEFAULT_STATUS)
    }

    pub fn notes_or_default(&self) -> String {
        self.notes.clone().unwrap_or_default()
    }

    pub fn platform_or_default(&self) -> String {
        non_empty_or(self.platform.as_deref(), DEFAULT_PLATFORM)
    }
}

fn non_empty_or(value: Option<&str>, fallback: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => fallback.to_string(),
    }
}

/// A stored buy/sell event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    #[serde(flatten)]
    pub asset: AssetRef,
    pub transaction_type: TransactionType,
    pub quantity: f64,
    pub amount: f64,
    pub price: f64,
    pub fees: f64,
    pub status: String,
    pub notes: String,
    pub platform: String,
    /// RFC 3339 on the wire. `None` only for records written without a clock value.
    pub timestamp: Option<DateTime<Utc>>,
}

/// Filters for a transaction history read. All set filters must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOptions {
    #[serde(default)]
    pub asset_type: Option<AssetType>,
    #[serde(default)]
    pub transaction_type: Option<TransactionType>,
    /// `Some(0)` is treated the same as `None`.
    #[serde(default)]
    pub limit: Option<u64>,
}

impl ListOptions {
    pub fn with_limit(limit: u64) -> Self {
        Self {
            limit: Some(limit),
            ..Default::default()
        }
    }

    /// Row cap for a read. Zero means unbounded; anything past `i64::MAX`
    /// (the largest SQL `LIMIT`) is clamped to it.
    pub fn effective_limit(&self) -> Option<u64> {
        self.limit
            .filter(|l| *l > 0)
            .map(|l| l.min(i64::MAX as u64))
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        self.asset_type.is_none_or(|t| tx.asset.asset_type == t)
            && self
                .transaction_type
                .is_none_or(|t| tx.transaction_type == t)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStats {
    pub total_transactions: usize,
    pub total_buy_amount: f64,
    pub total_sell_amount: f64,
    pub net_investment: f64,
}

impl TransactionStats {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let sum_of = |side: TransactionType| -> f64 {
            transactions
                .iter()
                .filter(|tx| tx.transaction_type == side)
                .map(|tx| tx.amount)
                .sum()
        };

        let total_buy_amount = sum_of(TransactionType::Buy);
        let total_sell_amount = sum_of(TransactionType::Sell);

        Self {
            total_transactions: transactions.len(),
            total_buy_amount,
            total_sell_amount,
            net_investment: total_buy_amount - total_sell_amount,
        }
    }
}

/// Dashboard view: the latest transactions plus totals over the whole history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub recent_transactions: Vec<Transaction>,
    pub stats: TransactionStats,
}

/// An authenticated user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub uid: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl Identity {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: None,
            display_name: None,
        }
    }
}
