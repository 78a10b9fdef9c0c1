use chrono::{DateTime, SecondsFormat, Utc};
use interface::{NewTransaction, Transaction};

use super::StoreError;

/// Build the stored form of a new transaction, applying field defaults.
pub fn build_transaction(
    id: String,
    owner: &str,
    data: &NewTransaction,
    timestamp: DateTime<Utc>,
) -> Transaction {
    Transaction {
        id,
        user_id: owner.to_string(),
        asset: data.asset.clone(),
        transaction_type: data.transaction_type,
        quantity: data.quantity,
        amount: data.amount,
        price: data.price,
        fees: data.fees_or_default(),
        status: data.status_or_default(),
        notes: data.notes_or_default(),
        platform: data.platform_or_default(),
        timestamp: Some(timestamp),
    }
}

/// Fixed width RFC 3339 (UTC, microseconds, `Z`) so that text order is time order.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Inverse of [`format_timestamp`]. Accepts any RFC 3339 offset and normalizes to UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| StoreError::Decode(format!("Failed to parse timestamp {:?}: {}", value, e)))
}

/// Check caller supplied numbers and asset identifiers before anything is written.
pub fn validate_new_transaction(data: &NewTransaction) -> Result<(), String> {
    if data.asset.id.trim().is_empty() {
        return Err("assetId must not be empty".to_string());
    }
    if data.asset.symbol.trim().is_empty() {
        return Err("assetSymbol must not be empty".to_string());
    }

    // fees is optional; the rest are required
    let numbers = [
        ("quantity", Some(data.quantity)),
        ("amount", Some(data.amount)),
        ("price", Some(data.price)),
        ("fees", data.fees),
    ];
    for (name, value) in numbers {
        if let Some(v) = value {
            if !v.is_finite() || v < 0.0 {
                return Err(format!("{} must be a non-negative number, got {}", name, v));
            }
        }
    }

    Ok(())
}
