use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::service::TransactionError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Transaction(#[from] TransactionError),

    #[error("Invalid bearer token")]
    InvalidToken,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidToken => StatusCode::UNAUTHORIZED,
            ApiError::Transaction(e) => match e {
                TransactionError::NotAuthenticated => StatusCode::UNAUTHORIZED,
                TransactionError::Unauthorized => StatusCode::FORBIDDEN,
                TransactionError::NotFound(_) => StatusCode::NOT_FOUND,
                TransactionError::Validation(_) => StatusCode::BAD_REQUEST,
                TransactionError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        };

        // store failures stay in the logs
        let message = match &self {
            ApiError::Transaction(TransactionError::Store(_)) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
