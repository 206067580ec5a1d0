use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockroom_infra::RepositoryError;

pub fn repository_error_to_response(err: RepositoryError) -> axum::response::Response {
    let message = err.to_string();
    match err {
        RepositoryError::Invalid(_) => json_error(StatusCode::BAD_REQUEST, message),
        RepositoryError::DuplicateKey { sku } => {
            tracing::debug!(%sku, "duplicate sku rejected");
            json_error(StatusCode::BAD_REQUEST, message)
        }
        RepositoryError::NotFound => json_error(StatusCode::NOT_FOUND, message),
        RepositoryError::Store(_) => {
            tracing::error!(error = %message, "store operation failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, message)
        }
    }
}

/// Handled failure: `{ "error": <message> }`.
pub fn json_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (status, axum::Json(json!({ "error": message.into() }))).into_response()
}

/// Request-level fault outside a handler: `{ "error": { "message", "status" } }`.
pub fn fault(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": {
                "message": message.into(),
                "status": status.as_u16(),
            }
        })),
    )
        .into_response()
}

/// Unreadable request bodies are client errors, whatever axum's own status.
pub fn json_rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    tracing::debug!(error = %rejection.body_text(), "rejected request body");
    fault(StatusCode::BAD_REQUEST, rejection.body_text())
}

pub fn query_rejection_to_response(rejection: QueryRejection) -> axum::response::Response {
    tracing::debug!(error = %rejection.body_text(), "rejected query string");
    fault(StatusCode::BAD_REQUEST, rejection.body_text())
}
