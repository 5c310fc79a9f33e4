use crate::error::AdvisorError;
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

impl IntoResponse for AdvisorError {
    fn into_response(self) -> Response {
        let (status, message, detail) = match &self {
            AdvisorError::InvalidInput(msg) => {
                (StatusCode::BAD_REQUEST, "Invalid request", msg.clone())
            }
            AdvisorError::NotFound(msg) => (StatusCode::NOT_FOUND, "Not found", msg.clone()),
            AdvisorError::DataSourceUnavailable(msg) => {
                tracing::warn!("Data source unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Service temporarily unavailable",
                    msg.clone(),
                )
            }
            other => {
                tracing::error!("Request failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "message": message,
            "error": detail,
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for AdvisorError {
    fn from(rejection: JsonRejection) -> Self {
        AdvisorError::invalid(rejection.body_text())
    }
}

impl From<QueryRejection> for AdvisorError {
    fn from(rejection: QueryRejection) -> Self {
        AdvisorError::invalid(rejection.body_text())
    }
}
