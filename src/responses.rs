use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

pub const JSON_MIMETYPE: &str = "application/json";

/// Envelope every connector command resolves to. `status` doubles as the
/// HTTP status of the hosting route.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    pub response: Value,
    pub status: u16,
    pub mimetype: &'static str,
}

impl ExecutionResult {
    pub fn ok(response: Value) -> Self {
        Self {
            response,
            status: 200,
            mimetype: JSON_MIMETYPE,
        }
    }

    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            response: json!({ "error": message.into() }),
            status,
            mimetype: JSON_MIMETYPE,
        }
    }
}

impl IntoResponse for ExecutionResult {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.response)).into_response()
    }
}
