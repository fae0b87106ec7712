//! Uniform response wrapper of the workflow API

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `{data, success, error}` where `success` holds exactly when `error` is empty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub data: Value,
    pub success: bool,
    pub error: String,
}

impl ResponseEnvelope {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            success: true,
            error: String::new(),
        }
    }

    /// Success without a payload
    pub fn empty() -> Self {
        Self::ok(Value::String(String::new()))
    }

    pub fn failure(error: impl Into<String>) -> Self {
        let mut error = error.into();
        if error.is_empty() {
            error = "Unknown error".to_string();
        }

        Self {
            data: Value::String(String::new()),
            success: false,
            error,
        }
    }
}

/// Always HTTP 200; the outcome is carried in the body
impl IntoResponse for ResponseEnvelope {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[test]
    fn test_success_invariant() {
        let ok = ResponseEnvelope::ok(json!(true));
        assert!(ok.success && ok.error.is_empty());

        let failed = ResponseEnvelope::failure("");
        assert!(!failed.success);
        assert!(!failed.error.is_empty());
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_value(ResponseEnvelope::empty()).unwrap();
        assert_eq!(json, json!({"data": "", "success": true, "error": ""}));
    }

    #[test]
    fn test_failure_is_http_ok() {
        let response = ResponseEnvelope::failure("boom").into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
