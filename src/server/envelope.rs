//! The uniform `{code, message, data}` response wrapper.
//!
//! Every endpoint except `/health` answers with this envelope: code 0 with a
//! payload on success, code 1 with a human-readable message and null data on
//! any failure. There is deliberately no finer-grained error taxonomy.

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub code: u8,
    pub message: String,
    pub data: Option<Value>,
}

impl Envelope {
    pub fn ok(data: Value) -> Self {
        Self {
            code: 0,
            message: "Success".to_string(),
            data: Some(data),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            code: 1,
            message: message.into(),
            data: None,
        }
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_envelope_carries_payload() {
        let envelope = Envelope::ok(json!({"answer": 42}));
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["code"], 0);
        assert_eq!(value["message"], "Success");
        assert_eq!(value["data"]["answer"], 42);
    }

    #[test]
    fn error_envelope_has_null_data() {
        let envelope = Envelope::error("No weather station found");
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["code"], 1);
        assert!(value["data"].is_null());
    }
}
