use axum::{
    extract::{FromRequest, FromRequestParts},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Uniform body returned by every endpoint: `{success, message?, ...payload}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub payload: T,
}

/// Payload for envelopes that carry nothing besides `success`/`message`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Empty {}

impl<T> Envelope<T> {
    pub fn ok(payload: T) -> Self {
        Self { success: true, message: None, payload }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Envelope<Empty> {
    pub fn message(message: impl Into<String>) -> Self {
        Self::ok(Empty {}).with_message(message)
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { success: false, message: Some(message.into()), payload: Empty {} }
    }
}

pub type ApiJson<T> = Json<Envelope<T>>;

/// JSON request body whose rejection is rendered as an envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Query-string parameters; a malformed query is rendered as an envelope too.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct QueryParams<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Count {
        count: u32,
    }

    #[test]
    fn payload_is_flattened_and_message_omitted() {
        let v = serde_json::to_value(Envelope::ok(Count { count: 3 })).unwrap();
        assert_eq!(v, json!({ "success": true, "count": 3 }));
    }

    #[test]
    fn failure_carries_message_only() {
        let v = serde_json::to_value(Envelope::failure("nope")).unwrap();
        assert_eq!(v, json!({ "success": false, "message": "nope" }));
    }
}
