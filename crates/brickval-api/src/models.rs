//! API data models

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;

/// JSON-LD graph carried by a request, either as a string or embedded JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GraphPayload {
    Text(String),
    Document(Value),
}

impl GraphPayload {
    /// The JSON-LD text, or `None` when the embedded value cannot be a
    /// JSON-LD document (null, numbers, booleans)
    pub fn as_jsonld(&self) -> Option<Cow<'_, str>> {
        match self {
            GraphPayload::Text(text) => Some(Cow::Borrowed(text.as_str())),
            GraphPayload::Document(value @ (Value::Object(_) | Value::Array(_))) => {
                Some(Cow::Owned(value.to_string()))
            }
            GraphPayload::Document(_) => None,
        }
    }
}

/// Validation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateRequest {
    pub data: GraphPayload,
}

/// Validation response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub valid: bool,
    /// Report graph serialized as JSON-LD
    pub report: String,
}

/// Error body for 4xx and 5xx responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_as_string() {
        let request: ValidateRequest = serde_json::from_str(r#"{"data": "{\"@graph\": []}"}"#).unwrap();
        assert_eq!(request.data.as_jsonld().unwrap(), r#"{"@graph": []}"#);
    }

    #[test]
    fn test_data_as_embedded_document() {
        let request: ValidateRequest = serde_json::from_str(r#"{"data": {"@graph": []}}"#).unwrap();
        assert!(matches!(request.data, GraphPayload::Document(_)));
        assert_eq!(request.data.as_jsonld().unwrap(), r#"{"@graph":[]}"#);
    }

    #[test]
    fn test_scalar_data_is_not_a_document() {
        let request: ValidateRequest = serde_json::from_str(r#"{"data": 42}"#).unwrap();
        assert!(request.data.as_jsonld().is_none());
    }

    #[test]
    fn test_missing_data_is_rejected() {
        assert!(serde_json::from_str::<ValidateRequest>(r#"{"graph": "x"}"#).is_err());
    }
}
