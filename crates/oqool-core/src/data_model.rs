//! Data Model: the JSON envelope every endpoint answers with
use serde::{Deserialize, Serialize};

/// `{success, data?, error?, message?}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T = serde_json::Value> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_data(mut self, data: T) -> Self {
        self.data = Some(data);
        self
    }

    /// Envelope whose `success` mirrors an inner outcome, with data attached.
    pub fn outcome(success: bool, data: T) -> Self {
        Self {
            success,
            data: Some(data),
            error: None,
            message: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_envelope_omits_error() {
        let body = serde_json::to_value(ApiResponse::ok(json!({ "id": 1 }))).unwrap();
        assert_eq!(body, json!({ "success": true, "data": { "id": 1 } }));
    }

    #[test]
    fn test_fail_envelope() {
        let body = serde_json::to_value(ApiResponse::<serde_json::Value>::fail("Name is required")).unwrap();
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"], json!("Name is required"));
        assert!(body.get("data").is_none());
    }
}
