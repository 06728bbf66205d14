//! Success envelope: `{"success": true, "message"?, "data"?}`.

use serde::Serialize;
use utoipa::ToSchema;

use gather_core::Pagination;

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// List payload: a page of items plus pagination metadata.
#[derive(Debug, Serialize, ToSchema)]
pub struct Paged<T: Serialize> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T: Serialize> Paged<T> {
    pub fn new(items: Vec<T>, pagination: Pagination) -> Self {
        Self { items, pagination }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_shape() {
        let response = ApiResponse::data(serde_json::json!({"id": "event_abc123"}));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json.get("success"), Some(&serde_json::Value::Bool(true)));
        assert!(json.get("message").is_none());
        assert!(json.get("data").is_some());
    }

    #[test]
    fn test_message_only_envelope() {
        let response = ApiResponse::message("Event deleted");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json.get("message").and_then(|v| v.as_str()),
            Some("Event deleted")
        );
        assert!(json.get("data").is_none());
    }
}
