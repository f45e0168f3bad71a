//! Error types for the Scorable API client.

use serde_json::Value;

/// Client errors.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The API answered with a status >= 400, or could not be reached at all
    /// (`status_code == 0`).
    #[error("Scorable API error (HTTP {status_code}): {detail}")]
    Api { status_code: u16, detail: String },

    /// The payload did not match the expected shape.
    #[error("Response validation error: {message}")]
    ResponseValidation {
        message: String,
        response_data: Option<Value>,
    },

    /// Anything else (client construction, malformed base URL, ...).
    #[error("{message}")]
    Unexpected { message: String },
}

impl ClientError {
    pub(crate) fn validation(message: impl Into<String>, response_data: Option<Value>) -> Self {
        Self::ResponseValidation {
            message: message.into(),
            response_data,
        }
    }

    /// HTTP status code for API errors (0 for connection failures).
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// Raw payload attached to a validation failure, if any.
    pub fn response_data(&self) -> Option<&Value> {
        match self {
            Self::ResponseValidation { response_data, .. } => response_data.as_ref(),
            _ => None,
        }
    }

    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::Api { status_code: 0, .. })
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Api {
            status_code: 0,
            detail: format!("Connection error: {}", err),
        }
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_carries_status_and_detail() {
        let err = ClientError::Api {
            status_code: 404,
            detail: "not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Scorable API error (HTTP 404): not found"
        );
        assert_eq!(err.status_code(), Some(404));
        assert!(!err.is_connection_error());
    }

    #[test]
    fn validation_error_keeps_payload() {
        let err = ClientError::validation("missing", Some(serde_json::json!({"a": 1})));
        assert_eq!(err.to_string(), "Response validation error: missing");
        assert_eq!(err.response_data(), Some(&serde_json::json!({"a": 1})));
        assert_eq!(err.status_code(), None);
    }
}
