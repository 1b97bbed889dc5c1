//! Campaign service error types.

use serde_json::Value;
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The service could not be reached at all.
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx (or `ok: false`) with a readable message.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// Non-2xx with nothing readable in the body.
    #[error("Campaign service returned {status}")]
    Unreachable { status: u16 },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ClientError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Classify a failed response from its status and raw body.
    pub fn from_response_body(status: u16, body: &str) -> Self {
        match serde_json::from_str::<Value>(body)
            .ok()
            .as_ref()
            .and_then(extract_message)
        {
            Some(message) => Self::Rejected { status, message },
            None => Self::Unreachable { status },
        }
    }

    /// Reachability failure, as opposed to a rejection by the service.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_) | ClientError::Unreachable { .. })
    }

    /// HTTP status, when the service answered.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            ClientError::Rejected { status, .. } | ClientError::Unreachable { status } => {
                Some(*status)
            }
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The single short string shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Transport(e) if e.is_timeout() => {
                "The campaign service took too long to respond".to_string()
            }
            ClientError::Transport(_) => "Unable to reach the campaign service".to_string(),
            ClientError::Rejected { message, .. } => message.clone(),
            ClientError::Unreachable { status } => format!("Request failed ({})", status),
            ClientError::InvalidResponse(_) => {
                "The campaign service sent an unexpected response".to_string()
            }
            ClientError::InvalidInput(msg) => msg.clone(),
            ClientError::Url(e) => format!("Invalid service address: {}", e),
        }
    }
}

/// Pull a human-readable message out of an error payload.
///
/// Looks at `detail`, `error` and `message`, in that order. Each may be a
/// string, an object with its own `message`/`msg`, or a list of such
/// entries (validation errors), which are joined.
pub fn extract_message(payload: &Value) -> Option<String> {
    ["detail", "error", "message"]
        .iter()
        .filter_map(|key| payload.get(*key))
        .find_map(message_from_value)
}

fn message_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Object(map) => ["message", "msg", "detail"]
            .iter()
            .filter_map(|key| map.get(*key))
            .find_map(message_from_value),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(message_from_value).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join("; "))
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detail_string() {
        let err = ClientError::from_response_body(404, r#"{"detail": "Video not found"}"#);
        assert!(matches!(err, ClientError::Rejected { status: 404, .. }));
        assert_eq!(err.user_message(), "Video not found");
        assert!(!err.is_transport());
    }

    #[test]
    fn test_error_key_and_nested_object() {
        assert_eq!(
            extract_message(&json!({"ok": false, "error": "Ad generation failed"})),
            Some("Ad generation failed".to_string())
        );
        assert_eq!(
            extract_message(&json!({"error": {"message": "quota exceeded"}})),
            Some("quota exceeded".to_string())
        );
    }

    #[test]
    fn test_validation_list_is_joined() {
        let payload = json!({"detail": [
            {"loc": ["body", "groupCount"], "msg": "value is not a valid integer"},
            {"loc": ["body", "maxEdits"], "msg": "field required"}
        ]});
        assert_eq!(
            extract_message(&payload),
            Some("value is not a valid integer; field required".to_string())
        );
    }

    #[test]
    fn test_unparseable_body_is_unreachable() {
        let err = ClientError::from_response_body(502, "<html>Bad Gateway</html>");
        assert!(matches!(err, ClientError::Unreachable { status: 502 }));
        assert!(err.is_transport());
        assert_eq!(err.user_message(), "Request failed (502)");
        assert_eq!(err.http_status(), Some(502));
    }

    #[test]
    fn test_blank_message_is_ignored() {
        let err = ClientError::from_response_body(500, r#"{"detail": "   "}"#);
        assert!(matches!(err, ClientError::Unreachable { status: 500 }));
    }
}
