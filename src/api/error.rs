use std::fmt;

use http::StatusCode;

/// Failure reported by the catalog backend for one request.
///
/// Keeps the HTTP status so callers can tell validation failures (400) and
/// missing resources (404) apart from everything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code, if the request reached the server
    pub status: Option<StatusCode>,
    /// Message extracted from the response body, or the transport error text
    pub message: String,
    /// Request path, e.g. `/admin/organisations/pk/o1/actions/approved/`
    pub endpoint: String,
}

impl ApiError {
    pub fn new(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
            endpoint: endpoint.into(),
        }
    }

    pub fn with_status(
        endpoint: impl Into<String>,
        status: StatusCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
            endpoint: endpoint.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        self.status == Some(StatusCode::BAD_REQUEST)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(StatusCode::NOT_FOUND)
    }

    /// Pull a human message out of an error body.
    ///
    /// The backend uses `message`, `detail` or `error`; anything else falls
    /// back to the raw text, or to the status reason when the body is empty.
    pub fn message_from_body(status: StatusCode, body: &str) -> String {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
            for field in ["message", "detail", "error"] {
                if let Some(text) = value.get(field).and_then(|v| v.as_str()) {
                    return text.to_string();
                }
            }
        }
        let trimmed = body.trim();
        if trimmed.is_empty() {
            format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )
        } else {
            trimmed.to_string()
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(
                f,
                "{} failed ({}): {}",
                self.endpoint,
                status.as_u16(),
                self.message
            ),
            None => write!(f, "{} failed: {}", self.endpoint, self.message),
        }
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let bad = ApiError::with_status("/x/", StatusCode::BAD_REQUEST, "nope");
        assert!(bad.is_validation());
        assert!(!bad.is_not_found());

        let gone = ApiError::with_status("/x/", StatusCode::NOT_FOUND, "gone");
        assert!(gone.is_not_found());

        let down = ApiError::with_status("/x/", StatusCode::BAD_GATEWAY, "down");
        assert!(!down.is_validation() && !down.is_not_found());

        let offline = ApiError::new("/x/", "connection refused");
        assert!(!offline.is_validation() && !offline.is_not_found());
    }

    #[test]
    fn test_message_from_body_prefers_known_fields() {
        let message = ApiError::message_from_body(
            StatusCode::BAD_REQUEST,
            r#"{"detail": "pin expired"}"#,
        );
        assert_eq!(message, "pin expired");
    }

    #[test]
    fn test_message_from_body_falls_back_to_reason() {
        assert_eq!(
            ApiError::message_from_body(StatusCode::NOT_FOUND, "  "),
            "HTTP 404 Not Found"
        );
        assert_eq!(
            ApiError::message_from_body(StatusCode::BAD_GATEWAY, "upstream timeout"),
            "upstream timeout"
        );
    }

    #[test]
    fn test_display_includes_endpoint_and_status() {
        let err = ApiError::with_status("/organisations/", StatusCode::NOT_FOUND, "missing");
        assert_eq!(err.to_string(), "/organisations/ failed (404): missing");
    }
}
