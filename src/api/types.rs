//! API request and response types for the Generative Language service.

use serde::{Deserialize, Serialize};

// ============================================================================
// generateContent
// ============================================================================

/// A text part of a content block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// A content block (one turn)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// generateContent request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    pub fn user_text(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        }
    }
}

/// A single candidate reply
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token accounting returned with each reply
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u64,
    #[serde(default)]
    pub candidates_token_count: u64,
}

/// generateContent response body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Error body returned on non-2xx responses
#[derive(Debug, Deserialize)]
pub(super) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorBody {
    #[serde(default)]
    pub message: String,
}

// ============================================================================
// API Status Codes
// ============================================================================

/// Coarse classification of HTTP failures from the generation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStatus {
    Ok,
    /// Malformed request or unknown argument
    InvalidArgument,
    /// Missing or rejected API key
    Unauthenticated,
    /// Key valid but not allowed to use the model
    PermissionDenied,
    /// Unknown model or endpoint
    NotFound,
    /// Quota or rate limit exceeded
    ResourceExhausted,
    /// Upstream timeout
    DeadlineExceeded,
    /// Service error (5xx)
    Unavailable,
    Unknown,
}

impl ApiStatus {
    /// Convert from HTTP status code to internal API status
    pub fn from_http_status(http_status: u16) -> Self {
        match http_status {
            200..=299 => ApiStatus::Ok,
            400 => ApiStatus::InvalidArgument,
            401 => ApiStatus::Unauthenticated,
            403 => ApiStatus::PermissionDenied,
            404 => ApiStatus::NotFound,
            429 => ApiStatus::ResourceExhausted,
            504 => ApiStatus::DeadlineExceeded,
            500..=599 => ApiStatus::Unavailable,
            _ => ApiStatus::Unknown,
        }
    }

    /// Check if this error needs user action before any call can succeed
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ApiStatus::Unauthenticated | ApiStatus::PermissionDenied | ApiStatus::NotFound
        )
    }

    pub fn error_message(&self) -> &'static str {
        match self {
            ApiStatus::Ok => "Success",
            ApiStatus::InvalidArgument => "Invalid request",
            ApiStatus::Unauthenticated => "API key missing or invalid",
            ApiStatus::PermissionDenied => "API key is not allowed to use this model",
            ApiStatus::NotFound => "Model or endpoint not found",
            ApiStatus::ResourceExhausted => "Rate limit exceeded. Please wait and try again",
            ApiStatus::DeadlineExceeded => "Request timed out",
            ApiStatus::Unavailable => "Service temporarily unavailable",
            ApiStatus::Unknown => "Unknown error occurred",
        }
    }
}

impl std::fmt::Display for ApiStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error_message())
    }
}

// ============================================================================
// API Error Type
// ============================================================================

/// API error with status code and details.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub status: ApiStatus,
    pub http_status: u16,
    pub message: String,
    /// Request ID (for debugging)
    pub request_id: Option<String>,
}

impl ApiError {
    /// Create from HTTP status code and response body
    pub fn from_http_response(http_status: u16, body: &str, request_id: Option<String>) -> Self {
        let status = ApiStatus::from_http_status(http_status);

        let detail = serde_json::from_str::<ErrorEnvelope>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.trim().to_string());

        let message = match status {
            ApiStatus::Unauthenticated | ApiStatus::PermissionDenied => format!(
                "{} (HTTP {}). Run 'qe-suite login' to update your API key.",
                status.error_message(),
                http_status
            ),
            ApiStatus::ResourceExhausted => format!(
                "Rate limit exceeded (HTTP {}). Please wait and try again.",
                http_status
            ),
            _ if detail.is_empty() => format!(
                "API error (HTTP {}): {}",
                http_status,
                status.error_message()
            ),
            _ => format!("API error (HTTP {}): {}", http_status, detail),
        };

        Self {
            status,
            http_status,
            message,
            request_id,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.status.is_fatal()
    }

    /// Get a hint message for the user
    pub fn user_hint(&self) -> &'static str {
        match self.status {
            ApiStatus::Unauthenticated | ApiStatus::PermissionDenied => {
                "Run 'qe-suite login' or set GEMINI_API_KEY"
            }
            ApiStatus::NotFound => "Check the configured model name",
            ApiStatus::ResourceExhausted => "Wait a moment before generating again",
            _ => "Try again later",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiStatus::from_http_status(200), ApiStatus::Ok);
        assert_eq!(ApiStatus::from_http_status(403), ApiStatus::PermissionDenied);
        assert_eq!(ApiStatus::from_http_status(429), ApiStatus::ResourceExhausted);
        assert_eq!(ApiStatus::from_http_status(503), ApiStatus::Unavailable);
        assert_eq!(ApiStatus::from_http_status(504), ApiStatus::DeadlineExceeded);
        assert!(ApiStatus::Unauthenticated.is_fatal());
        assert!(!ApiStatus::Unavailable.is_fatal());
    }

    #[test]
    fn test_error_uses_service_message() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}}"#;
        let err = ApiError::from_http_response(400, body, None);
        assert_eq!(err.status, ApiStatus::InvalidArgument);
        assert_eq!(err.to_string(), "API error (HTTP 400): API key not valid");
    }

    #[test]
    fn test_auth_error_points_to_login() {
        let err = ApiError::from_http_response(401, "", Some("req-1".to_string()));
        assert!(err.is_fatal());
        assert!(err.to_string().contains("qe-suite login"));
        assert_eq!(err.request_id.as_deref(), Some("req-1"));
    }

    #[test]
    fn test_response_text_joins_parts() {
        let json = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "// FILE: A.java\n"}, {"text": "class A{}"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 5}
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text().as_deref(), Some("// FILE: A.java\nclass A{}"));
        assert_eq!(response.usage_metadata.unwrap().candidates_token_count, 5);
    }

    #[test]
    fn test_empty_candidates_have_no_text() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(response.text().is_none());
    }
}
