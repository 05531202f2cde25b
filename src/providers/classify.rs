// file: src/providers/classify.rs
// description: provider failure classification into auth, quota and transient kinds
// reference: https://platform.openai.com/docs/guides/error-codes

use crate::error::{CompletionServiceError, EmbeddingServiceError, ProviderErrorKind};
use serde::Deserialize;

/// Provider failure before it is attributed to the embedding or completion side.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderFailure {
    pub kind: ProviderErrorKind,
    pub message: String,
}

impl ProviderFailure {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn transient(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Transient, message)
    }
}

impl From<ProviderFailure> for EmbeddingServiceError {
    fn from(failure: ProviderFailure) -> Self {
        EmbeddingServiceError::new(failure.kind, failure.message)
    }
}

impl From<ProviderFailure> for CompletionServiceError {
    fn from(failure: ProviderFailure) -> Self {
        CompletionServiceError::new(failure.kind, failure.message)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default, rename = "type")]
    error_type: Option<String>,
    #[serde(default)]
    code: Option<serde_json::Value>,
}

/// Classifies a failed provider call.
///
/// HTTP status wins, then the structured `error.code` / `error.type`, and
/// only then the free-form message text.
pub fn classify_failure(status: Option<u16>, body: &str) -> ProviderFailure {
    let parsed = serde_json::from_str::<ErrorEnvelope>(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|envelope| envelope.error.message.clone())
        .unwrap_or_else(|| body.trim().to_string());
    let message = match status {
        Some(code) => format!("HTTP {}: {}", code, message),
        None => message,
    };

    if let Some(kind) = status.and_then(kind_from_status) {
        return ProviderFailure::new(kind, message);
    }

    if let Some(kind) = parsed.as_ref().and_then(|envelope| kind_from_code(&envelope.error)) {
        return ProviderFailure::new(kind, message);
    }

    let kind = kind_from_message(&message);
    ProviderFailure::new(kind, message)
}

fn kind_from_status(status: u16) -> Option<ProviderErrorKind> {
    match status {
        401 | 403 => Some(ProviderErrorKind::Auth),
        402 | 429 => Some(ProviderErrorKind::Quota),
        _ => None,
    }
}

fn kind_from_code(error: &ErrorBody) -> Option<ProviderErrorKind> {
    let code = error.code.as_ref().map(|value| match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    });

    [code.as_deref(), error.error_type.as_deref()]
        .into_iter()
        .flatten()
        .find_map(|label| match label {
            "invalid_api_key" | "authentication_error" | "permission_denied" => {
                Some(ProviderErrorKind::Auth)
            }
            "insufficient_quota" | "rate_limit_exceeded" | "rate_limit_error"
            | "billing_hard_limit_reached" | "billing_not_active" => Some(ProviderErrorKind::Quota),
            _ => None,
        })
}

fn kind_from_message(message: &str) -> ProviderErrorKind {
    let lower = message.to_lowercase();

    if lower.contains("quota")
        || lower.contains("billing")
        || lower.contains("rate limit")
        || lower.contains("429")
    {
        ProviderErrorKind::Quota
    } else if (lower.contains("invalid") && lower.contains("key")) || lower.contains("401") {
        ProviderErrorKind::Auth
    } else {
        ProviderErrorKind::Transient
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(classify_failure(Some(401), "").kind, ProviderErrorKind::Auth);
        assert_eq!(classify_failure(Some(403), "").kind, ProviderErrorKind::Auth);
        assert_eq!(classify_failure(Some(429), "").kind, ProviderErrorKind::Quota);
        assert_eq!(classify_failure(Some(402), "").kind, ProviderErrorKind::Quota);
        assert_eq!(
            classify_failure(Some(500), "upstream exploded").kind,
            ProviderErrorKind::Transient
        );
    }

    #[test]
    fn test_structured_code_used_when_status_is_ambiguous() {
        let body = r#"{"error":{"message":"You exceeded your current plan","type":"insufficient_quota","code":"insufficient_quota"}}"#;
        let failure = classify_failure(Some(400), body);
        assert_eq!(failure.kind, ProviderErrorKind::Quota);
        assert!(failure.message.contains("You exceeded your current plan"));

        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error","code":"invalid_api_key"}}"#;
        assert_eq!(classify_failure(Some(400), body).kind, ProviderErrorKind::Auth);
    }

    #[test]
    fn test_message_inspection_is_last_resort() {
        assert_eq!(
            classify_failure(None, "monthly quota reached").kind,
            ProviderErrorKind::Quota
        );
        assert_eq!(
            classify_failure(None, "Invalid API key supplied").kind,
            ProviderErrorKind::Auth
        );
        assert_eq!(
            classify_failure(None, "connection reset by peer").kind,
            ProviderErrorKind::Transient
        );
    }

    #[test]
    fn test_failure_converts_to_service_errors() {
        let failure = ProviderFailure::new(ProviderErrorKind::Quota, "429");
        let embedding: EmbeddingServiceError = failure.clone().into();
        let completion: CompletionServiceError = failure.into();
        assert_eq!(embedding.kind, ProviderErrorKind::Quota);
        assert_eq!(completion.kind, ProviderErrorKind::Quota);
    }
}
