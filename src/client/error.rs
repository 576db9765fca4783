//! Generation failure taxonomy and user-facing message translation

use thiserror::Error;

/// Classified failure from the generation provider.
///
/// `RateLimited` and `Overloaded` are transient and eligible for retry;
/// everything else fails immediately.
#[derive(Debug, Clone, Error)]
pub enum GenerateError {
    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("service overloaded: {0}")]
    Overloaded(String),

    #[error("blocked by safety policy: {0}")]
    SafetyBlocked(String),

    #[error("{0}")]
    Other(String),
}

impl GenerateError {
    /// Transient failures are retried with backoff; the rest are terminal
    pub fn is_transient(&self) -> bool {
        matches!(self, GenerateError::RateLimited(_) | GenerateError::Overloaded(_))
    }

    /// Translated, user-facing message keyed by failure category
    pub fn user_message(&self) -> String {
        match self {
            GenerateError::RateLimited(_) => {
                "⚠️ 사용량 한도(Quota)를 초과했습니다. 1분 정도 기다린 후 다시 시도해주세요. (Code 429)"
                    .to_string()
            }
            GenerateError::Overloaded(_) => {
                "⚠️ 서비스가 일시적으로 혼잡합니다. 잠시 후 다시 시도해주세요. (Code 503)".to_string()
            }
            GenerateError::SafetyBlocked(_) => {
                "⚠️ 안전 정책에 의해 콘텐츠 생성이 차단되었습니다.".to_string()
            }
            GenerateError::Other(msg) => format!("오류 발생: {}", msg),
        }
    }

    /// Classify a failure from an HTTP status code and/or response body text
    pub fn classify(status: Option<u16>, message: &str) -> Self {
        let is_rate_limit = status == Some(429)
            || message.contains("429")
            || message.contains("quota")
            || message.contains("RESOURCE_EXHAUSTED");
        if is_rate_limit {
            return GenerateError::RateLimited(message.to_string());
        }

        if status == Some(503) || message.contains("503") {
            return GenerateError::Overloaded(message.to_string());
        }

        if message.contains("SAFETY") {
            return GenerateError::SafetyBlocked(message.to_string());
        }

        // Provider errors often arrive as a JSON envelope; prefer its
        // nested message when present
        let msg = extract_error_message(message).unwrap_or_else(|| message.to_string());
        GenerateError::Other(msg)
    }
}

/// Pull `error.message` out of a stringified provider error envelope
fn extract_error_message(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if !trimmed.starts_with('{') && !trimmed.contains("{\"error\":") {
        return None;
    }
    let value: serde_json::Value = serde_json::from_str(trimmed).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}
