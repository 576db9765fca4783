//! Direct HTTP client for the Generative Language API

use super::error::GenerateError;
use super::retry::retry_with_backoff;
use super::{FragmentStream, GenerationClient};
use crate::config::{AppConfig, RetryConfig};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

const STREAM_CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    #[serde(rename = "system_instruction")]
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<TextPart>,
}

#[derive(Debug, Deserialize)]
struct TextPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GenerateResponse {
    /// Concatenated candidate text, or a safety error when generation was
    /// blocked
    fn into_text(self) -> Result<String, GenerateError> {
        if let Some(feedback) = &self.prompt_feedback {
            if let Some(reason) = &feedback.block_reason {
                return Err(GenerateError::SafetyBlocked(format!(
                    "blockReason: {reason} SAFETY"
                )));
            }
        }

        let mut text = String::new();
        for candidate in &self.candidates {
            if candidate.finish_reason.as_deref() == Some("SAFETY") {
                return Err(GenerateError::SafetyBlocked(
                    "finishReason: SAFETY".to_string(),
                ));
            }
            if let Some(content) = &candidate.content {
                for part in &content.parts {
                    if let Some(t) = &part.text {
                        text.push_str(t);
                    }
                }
            }
        }
        Ok(text)
    }
}

/// Split complete SSE events off the front of `buffer`, returning the
/// `data:` payloads. Incomplete trailing lines stay buffered for the next
/// network chunk.
fn drain_sse_events(buffer: &mut String) -> Vec<String> {
    let mut payloads = Vec::new();
    while let Some(newline) = buffer.find('\n') {
        let line: String = buffer.drain(..=newline).collect();
        let line = line.trim_end_matches(['\n', '\r']);
        if let Some(payload) = line.strip_prefix("data:") {
            let payload = payload.trim();
            if !payload.is_empty() && payload != "[DONE]" {
                payloads.push(payload.to_string());
            }
        }
    }
    payloads
}

/// Client for Google's Generative Language HTTP API.
///
/// No caching happens at this layer; callers own their caches.
pub struct GeminiClient {
    http: reqwest::Client,
    api_base: String,
    model: String,
    api_key: String,
    retry: RetryConfig,
}

impl GeminiClient {
    pub fn new(config: &AppConfig, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: config.api_base.clone(),
            model: config.model.clone(),
            api_key,
            retry: config.retry.clone(),
        }
    }

    fn endpoint(&self, method: &str, sse: bool) -> String {
        let alt = if sse { "alt=sse&" } else { "" };
        format!(
            "{}/models/{}:{}?{}key={}",
            self.api_base, self.model, method, alt, self.api_key
        )
    }

    fn request_body<'a>(system_prompt: &'a str, user_input: &'a str) -> GenerateRequest<'a> {
        GenerateRequest {
            system_instruction: Content {
                parts: vec![Part { text: system_prompt }],
            },
            contents: vec![Content {
                parts: vec![Part { text: user_input }],
            }],
        }
    }

    async fn generate_once(
        &self,
        system_prompt: &str,
        user_input: &str,
    ) -> Result<String, GenerateError> {
        let response = self
            .http
            .post(self.endpoint("generateContent", false))
            .json(&Self::request_body(system_prompt, user_input))
            .send()
            .await
            .map_err(|e| GenerateError::classify(e.status().map(|s| s.as_u16()), &e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| GenerateError::Other(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(GenerateError::classify(Some(status), &body));
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| GenerateError::Other(format!("unexpected response shape: {e}")))?;
        parsed.into_text()
    }

    /// Open the SSE stream; retried like the atomic call. Once fragments
    /// start flowing a failure terminates the stream instead.
    async fn open_stream(
        &self,
        system_prompt: &str,
        user_input: &str,
    ) -> Result<reqwest::Response, GenerateError> {
        let response = self
            .http
            .post(self.endpoint("streamGenerateContent", true))
            .json(&Self::request_body(system_prompt, user_input))
            .send()
            .await
            .map_err(|e| GenerateError::classify(e.status().map(|s| s.as_u16()), &e.to_string()))?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerateError::classify(Some(status), &body));
        }
        Ok(response)
    }
}

/// Pump SSE chunks into the fragment channel until end-of-stream
async fn pump_sse(
    mut response: reqwest::Response,
    tx: mpsc::Sender<Result<String, GenerateError>>,
) {
    let mut buffer = String::new();
    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                buffer.push_str(&String::from_utf8_lossy(&chunk));
                for payload in drain_sse_events(&mut buffer) {
                    let event = match serde_json::from_str::<GenerateResponse>(&payload) {
                        Ok(parsed) => parsed.into_text(),
                        Err(e) => Err(GenerateError::Other(format!("bad stream event: {e}"))),
                    };
                    match event {
                        Ok(text) if text.is_empty() => {}
                        other => {
                            let failed = other.is_err();
                            if tx.send(other).await.is_err() || failed {
                                return;
                            }
                        }
                    }
                }
            }
            Ok(None) => return,
            Err(e) => {
                let _ = tx
                    .send(Err(GenerateError::classify(
                        e.status().map(|s| s.as_u16()),
                        &e.to_string(),
                    )))
                    .await;
                return;
            }
        }
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(&self, system_prompt: &str, user_input: &str) -> Result<String, GenerateError> {
        retry_with_backoff(&self.retry, || self.generate_once(system_prompt, user_input)).await
    }

    async fn generate_stream(
        &self,
        system_prompt: &str,
        user_input: &str,
    ) -> Result<FragmentStream, GenerateError> {
        let response =
            retry_with_backoff(&self.retry, || self.open_stream(system_prompt, user_input)).await?;

        let (tx, rx) = mpsc::channel(STREAM_CHANNEL_CAPACITY);
        tokio::spawn(pump_sse(response, tx));
        Ok(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_text_concatenation() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"안녕"},{"text":"하세요"}]}}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.into_text().unwrap(), "안녕하세요");
    }

    #[test]
    fn test_response_safety_block() {
        let body = r#"{"candidates":[],"promptFeedback":{"blockReason":"SAFETY"}}"#;
        let parsed: GenerateResponse = serde_json::from_str(body).unwrap();
        assert!(matches!(
            parsed.into_text(),
            Err(GenerateError::SafetyBlocked(_))
        ));

        let body = r#"{"candidates":[{"finishReason":"SAFETY"}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(body).unwrap();
        assert!(matches!(
            parsed.into_text(),
            Err(GenerateError::SafetyBlocked(_))
        ));
    }

    #[test]
    fn test_drain_sse_events_splits_complete_lines() {
        let mut buffer = String::from("data: {\"a\":1}\r\n\r\ndata: {\"b\":2}\n");
        let events = drain_sse_events(&mut buffer);
        assert_eq!(events, vec!["{\"a\":1}", "{\"b\":2}"]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_drain_sse_events_keeps_partial_tail() {
        let mut buffer = String::from("data: {\"a\":1}\ndata: {\"par");
        let events = drain_sse_events(&mut buffer);
        assert_eq!(events, vec!["{\"a\":1}"]);
        assert_eq!(buffer, "data: {\"par");

        buffer.push_str("tial\":true}\n");
        let events = drain_sse_events(&mut buffer);
        assert_eq!(events, vec!["{\"partial\":true}"]);
    }

    #[test]
    fn test_endpoint_shapes() {
        let config = AppConfig::default();
        let client = GeminiClient::new(&config, "KEY".to_string());
        assert_eq!(
            client.endpoint("generateContent", false),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent?key=KEY"
        );
        assert!(client
            .endpoint("streamGenerateContent", true)
            .contains("alt=sse&key="));
    }
}
