//! Scripted client for tests

use super::error::GenerateError;
use super::{FragmentStream, GenerationClient};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::mpsc;

/// One scripted reply
enum Reply {
    Text(String),
    Fragments(Vec<Result<String, GenerateError>>),
    Failure(GenerateError),
}

/// A record of one call the mock received
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub system_prompt: String,
    pub user_input: String,
    pub streaming: bool,
}

/// Test double that replays scripted replies in order and records every
/// call it receives. Replies are shared between the atomic and streaming
/// entry points; a `Text` reply streams as a single fragment.
#[derive(Default)]
pub struct MockClient {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_text(&self, text: impl Into<String>) {
        self.replies.lock().unwrap().push_back(Reply::Text(text.into()));
    }

    pub fn push_fragments(&self, fragments: Vec<String>) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Fragments(fragments.into_iter().map(Ok).collect()));
    }

    /// Script a stream that yields fragments and then dies mid-flight
    pub fn push_broken_stream(&self, fragments: Vec<String>, error: GenerateError) {
        let mut items: Vec<Result<String, GenerateError>> =
            fragments.into_iter().map(Ok).collect();
        items.push(Err(error));
        self.replies.lock().unwrap().push_back(Reply::Fragments(items));
    }

    pub fn push_failure(&self, error: GenerateError) {
        self.replies.lock().unwrap().push_back(Reply::Failure(error));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, system_prompt: &str, user_input: &str, streaming: bool) {
        self.calls.lock().unwrap().push(RecordedCall {
            system_prompt: system_prompt.to_string(),
            user_input: user_input.to_string(),
            streaming,
        });
    }

    fn next_reply(&self) -> Reply {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Reply::Failure(GenerateError::Other(
                "mock has no scripted reply".to_string(),
            )))
    }
}

#[async_trait]
impl GenerationClient for MockClient {
    async fn generate(
        &self,
        system_prompt: &str,
        user_input: &str,
    ) -> Result<String, GenerateError> {
        self.record(system_prompt, user_input, false);
        match self.next_reply() {
            Reply::Text(text) => Ok(text),
            Reply::Fragments(fragments) => fragments
                .into_iter()
                .collect::<Result<Vec<_>, _>>()
                .map(|parts| parts.concat()),
            Reply::Failure(error) => Err(error),
        }
    }

    async fn generate_stream(
        &self,
        system_prompt: &str,
        user_input: &str,
    ) -> Result<FragmentStream, GenerateError> {
        self.record(system_prompt, user_input, true);
        let fragments = match self.next_reply() {
            Reply::Text(text) => vec![Ok(text)],
            Reply::Fragments(fragments) => fragments,
            Reply::Failure(error) => return Err(error),
        };

        let (tx, rx) = mpsc::channel(fragments.len().max(1));
        tokio::spawn(async move {
            for fragment in fragments {
                if tx.send(fragment).await.is_err() {
                    return;
                }
            }
        });
        Ok(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replies_in_order() {
        let mock = MockClient::new();
        mock.push_text("first");
        mock.push_text("second");

        assert_eq!(mock.generate("sys", "a").await.unwrap(), "first");
        assert_eq!(mock.generate("sys", "b").await.unwrap(), "second");
        assert_eq!(mock.call_count(), 2);
        assert_eq!(mock.calls()[1].user_input, "b");
    }

    #[tokio::test]
    async fn test_stream_yields_fragments_then_closes() {
        let mock = MockClient::new();
        mock.push_fragments(vec!["he".to_string(), "llo".to_string()]);

        let mut rx = mock.generate_stream("sys", "in").await.unwrap();
        assert_eq!(rx.recv().await.unwrap().unwrap(), "he");
        assert_eq!(rx.recv().await.unwrap().unwrap(), "llo");
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_unscripted_call_fails() {
        let mock = MockClient::new();
        assert!(matches!(
            mock.generate("sys", "in").await,
            Err(GenerateError::Other(_))
        ));
    }
}
