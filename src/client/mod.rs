//! Text generation clients

pub mod error;
pub mod gemini;
pub mod mock;
pub mod retry;

pub use error::GenerateError;
pub use gemini::GeminiClient;
pub use mock::MockClient;
pub use retry::{backoff_delay, retry_with_backoff};

use async_trait::async_trait;
use tokio::sync::mpsc;

/// Incremental text fragments from a streaming generation call. The channel
/// closes when the stream ends; an `Err` item terminates it early.
pub type FragmentStream = mpsc::Receiver<Result<String, GenerateError>>;

/// Seam between the stages and the model provider
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Single atomic generation call returning the full response text
    async fn generate(&self, system_prompt: &str, user_input: &str)
        -> Result<String, GenerateError>;

    /// Streaming generation call yielding fragments as they arrive
    async fn generate_stream(
        &self,
        system_prompt: &str,
        user_input: &str,
    ) -> Result<FragmentStream, GenerateError>;
}
