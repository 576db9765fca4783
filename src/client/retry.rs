//! Retry with exponential backoff and jitter for transient provider failures

use super::error::GenerateError;
use crate::config::RetryConfig;
use std::future::Future;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Backoff delay for a zero-based attempt number: base doubles each attempt,
/// plus bounded random jitter
pub fn backoff_delay(attempt: u32, config: &RetryConfig) -> Duration {
    let exponential = config
        .base_delay_ms
        .saturating_mul(1u64.checked_shl(attempt).unwrap_or(u64::MAX));
    Duration::from_millis(exponential.saturating_add(jitter_ms(config.jitter_bound_ms)))
}

/// Jitter in `[0, bound)` derived from the clock's subsecond nanos
fn jitter_ms(bound: u64) -> u64 {
    if bound == 0 {
        return 0;
    }
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos() as u64;
    nanos % bound
}

/// Run `operation` up to `config.max_attempts` times. Transient failures
/// (rate limit, overload) back off and retry; any other failure is returned
/// immediately. The last transient error is returned once the budget is
/// exhausted.
pub async fn retry_with_backoff<T, F, Fut>(
    config: &RetryConfig,
    operation: F,
) -> Result<T, GenerateError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, GenerateError>>,
{
    retry_with_backoff_using(config, operation, |delay| tokio::time::sleep(delay)).await
}

/// Retry loop with an injectable sleeper, so tests can record delays
/// instead of waiting them out
pub async fn retry_with_backoff_using<T, F, Fut, S, SFut>(
    config: &RetryConfig,
    mut operation: F,
    mut sleep: S,
) -> Result<T, GenerateError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, GenerateError>>,
    S: FnMut(Duration) -> SFut,
    SFut: Future<Output = ()>,
{
    let attempts = config.max_attempts.max(1);
    let mut last_error = GenerateError::Other("retry budget exhausted".to_string());

    for attempt in 0..attempts {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt + 1 < attempts => {
                let delay = backoff_delay(attempt, config);
                eprintln!(
                    "Warning: generation attempt {}/{} failed ({}), retrying in {}ms",
                    attempt + 1,
                    attempts,
                    err,
                    delay.as_millis()
                );
                sleep(delay).await;
                last_error = err;
            }
            Err(err) => return Err(err),
        }
    }

    Err(last_error)
}
