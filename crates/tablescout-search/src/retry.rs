//! Retry with exponential back-off and jitter around the nearby lookup.
//!
//! [`RetryingSearch`] wraps any [`NearbySearch`] so the expander and buffer
//! stages stay retry-agnostic. Only [`LookupError::is_retriable`] errors are
//! retried; query errors are returned immediately.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tablescout_core::Restaurant;

use crate::lookup::{LookupError, NearbyQuery, NearbySearch};

const MAX_DELAY_MS: u64 = 5_000;

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// Back-off schedule with `backoff_base_ms = 100`:
///
/// | Retry | Sleep before retry        |
/// |-------|---------------------------|
/// | 1     | 100 ms × 2⁰ ± 25 % jitter |
/// | 2     | 100 ms × 2¹ ± 25 % jitter |
///
/// Delay is capped at 5 s.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, LookupError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, LookupError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !err.is_retriable() || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "restaurant lookup failed; retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

/// A [`NearbySearch`] that retries transient failures of the inner store.
#[derive(Debug, Clone)]
pub struct RetryingSearch<S> {
    inner: S,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl<S> RetryingSearch<S> {
    #[must_use]
    pub fn new(inner: S, max_retries: u32, backoff_base_ms: u64) -> Self {
        Self {
            inner,
            max_retries,
            backoff_base_ms,
        }
    }
}

#[async_trait]
impl<S: NearbySearch> NearbySearch for RetryingSearch<S> {
    async fn nearby(&self, query: &NearbyQuery) -> Result<Vec<Restaurant>, LookupError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.inner.nearby(query)
        })
        .await
    }
}
