use std::{fmt, sync::Arc};

use async_trait::async_trait;
use reqwest::{Response, StatusCode};

use crate::{ratelimit::wait_for_reset, HttpRequest, Result, RoundTripper};

/// Round tripper that retries rate-limited (`429`) responses.
///
/// Each attempt re-prepares the request, so bodies are never sent half
/// consumed. Only `429` triggers a retry, and only when the response names a
/// reset instant; transport errors and every other status are returned as-is.
/// The outcome of the last attempt is what the caller receives.
#[derive(Clone)]
pub struct RetryingRoundTripper {
    delegate: Arc<dyn RoundTripper>,
    attempts: usize,
}

impl fmt::Debug for RetryingRoundTripper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryingRoundTripper")
            .field("attempts", &self.attempts)
            .finish_non_exhaustive()
    }
}

impl RetryingRoundTripper {
    /// Wraps `delegate`, allowing `attempts` retries after the first send.
    pub fn new(delegate: Arc<dyn RoundTripper>, attempts: usize) -> Self {
        Self { delegate, attempts }
    }

    /// Number of retries allowed after the first attempt.
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn delegate(&self) -> &Arc<dyn RoundTripper> {
        &self.delegate
    }
}

#[async_trait]
impl RoundTripper for RetryingRoundTripper {
    async fn round_trip(&self, request: HttpRequest) -> Result<Response> {
        let mut attempt = 0usize;
        loop {
            let prepared = request.prepare()?;
            let response = self.delegate.round_trip(prepared).await?;

            if response.status() != StatusCode::TOO_MANY_REQUESTS {
                return Ok(response);
            }

            // No further attempt to wait for.
            if attempt >= self.attempts {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    "rate limited after {} attempts, giving up",
                    attempt + 1
                );
                return Ok(response);
            }

            if !wait_for_reset(&response, request.cancellation()).await {
                return Ok(response);
            }

            attempt += 1;

            #[cfg(feature = "tracing")]
            tracing::debug!(
                "retrying rate-limited request to {} (retry {attempt} of {})",
                request.url(),
                self.attempts
            );
        }
    }
}
