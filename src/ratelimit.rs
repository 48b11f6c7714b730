//! Rate-limit cooldown handling.
//!
//! A rate-limited response carries the absolute instant after which the
//! caller may retry, as whole seconds since the Unix epoch, in the
//! `X-RateLimit-Reset` header.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use reqwest::{header::HeaderMap, Response};
use tokio_util::sync::CancellationToken;

/// Header carrying the rate-limit reset instant.
pub const RATE_LIMIT_RESET_HEADER: &str = "x-ratelimit-reset";

/// Returns how long to wait from `now` until the advertised reset instant.
///
/// `None` when the header is missing or is not a base-10 integer. A reset
/// instant at or before `now` yields [`Duration::ZERO`].
pub fn reset_delay(headers: &HeaderMap, now: SystemTime) -> Option<Duration> {
    let reset = headers
        .get(RATE_LIMIT_RESET_HEADER)?
        .to_str()
        .ok()?
        .parse::<i64>()
        .ok()?;
    let Ok(reset) = u64::try_from(reset) else {
        return Some(Duration::ZERO);
    };
    let elapsed = now.duration_since(UNIX_EPOCH).unwrap_or_default();
    Some(Duration::from_secs(reset).saturating_sub(elapsed))
}

/// Waits until the reset instant advertised by `response`, or until `cancel`
/// fires.
///
/// Returns `true` only when the full cooldown elapsed. Returns `false` when the
/// reset header is unusable or the wait was cancelled; the caller should then
/// stop retrying.
pub async fn wait_for_reset(response: &Response, cancel: &CancellationToken) -> bool {
    let Some(delay) = reset_delay(response.headers(), SystemTime::now()) else {
        #[cfg(feature = "tracing")]
        tracing::debug!("rate limited without a usable {RATE_LIMIT_RESET_HEADER} header");
        return false;
    };

    #[cfg(feature = "tracing")]
    tracing::debug!("rate limited, waiting {} ms for reset", delay.as_millis());

    tokio::select! {
        biased;
        () = cancel.cancelled() => {
            #[cfg(feature = "tracing")]
            tracing::debug!("rate limit cooldown cancelled");
            false
        }
        () = tokio::time::sleep(delay) => true,
    }
}
