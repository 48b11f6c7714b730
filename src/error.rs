/// Error type returned by this crate.
///
/// A rate-limited response is not an error: once retries are exhausted or
/// abandoned, the `429` response itself is returned to the caller.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// The request body could not be re-derived for an attempt.
    #[error("request preparation failed: {0}")]
    Prepare(std::io::Error),
    /// The request could not be constructed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}
