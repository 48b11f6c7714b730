//! `ratelimit-transport` retries HTTP requests rejected with
//! `429 Too Many Requests`.
//!
//! The crate decorates a transmission capability ([`RoundTripper`]) with:
//! - [`RetryingRoundTripper`], which waits until the `X-RateLimit-Reset`
//!   instant and resends the request, up to a retry budget;
//! - [`RetryableTransport`], which installs the retrying round tripper in
//!   front of a [`ClientOperation`]'s transport before submitting it.

mod error;
mod options;
pub mod ratelimit;
mod request;
mod round_tripper;
mod submitter;
mod transport;

#[cfg(test)]
mod test_support;

pub use error::TransportError;
pub use options::{RetryOptions, ATTEMPTS_ENV_VAR};
pub use request::{HttpRequest, RequestBody};
pub use round_tripper::RetryingRoundTripper;
pub use submitter::{ClientConfig, ClientOperation, DirectSubmitter, RetryableTransport, Submitter};
pub use transport::{default_transport, RoundTripper};

pub type Result<T> = std::result::Result<T, TransportError>;
