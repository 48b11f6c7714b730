use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Response;

use crate::{HttpRequest, Result, TransportError};

/// Capability that sends one request and yields its response or error.
///
/// Implemented by `reqwest::Client` and by [`crate::RetryingRoundTripper`],
/// which makes the retrying layer a drop-in substitute for its delegate.
#[async_trait]
pub trait RoundTripper: Send + Sync {
    async fn round_trip(&self, request: HttpRequest) -> Result<Response>;
}

#[async_trait]
impl RoundTripper for reqwest::Client {
    async fn round_trip(&self, request: HttpRequest) -> Result<Response> {
        let request = request.into_reqwest()?;
        self.execute(request)
            .await
            .map_err(TransportError::Transport)
    }
}

#[async_trait]
impl<T: RoundTripper + ?Sized> RoundTripper for Arc<T> {
    async fn round_trip(&self, request: HttpRequest) -> Result<Response> {
        (**self).round_trip(request).await
    }
}

/// Transport used when a client configuration does not name one.
pub fn default_transport() -> Arc<dyn RoundTripper> {
    Arc::new(reqwest::Client::new())
}
