use std::{fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::Response;

use crate::{
    transport::default_transport, HttpRequest, Result, RetryOptions, RetryingRoundTripper,
    RoundTripper,
};

/// Client configuration referenced by a [`ClientOperation`].
///
/// Cloning shares the transport. [`RetryableTransport`] works on the
/// operation's own copy, so a configuration reused across calls is never
/// modified by a submission.
#[derive(Clone, Default)]
pub struct ClientConfig {
    /// Transport used to send requests; `None` selects a default `reqwest::Client`.
    pub transport: Option<Arc<dyn RoundTripper>>,
    /// Timeout applied to requests that do not set their own.
    pub timeout: Option<Duration>,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field(
                "transport",
                &self.transport.as_ref().map(|_| "<round tripper>"),
            )
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientConfig {
    pub fn with_transport(transport: Arc<dyn RoundTripper>) -> Self {
        Self {
            transport: Some(transport),
            timeout: None,
        }
    }

    /// Returns the configured transport, or the default one.
    pub fn effective_transport(&self) -> Arc<dyn RoundTripper> {
        self.transport.clone().unwrap_or_else(default_transport)
    }
}

/// One logical client call.
#[derive(Clone, Debug)]
pub struct ClientOperation {
    /// Caller-chosen identifier, used for diagnostics only.
    pub id: String,
    pub request: HttpRequest,
    /// Client configuration; `None` selects [`ClientConfig::default`].
    pub client: Option<ClientConfig>,
}

impl ClientOperation {
    pub fn new(id: impl Into<String>, request: HttpRequest) -> Self {
        Self {
            id: id.into(),
            request,
            client: None,
        }
    }

    pub fn with_client(mut self, client: ClientConfig) -> Self {
        self.client = Some(client);
        self
    }
}

/// Capability that submits a [`ClientOperation`].
#[async_trait]
pub trait Submitter: Send + Sync {
    type Output: Send;

    async fn submit(&self, operation: ClientOperation) -> Result<Self::Output>;
}

/// Submitter that sends the operation's request through the operation's
/// transport and returns the raw response.
#[derive(Clone, Copy, Debug, Default)]
pub struct DirectSubmitter;

#[async_trait]
impl Submitter for DirectSubmitter {
    type Output = Response;

    async fn submit(&self, operation: ClientOperation) -> Result<Response> {
        let ClientOperation {
            id: _id,
            mut request,
            client,
        } = operation;
        let client = client.unwrap_or_default();
        if let Some(timeout) = client.timeout {
            request.set_default_timeout(timeout);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("submitting operation {_id} to {}", request.url());

        client.effective_transport().round_trip(request).await
    }
}

/// Submitter wrapper that installs a [`RetryingRoundTripper`] in front of the
/// operation's transport before handing it to the inner submitter.
#[derive(Clone, Debug)]
pub struct RetryableTransport<S> {
    inner: S,
    options: RetryOptions,
}

impl<S> RetryableTransport<S> {
    pub fn new(inner: S, options: RetryOptions) -> Self {
        Self { inner, options }
    }

    pub fn options(&self) -> &RetryOptions {
        &self.options
    }
}

impl RetryableTransport<DirectSubmitter> {
    /// Wraps a [`DirectSubmitter`] allowing `attempts` retries per operation.
    pub fn direct(attempts: usize) -> Self {
        Self::new(DirectSubmitter, RetryOptions::new(attempts))
    }
}

#[async_trait]
impl<S: Submitter> Submitter for RetryableTransport<S> {
    type Output = S::Output;

    async fn submit(&self, mut operation: ClientOperation) -> Result<S::Output> {
        let mut client = operation.client.take().unwrap_or_default();
        let delegate = client.effective_transport();
        client.transport = Some(Arc::new(RetryingRoundTripper::new(
            delegate,
            self.options.attempts,
        )));
        operation.client = Some(client);

        self.inner.submit(operation).await
    }
}
