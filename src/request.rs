use std::{fmt, io, sync::Arc, time::Duration};

use bytes::Bytes;
use reqwest::{
    header::{self, HeaderMap, HeaderName, HeaderValue},
    Method, Url,
};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::{Result, TransportError};

type BodyFactory = Arc<dyn Fn() -> io::Result<Bytes> + Send + Sync>;

/// Body source of an [`HttpRequest`].
///
/// Every variant can be re-opened, so the same logical request can be sent
/// more than once.
#[derive(Clone, Default)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// Buffered body, replayed as-is on every attempt.
    Bytes(Bytes),
    /// Factory producing a fresh body for every attempt.
    Replayable(BodyFactory),
}

impl RequestBody {
    /// Builds a body regenerated by `factory` before each attempt.
    pub fn replayable<F>(factory: F) -> Self
    where
        F: Fn() -> io::Result<Bytes> + Send + Sync + 'static,
    {
        Self::Replayable(Arc::new(factory))
    }

    /// Returns the buffered bytes, if the body is already materialized.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    fn open(&self) -> io::Result<Bytes> {
        match self {
            Self::Empty => Ok(Bytes::new()),
            Self::Bytes(bytes) => Ok(bytes.clone()),
            Self::Replayable(factory) => factory(),
        }
    }
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Self::Replayable(_) => f.write_str("Replayable(<factory>)"),
        }
    }
}

impl From<Bytes> for RequestBody {
    fn from(bytes: Bytes) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes.into())
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        Self::Bytes(text.into())
    }
}

impl From<&'static str> for RequestBody {
    fn from(text: &'static str) -> Self {
        Self::Bytes(Bytes::from_static(text.as_bytes()))
    }
}

/// Outbound request that can be prepared for any number of attempts.
///
/// Clones share the cancellation token, so cancelling the token of the
/// original request also cancels a cooldown wait of any prepared copy.
#[derive(Clone, Debug)]
pub struct HttpRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: RequestBody,
    timeout: Option<Duration>,
    cancel: CancellationToken,
}

impl HttpRequest {
    /// Creates a request with an empty body.
    pub fn new(method: Method, url: impl AsRef<str>) -> Result<Self> {
        let url = url.as_ref();
        let url = Url::parse(url).map_err(|err| {
            TransportError::InvalidRequest(format!("invalid url '{url}': {err}"))
        })?;
        Ok(Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
            timeout: None,
            cancel: CancellationToken::new(),
        })
    }

    pub fn get(url: impl AsRef<str>) -> Result<Self> {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl AsRef<str>) -> Result<Self> {
        Self::new(Method::POST, url)
    }

    /// Appends a header.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Sets the body source.
    pub fn body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets a body regenerated by `factory` before each attempt.
    pub fn replayable_body<F>(self, factory: F) -> Self
    where
        F: Fn() -> std::io::Result<Bytes> + Send + Sync + 'static,
    {
        self.body(RequestBody::replayable(factory))
    }

    /// Serializes `payload` as the JSON body and sets `content-type`.
    pub fn json<T: Serialize + ?Sized>(mut self, payload: &T) -> Result<Self> {
        let encoded = serde_json::to_vec(payload).map_err(|err| {
            TransportError::InvalidRequest(format!("cannot encode JSON body: {err}"))
        })?;
        self.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        self.body = RequestBody::from(encoded);
        Ok(self)
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Associates a cancellation token observed during rate-limit cooldowns.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body_source(&self) -> &RequestBody {
        &self.body
    }

    pub fn timeout_duration(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Derives a fresh copy ready to be sent, with the body re-opened.
    ///
    /// Safe to call once per attempt; the original request is left untouched.
    pub fn prepare(&self) -> Result<Self> {
        let body = self.body.open().map_err(TransportError::Prepare)?;
        Ok(Self {
            method: self.method.clone(),
            url: self.url.clone(),
            headers: self.headers.clone(),
            body: RequestBody::Bytes(body),
            timeout: self.timeout,
            cancel: self.cancel.clone(),
        })
    }

    pub(crate) fn set_default_timeout(&mut self, timeout: Duration) {
        self.timeout.get_or_insert(timeout);
    }

    /// Converts into a `reqwest::Request`, opening the body source.
    pub fn into_reqwest(self) -> Result<reqwest::Request> {
        let body = self.body.open().map_err(TransportError::Prepare)?;
        let mut request = reqwest::Request::new(self.method, self.url);
        *request.headers_mut() = self.headers;
        *request.timeout_mut() = self.timeout;
        if !body.is_empty() {
            *request.body_mut() = Some(reqwest::Body::from(body));
        }
        Ok(request)
    }
}
