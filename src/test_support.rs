use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
    time::{SystemTime, UNIX_EPOCH},
};

use async_trait::async_trait;
use axum::http::StatusCode;
use bytes::Bytes;
use reqwest::Response;

use crate::{ratelimit::RATE_LIMIT_RESET_HEADER, HttpRequest, Result, RoundTripper};

pub fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock must be after the epoch")
        .as_secs()
}

pub fn response(status: StatusCode, reset: Option<&str>) -> Response {
    let mut builder = axum::http::Response::builder().status(status);
    if let Some(reset) = reset {
        builder = builder.header(RATE_LIMIT_RESET_HEADER, reset);
    }
    Response::from(builder.body(String::new()).expect("mock response must build"))
}

pub fn rate_limited(reset: Option<&str>) -> Response {
    response(StatusCode::TOO_MANY_REQUESTS, reset)
}

/// Scripted response produced by [`ScriptedTransport`].
#[derive(Clone)]
pub struct Scripted {
    pub status: StatusCode,
    pub reset: Option<String>,
}

impl Scripted {
    pub fn ok() -> Self {
        Self {
            status: StatusCode::OK,
            reset: None,
        }
    }

    pub fn status(status: StatusCode) -> Self {
        Self {
            status,
            reset: None,
        }
    }

    /// 429 with a reset instant already in the past.
    pub fn rate_limited_past() -> Self {
        Self {
            status: StatusCode::TOO_MANY_REQUESTS,
            reset: Some("1".to_owned()),
        }
    }

    pub fn rate_limited(reset: Option<&str>) -> Self {
        Self {
            status: StatusCode::TOO_MANY_REQUESTS,
            reset: reset.map(str::to_owned),
        }
    }
}

/// In-memory transport replaying a fixed script and recording what it sent.
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Scripted>>,
    fallback: Scripted,
    hits: AtomicUsize,
    bodies: Mutex<Vec<Bytes>>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: Scripted::status(StatusCode::INTERNAL_SERVER_ERROR),
            hits: AtomicUsize::new(0),
            bodies: Mutex::new(Vec::new()),
        }
    }

    /// Answers every request with `response`.
    pub fn always(response: Scripted) -> Self {
        let mut transport = Self::new(Vec::new());
        transport.fallback = response;
        transport
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn bodies(&self) -> Vec<Bytes> {
        self.bodies
            .lock()
            .expect("body log mutex must not be poisoned")
            .clone()
    }
}

#[async_trait]
impl RoundTripper for ScriptedTransport {
    async fn round_trip(&self, request: HttpRequest) -> Result<Response> {
        self.hits.fetch_add(1, Ordering::SeqCst);
        self.bodies
            .lock()
            .expect("body log mutex must not be poisoned")
            .push(request.body_source().as_bytes().cloned().unwrap_or_default());

        let next = self
            .script
            .lock()
            .expect("script mutex must not be poisoned")
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        Ok(response(next.status, next.reset.as_deref()))
    }
}
