//! Outbound fetch seam shared by the curriculum, note and assistant clients.
//!
//! # Responsibility
//! - Define request/response values keyed by request identity.
//! - Define the `Transport` capability that the offline cache decorates.
//!
//! # Invariants
//! - A non-2xx status is a normal `Response`, not a `TransportError`;
//!   only failures to complete the exchange are errors.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

mod http;

pub use http::HttpTransport;

pub const STATUS_OK: u16 = 200;

/// Request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// One outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    /// JSON body for `POST` requests.
    pub body: Option<Vec<u8>>,
}

impl Request {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            body: None,
        }
    }

    pub fn post_json<T: Serialize>(url: impl Into<String>, body: &T) -> TransportResult<Self> {
        let encoded =
            serde_json::to_vec(body).map_err(|err| TransportError::Encode(err.to_string()))?;
        Ok(Self {
            method: Method::Post,
            url: url.into(),
            body: Some(encoded),
        })
    }

    /// Request identity used as the cache key.
    pub fn cache_key(&self) -> String {
        format!("{} {}", self.method.as_str(), self.url)
    }

    /// Path and query portion of the URL (`/` when the URL has no path).
    pub fn path(&self) -> &str {
        let without_scheme = match self.url.find("://") {
            Some(index) => &self.url[index + 3..],
            None => return self.url.as_str(),
        };
        match without_scheme.find('/') {
            Some(index) => &without_scheme[index..],
            None => "/",
        }
    }
}

/// One raw response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// `200 OK` response with `body`.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::new(STATUS_OK, body)
    }

    /// Exactly `200`; the only status eligible for caching.
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Fails with `TransportError::Status` unless the status is 2xx.
    pub fn require_success(self, url: &str) -> TransportResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(TransportError::Status {
                url: url.to_string(),
                status: self.status,
            })
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> TransportResult<T> {
        serde_json::from_slice(&self.body).map_err(|err| TransportError::Decode(err.to_string()))
    }
}

pub type TransportResult<T> = Result<T, TransportError>;

/// Failure to complete or interpret a remote exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Connection, DNS, timeout or similar failure.
    Network(String),
    /// The exchange completed with a non-success status.
    Status { url: String, status: u16 },
    /// Request body could not be encoded.
    Encode(String),
    /// Response body could not be decoded.
    Decode(String),
    /// URL could not be built.
    InvalidUrl(String),
}

impl Display for TransportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network(message) => write!(f, "network failure: {message}"),
            Self::Status { url, status } => write!(f, "`{url}` answered status {status}"),
            Self::Encode(message) => write!(f, "request encoding failed: {message}"),
            Self::Decode(message) => write!(f, "response decoding failed: {message}"),
            Self::InvalidUrl(message) => write!(f, "invalid url: {message}"),
        }
    }
}

impl Error for TransportError {}

/// Capability to perform one outbound fetch.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, request: &Request) -> TransportResult<Response>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn fetch(&self, request: &Request) -> TransportResult<Response> {
        (**self).fetch(request).await
    }
}
