//! HTTP transport
//!
//! A [`Transport`] performs exactly one HTTP exchange and reports either the
//! raw status/body pair or a [`TransportFailure`]. It never retries and never
//! returns a network error through `Err`.

use crate::error::ClientResult;
use crate::payments::request::RequestMap;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// GET and DELETE carry the request map in the query string.
    pub fn uses_query(self) -> bool {
        matches!(self, HttpMethod::Get | HttpMethod::Delete)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Network-level failure: DNS, refused connection, TLS, timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    pub reason: String,
}

impl TransportFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for TransportFailure {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportFailure::new("timeout")
        } else if err.is_connect() {
            TransportFailure::new(format!("connection failed: {}", err))
        } else {
            TransportFailure::new(err.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawResponse {
    Completed { status: u16, body: Vec<u8> },
    Failed(TransportFailure),
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, method: HttpMethod, url: &str, request: &RequestMap) -> RawResponse;
}

/// Appends the encoded map to `url` for query-style methods.
pub fn request_url(method: HttpMethod, url: &str, request: &RequestMap) -> String {
    if !method.uses_query() || request.is_empty() {
        return url.to_string();
    }
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}", url, separator, request.to_query_string())
}

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> ClientResult<Self> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ifthenpay-client/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Use a caller-configured client (proxies, custom TLS, ...).
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, method: HttpMethod, url: &str, request: &RequestMap) -> RawResponse {
        let target = request_url(method, url, request);
        let mut builder = self
            .client
            .request(method.into(), &target)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");

        if !method.uses_query() {
            builder = builder.json(&request.to_json());
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                let failure = TransportFailure::from(e);
                warn!("{} request failed: {}", method, failure.reason);
                return RawResponse::Failed(failure);
            }
        };

        let status = response.status().as_u16();
        match response.bytes().await {
            Ok(body) => {
                debug!("{} completed with HTTP {} ({} bytes)", method, status, body.len());
                RawResponse::Completed {
                    status,
                    body: body.to_vec(),
                }
            }
            Err(e) => {
                let failure = TransportFailure::from(e);
                warn!("Reading {} response body failed: {}", method, failure.reason);
                RawResponse::Failed(failure)
            }
        }
    }
}
