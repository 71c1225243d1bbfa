//! Single-shot request/response abstraction over the playlist manager's API.
//!
//! Every call resolves exactly once to a [`Reply`]. There is no timeout, retry,
//! cancellation or deduplication: two calls to the same path are independent
//! and may complete in either order.

use std::sync::Arc;

use futures_util::future::{self, BoxFuture, FutureExt};
use reqwest::header::CONTENT_TYPE;
pub use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{RemoteError, Result};

/// Status reported when the request never produced an HTTP response.
pub const TRANSPORT_FAILURE: u16 = 0;

/// The only status treated as success.
pub const STATUS_OK: u16 = 200;

/// A request as handed to the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    /// Serialized JSON body; present only for `submit`.
    pub json_body: Option<String>,
}

/// Completion of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(STATUS_OK, body)
    }

    pub fn transport_failure() -> Self {
        Self::new(TRANSPORT_FAILURE, String::new())
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }

    pub fn json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|source| RemoteError::Decode {
            path: path.to_string(),
            source,
        })
    }
}

pub type ReplyFuture = BoxFuture<'static, Reply>;

/// Carries a [`Request`] to the server.
///
/// Implementations must start the request when `send` is called and never
/// fail the future: transport errors resolve to [`Reply::transport_failure`].
pub trait Transport: Send + Sync + 'static {
    fn send(&self, request: Request) -> ReplyFuture;
}

/// reqwest-backed transport rooted at the server's base URL.
pub struct HttpTransport {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: Request) -> ReplyFuture {
        let url = self.url(&request.path);
        let mut builder = self.client.request(request.method.clone(), &url);
        if let Some(body) = request.json_body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        let method = request.method;
        tokio::spawn(async move {
            let response = match builder.send().await {
                Ok(response) => response,
                Err(e) => {
                    warn!("{} {} failed: {}", method, url, e);
                    return Reply::transport_failure();
                }
            };
            let status = response.status().as_u16();
            match response.text().await {
                Ok(body) => Reply::new(status, body),
                Err(e) => {
                    warn!("{} {}: failed to read body: {}", method, url, e);
                    Reply::transport_failure()
                }
            }
        })
        .map(|joined| joined.unwrap_or_else(|_| Reply::transport_failure()))
        .boxed()
    }
}

/// Cheap-to-clone handle every component issues its requests through.
#[derive(Clone)]
pub struct RequestClient {
    transport: Arc<dyn Transport>,
}

impl RequestClient {
    pub fn new(transport: impl Transport) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    pub fn http(base_url: impl Into<String>) -> Self {
        Self::new(HttpTransport::new(base_url))
    }

    pub fn request(&self, method: Method, path: impl Into<String>) -> ReplyFuture {
        let path = path.into();
        debug!("{} {}", method, path);
        self.transport.send(Request {
            method,
            path,
            json_body: None,
        })
    }

    /// Sends `payload` as a JSON body with `Content-Type: application/json`.
    pub fn submit<T: Serialize>(
        &self,
        method: Method,
        path: impl Into<String>,
        payload: &T,
    ) -> ReplyFuture {
        let path = path.into();
        let body = match serde_json::to_string(payload) {
            Ok(body) => body,
            Err(e) => {
                warn!("{} {}: payload not serializable: {}", method, path, e);
                return future::ready(Reply::transport_failure()).boxed();
            }
        };
        debug!("{} {} ({} bytes)", method, path, body.len());
        self.transport.send(Request {
            method,
            path,
            json_body: Some(body),
        })
    }
}
