//! HTTP exchange behind the envelope layer
//!
//! [`HttpTransport`] performs one signed request and hands back the raw status
//! and body. It knows nothing about envelopes. [`ReqwestTransport`] is the
//! production implementation and tracks whether it owns its HTTP session.

use crate::error::{AlphaEssError, Result};
use crate::logging::get_logger;
use crate::signer::SignedHeaders;
use reqwest::header::USER_AGENT;
use serde_json::Value;
use std::time::Duration;

/// Value of the `User-Agent` header on every request
pub const USER_AGENT_VALUE: &str = concat!("alphaess/", env!("APP_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A fully prepared request, relative to the transport's base URL
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: SignedHeaders,
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Path with the query string appended, for diagnostics
    pub fn resource(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.path, query)
    }
}

/// Status and body as received
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

#[async_trait::async_trait]
pub trait HttpTransport: Send + Sync {
    /// Perform the exchange. Connection errors and timeouts are `Err`; any
    /// HTTP status, including errors, comes back as a response.
    async fn execute(&self, request: &ApiRequest) -> Result<RawResponse>;

    /// Release resources held by the transport. Default: nothing to release.
    fn close(&mut self) {}

    /// Whether `close` would release the underlying session
    fn owns_session(&self) -> bool {
        false
    }
}

/// Who is responsible for the HTTP session
#[derive(Debug)]
pub enum Session {
    /// Created by this transport; released on close
    Owned(reqwest::Client),
    /// Supplied by the caller; never released here
    Shared(reqwest::Client),
    /// Owned session already released
    Closed,
}

/// `reqwest` backed transport
pub struct ReqwestTransport {
    base_url: String,
    timeout: Duration,
    session: Session,
    logger: crate::logging::StructuredLogger,
}

impl ReqwestTransport {
    /// Create a transport with its own HTTP session
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_session(base_url, timeout, Session::Owned(client)))
    }

    /// Create a transport on top of a caller-owned HTTP session
    pub fn with_shared_client(base_url: &str, timeout: Duration, client: reqwest::Client) -> Self {
        Self::with_session(base_url, timeout, Session::Shared(client))
    }

    fn with_session(base_url: &str, timeout: Duration, session: Session) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            session,
            logger: get_logger("transport"),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn client(&self) -> Result<&reqwest::Client> {
        match &self.session {
            Session::Owned(c) | Session::Shared(c) => Ok(c),
            Session::Closed => Err(AlphaEssError::network("HTTP session already closed")),
        }
    }
}

#[async_trait::async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<RawResponse> {
        let client = self.client()?;
        let url = format!("{}{}", self.base_url, request.path);

        let builder = match request.method {
            Method::Get => client.get(&url),
            Method::Post => client.post(&url),
        };
        let mut builder = builder
            .headers(request.headers.to_header_map()?)
            .header(USER_AGENT, USER_AGENT_VALUE)
            .timeout(self.timeout);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let resp = builder.send().await?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await?.to_vec();
        Ok(RawResponse { status, body })
    }

    fn close(&mut self) {
        match std::mem::replace(&mut self.session, Session::Closed) {
            Session::Owned(client) => {
                drop(client);
                self.logger.debug("Released owned HTTP session");
            }
            Session::Shared(client) => {
                self.session = Session::Shared(client);
                self.logger
                    .debug("HTTP session is caller-owned; leaving it open");
            }
            Session::Closed => {}
        }
    }

    fn owns_session(&self) -> bool {
        matches!(self.session, Session::Owned(_))
    }
}
