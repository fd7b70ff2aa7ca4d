//! AlphaESS Open API client
//!
//! The client signs every request, runs it through an [`HttpTransport`] and
//! interprets the response envelope. Read and write helpers for the individual
//! endpoints live in submodules; the aggregation pass and the charge/discharge
//! setters are implemented on the client in their own modules.

mod auth;
mod endpoints;

pub use endpoints::paths;

use crate::config::{AggregationConfig, Config};
use crate::envelope::ResponseEnvelope;
use crate::error::Result;
use crate::logging::{StructuredLogger, get_logger};
use crate::signer::{self, Credentials};
use crate::transport::{ApiRequest, HttpTransport, Method, ReqwestTransport};
use chrono::{Local, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

pub struct AlphaEssClient {
    credentials: Credentials,
    transport: Box<dyn HttpTransport>,
    timezone: Option<chrono_tz::Tz>,
    aggregation: AggregationConfig,
    logger: StructuredLogger,
}

impl AlphaEssClient {
    /// Create a client that owns its HTTP session
    pub fn new(credentials: Credentials, base_url: &str, timeout: Duration) -> Result<Self> {
        let transport = ReqwestTransport::new(base_url, timeout)?;
        Ok(Self::with_transport(credentials, Box::new(transport)))
    }

    /// Create a client on a caller-owned `reqwest::Client`; `close` leaves it open
    pub fn with_shared_client(
        credentials: Credentials,
        base_url: &str,
        timeout: Duration,
        client: reqwest::Client,
    ) -> Self {
        let transport = ReqwestTransport::with_shared_client(base_url, timeout, client);
        Self::with_transport(credentials, Box::new(transport))
    }

    /// Create a client over any transport implementation
    pub fn with_transport(credentials: Credentials, transport: Box<dyn HttpTransport>) -> Self {
        let logger = get_logger("client");
        Self {
            credentials,
            transport,
            timezone: None,
            aggregation: AggregationConfig::default(),
            logger,
        }
    }

    /// Build an owning client from validated configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let credentials = Credentials::new(config.api.app_id.clone(), config.api.app_secret.clone());
        let client = Self::new(credentials, &config.api.base_url, config.api.timeout())?
            .with_timezone(config.timezone()?)
            .with_aggregation(config.aggregation.clone());
        Ok(client)
    }

    /// Evaluate "today" in this timezone instead of the system local one
    pub fn with_timezone(mut self, timezone: Option<chrono_tz::Tz>) -> Self {
        self.timezone = timezone;
        self
    }

    /// Settings used by [`AlphaEssClient::get_data_with_defaults`]
    pub fn with_aggregation(mut self, aggregation: AggregationConfig) -> Self {
        self.aggregation = aggregation;
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub(crate) fn aggregation(&self) -> &AggregationConfig {
        &self.aggregation
    }

    pub(crate) fn logger(&self) -> &StructuredLogger {
        &self.logger
    }

    /// Current date in the configured timezone
    pub fn local_today(&self) -> NaiveDate {
        match self.timezone {
            Some(tz) => Utc::now().with_timezone(&tz).date_naive(),
            None => Local::now().date_naive(),
        }
    }

    /// Whether [`AlphaEssClient::close`] releases the HTTP session
    pub fn owns_session(&self) -> bool {
        self.transport.owns_session()
    }

    /// Release the HTTP session if this client created it
    pub fn close(&mut self) {
        self.transport.close();
        self.logger.debug("Client closed");
    }

    /// Signed GET. `Ok(None)` means the API answered without usable data.
    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Option<Value>> {
        let request = self.prepare(Method::Get, path, query, None);
        let envelope = self.exchange(&request).await?;
        match envelope.clone().interpret_get() {
            Ok(data) => Ok(Some(data)),
            Err(reason) => {
                self.logger.error(&format!(
                    "Unexpected response ({}): {} when calling {}",
                    reason,
                    render(&envelope),
                    request.resource()
                ));
                Ok(None)
            }
        }
    }

    /// Signed POST with a JSON body. A success marker with null data yields
    /// `Ok(None)` as does a missing marker; only the latter is logged.
    pub async fn post<T: Serialize + ?Sized>(&self, path: &str, payload: &T) -> Result<Option<Value>> {
        let body = serde_json::to_value(payload)?;
        let request = self.prepare(Method::Post, path, &[], Some(body));
        let envelope = self.exchange(&request).await?;
        match envelope.clone().interpret_post() {
            Ok(data) => Ok(data),
            Err(reason) => {
                self.logger.error(&format!(
                    "Unexpected response ({}): {} when calling {}",
                    reason,
                    render(&envelope),
                    request.resource()
                ));
                Ok(None)
            }
        }
    }

    fn prepare(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<Value>,
    ) -> ApiRequest {
        ApiRequest {
            method,
            path: path.to_string(),
            query: query
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            headers: signer::headers(&self.credentials, Utc::now()),
            body,
        }
    }

    async fn exchange(&self, request: &ApiRequest) -> Result<ResponseEnvelope> {
        let resource = request.resource();
        self.logger.debug(&format!("Trying to call {}", resource));

        let response = self.transport.execute(request).await.inspect_err(|e| {
            self.logger
                .error(&format!("Error: {} when calling {}", e, resource));
        })?;

        if !response.is_success() {
            self.logger.error(&format!(
                "Unexpected response received: {} when calling {}",
                response.status, resource
            ));
            return Err(crate::error::AlphaEssError::http_status(
                response.status,
                request.path.clone(),
            ));
        }

        ResponseEnvelope::parse(&request.path, &response.body).inspect_err(|e| {
            self.logger.error(&format!("{} when calling {}", e, resource));
        })
    }
}

fn render(envelope: &ResponseEnvelope) -> String {
    serde_json::to_string(envelope).unwrap_or_else(|_| format!("{:?}", envelope))
}
