//! Request signing for the AlphaESS Open API
//!
//! Every call carries the application ID, the current Unix time in seconds and
//! a SHA-512 signature over `app_id + app_secret + timestamp`. The server checks
//! freshness, so headers are rebuilt for each request and never reused.

use crate::error::{AlphaEssError, Result};
use chrono::{DateTime, Utc};
use reqwest::header::{
    ACCEPT, ACCEPT_ENCODING, CACHE_CONTROL, CONNECTION, CONTENT_TYPE, HeaderMap, HeaderName,
    HeaderValue,
};
use sha2::{Digest, Sha512};

/// Application credentials, fixed for the lifetime of a client
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    app_id: String,
    app_secret: String,
}

impl Credentials {
    pub fn new<I: Into<String>, S: Into<String>>(app_id: I, app_secret: S) -> Self {
        Self {
            app_id: app_id.into(),
            app_secret: app_secret.into(),
        }
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("app_secret", &"<redacted>")
            .finish()
    }
}

/// Headers attached to a single outbound request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub content_type: &'static str,
    pub connection: &'static str,
    pub accept: &'static str,
    pub accept_encoding: &'static str,
    pub cache_control: &'static str,
    pub timestamp: String,
    pub sign: String,
    pub app_id: String,
}

impl SignedHeaders {
    /// Render as a reqwest header map. Fails when a value cannot be carried
    /// in an HTTP header, so a request never goes out half signed.
    pub fn to_header_map(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(self.content_type));
        headers.insert(CONNECTION, HeaderValue::from_static(self.connection));
        headers.insert(ACCEPT, HeaderValue::from_static(self.accept));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static(self.accept_encoding));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static(self.cache_control));

        for (name, value) in [
            ("timestamp", self.timestamp.as_str()),
            ("sign", self.sign.as_str()),
            ("appid", self.app_id.as_str()),
        ] {
            let value = HeaderValue::from_str(value).map_err(|_| {
                AlphaEssError::validation(name, "Value is not usable as an HTTP header")
            })?;
            headers.insert(HeaderName::from_static(name), value);
        }
        Ok(headers)
    }
}

/// Hex encoded SHA-512 over `app_id + app_secret + timestamp`
pub fn sign(app_id: &str, app_secret: &str, timestamp: &str) -> String {
    let mut hasher = Sha512::new();
    hasher.update(app_id.as_bytes());
    hasher.update(app_secret.as_bytes());
    hasher.update(timestamp.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|x| format!("{:02x}", x))
        .collect::<String>()
}

/// Build the signed header set for `now`, truncated to whole seconds
pub fn headers(credentials: &Credentials, now: DateTime<Utc>) -> SignedHeaders {
    let timestamp = now.timestamp().to_string();
    let sign = sign(&credentials.app_id, &credentials.app_secret, &timestamp);
    SignedHeaders {
        content_type: "application/json",
        connection: "keep-alive",
        accept: "*/*",
        accept_encoding: "gzip, deflate, br",
        cache_control: "no-cache",
        timestamp,
        sign,
        app_id: credentials.app_id.clone(),
    }
}
