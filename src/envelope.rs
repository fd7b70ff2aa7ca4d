//! The `{msg, data}` wrapper every Open API response uses
//!
//! HTTP status only says the request reached the API. Whether the operation
//! itself succeeded is carried in `msg`, which must be exactly `"Success"`.

use crate::error::{AlphaEssError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Business-level success marker
pub const SUCCESS_MSG: &str = "Success";

/// Parsed response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ResponseEnvelope {
    #[serde(default)]
    pub code: Option<Value>,
    #[serde(default)]
    pub msg: Option<Value>,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Why a successful HTTP exchange produced no data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusinessFailure {
    /// `msg` missing from the body
    MissingMessage,
    /// `msg` present but not the success marker; holds the rendered value
    Unsuccessful(String),
    /// Success marker present on a read, but `data` missing or null
    MissingData,
}

impl std::fmt::Display for BusinessFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingMessage => write!(f, "response has no msg field"),
            Self::Unsuccessful(msg) => write!(f, "unsuccessful msg '{}'", msg),
            Self::MissingData => write!(f, "response has no data"),
        }
    }
}

impl ResponseEnvelope {
    /// Parse a response body. Anything that is not a JSON object is
    /// malformed; field types inside the object are not checked here.
    pub fn parse(path: &str, body: &[u8]) -> Result<Self> {
        let value = serde_json::from_slice::<Value>(body)
            .map_err(|e| AlphaEssError::malformed_body(path, e.to_string()))?;
        let Value::Object(mut fields) = value else {
            return Err(AlphaEssError::malformed_body(path, "body is not a JSON object"));
        };
        Ok(Self {
            code: fields.remove("code"),
            msg: fields.remove("msg"),
            data: fields.remove("data"),
        })
    }

    fn check_marker(&self) -> std::result::Result<(), BusinessFailure> {
        match &self.msg {
            None => Err(BusinessFailure::MissingMessage),
            Some(Value::String(msg)) if msg == SUCCESS_MSG => Ok(()),
            Some(Value::String(other)) => Err(BusinessFailure::Unsuccessful(other.clone())),
            Some(other) => Err(BusinessFailure::Unsuccessful(other.to_string())),
        }
    }

    /// Interpretation for read endpoints: data must be present and non-null
    pub fn interpret_get(self) -> std::result::Result<Value, BusinessFailure> {
        self.check_marker()?;
        match self.data {
            Some(Value::Null) | None => Err(BusinessFailure::MissingData),
            Some(data) => Ok(data),
        }
    }

    /// Interpretation for write endpoints: the marker alone is success and a
    /// null payload is just "nothing to return"
    pub fn interpret_post(self) -> std::result::Result<Option<Value>, BusinessFailure> {
        self.check_marker()?;
        Ok(self.data.filter(|d| !d.is_null()))
    }
}
