//! Error types and handling for the AlphaESS client
//!
//! Two classes of failure exist when talking to the Open API. Transport
//! failures (connection problems, unexpected HTTP status, timeouts, bodies
//! that are not JSON) are returned as [`AlphaEssError`]. Business failures,
//! where the server answers but the envelope does not carry the success
//! marker, are not errors at all: they surface as an absent value.

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, AlphaEssError>;

/// Main error type for the AlphaESS client
#[derive(Debug, Error)]
pub enum AlphaEssError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Validation errors
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// File I/O errors
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Serialization/deserialization errors outside of API responses
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Connection-level failures
    #[error("Network error: {message}")]
    Network { message: String },

    /// The server answered with a non-success HTTP status
    #[error("HTTP status {status} when calling {path}")]
    HttpStatus { status: u16, path: String },

    /// The response body could not be parsed as a JSON envelope
    #[error("Malformed response body from {path}: {message}")]
    MalformedBody { path: String, message: String },

    /// Timeout errors
    #[error("Timeout error: {message}")]
    Timeout { message: String },

    /// API-level conditions that make an operation impossible
    #[error("API error: {message}")]
    Api { message: String },
}

impl AlphaEssError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        AlphaEssError::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<F: Into<String>, S: Into<String>>(field: F, message: S) -> Self {
        AlphaEssError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        AlphaEssError::Io {
            message: message.into(),
        }
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        AlphaEssError::Network {
            message: message.into(),
        }
    }

    /// Create a new HTTP status error
    pub fn http_status<S: Into<String>>(status: u16, path: S) -> Self {
        AlphaEssError::HttpStatus {
            status,
            path: path.into(),
        }
    }

    /// Create a new malformed body error
    pub fn malformed_body<P: Into<String>, S: Into<String>>(path: P, message: S) -> Self {
        AlphaEssError::MalformedBody {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new timeout error
    pub fn timeout<S: Into<String>>(message: S) -> Self {
        AlphaEssError::Timeout {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        AlphaEssError::Api {
            message: message.into(),
        }
    }

    /// Whether this error belongs to the transport class (fatal for the call)
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            AlphaEssError::Network { .. }
                | AlphaEssError::HttpStatus { .. }
                | AlphaEssError::MalformedBody { .. }
                | AlphaEssError::Timeout { .. }
        )
    }
}

impl From<std::io::Error> for AlphaEssError {
    fn from(err: std::io::Error) -> Self {
        AlphaEssError::io(err.to_string())
    }
}

impl From<serde_yaml::Error> for AlphaEssError {
    fn from(err: serde_yaml::Error) -> Self {
        AlphaEssError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for AlphaEssError {
    fn from(err: serde_json::Error) -> Self {
        AlphaEssError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for AlphaEssError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AlphaEssError::timeout(err.to_string())
        } else if let Some(status) = err.status() {
            let path = err.url().map(|u| u.path().to_string()).unwrap_or_default();
            AlphaEssError::http_status(status.as_u16(), path)
        } else {
            AlphaEssError::network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = AlphaEssError::config("test config error");
        assert!(matches!(err, AlphaEssError::Config { .. }));

        let err = AlphaEssError::http_status(502, "/getEssList");
        assert!(matches!(err, AlphaEssError::HttpStatus { status: 502, .. }));

        let err = AlphaEssError::validation("field", "test validation error");
        assert!(matches!(err, AlphaEssError::Validation { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = AlphaEssError::config("test error");
        assert_eq!(format!("{}", err), "Configuration error: test error");

        let err = AlphaEssError::http_status(500, "/getEssList");
        assert_eq!(format!("{}", err), "HTTP status 500 when calling /getEssList");
    }

    #[test]
    fn test_transport_classification() {
        assert!(AlphaEssError::network("refused").is_transport());
        assert!(AlphaEssError::timeout("30s").is_transport());
        assert!(AlphaEssError::http_status(404, "/x").is_transport());
        assert!(AlphaEssError::malformed_body("/x", "eof").is_transport());
        assert!(!AlphaEssError::api("no systems").is_transport());
        assert!(!AlphaEssError::validation("soc", "range").is_transport());
    }
}
