use crate::error::{AlphaEssError, Result};
use tracing::Level;

/// Parse a level name into a tracing level. Accepts `WARNING` as an alias.
pub fn parse_log_level(level_str: &str) -> Result<Level> {
    match level_str.trim().to_uppercase().as_str() {
        "TRACE" => Ok(Level::TRACE),
        "DEBUG" => Ok(Level::DEBUG),
        "INFO" => Ok(Level::INFO),
        "WARN" | "WARNING" => Ok(Level::WARN),
        "ERROR" => Ok(Level::ERROR),
        _ => Err(AlphaEssError::config(format!(
            "Invalid log level: {}",
            level_str
        ))),
    }
}
