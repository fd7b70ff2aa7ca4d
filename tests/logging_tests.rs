use alphaess::config::LoggingConfig;
use alphaess::logging::{LogContext, get_logger_with_context, init_logging, parse_log_level};
use tracing::Level;

#[test]
fn log_levels_accept_common_spellings() {
    assert_eq!(parse_log_level("debug").unwrap(), Level::DEBUG);
    assert_eq!(parse_log_level("WARNING").unwrap(), Level::WARN);
    assert!(parse_log_level("chatty").is_err());
}

#[test]
fn file_logging_initializes_once() {
    let dir = tempfile::tempdir().unwrap();
    let config = LoggingConfig {
        level: "DEBUG".to_string(),
        file: dir.path().join("alphaess.log").to_string_lossy().to_string(),
        console_output: false,
        ..LoggingConfig::default()
    };

    init_logging(&config).unwrap();
    // Second call is a no-op
    init_logging(&config).unwrap();

    let logger = get_logger_with_context(
        LogContext::new("test")
            .with_pass_id("p-1".to_string())
            .with_serial("AL1".to_string()),
    );
    logger.info("logging works");
}
