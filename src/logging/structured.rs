use tracing::{debug, error, info, warn};

/// Context information for log messages
#[derive(Debug, Clone)]
pub struct LogContext {
    /// Component name (e.g., "client", "aggregator", "settings")
    pub component: String,
    /// Aggregation pass identifier
    pub pass_id: Option<String>,
    /// System serial number the message concerns
    pub serial: Option<String>,
    /// Additional context fields
    pub extra_fields: std::collections::HashMap<String, String>,
}

impl LogContext {
    /// Create a new log context
    pub fn new(component: &str) -> Self {
        Self {
            component: component.to_string(),
            pass_id: None,
            serial: None,
            extra_fields: std::collections::HashMap::new(),
        }
    }

    /// Set aggregation pass ID
    pub fn with_pass_id(mut self, pass_id: String) -> Self {
        self.pass_id = Some(pass_id);
        self
    }

    /// Set system serial
    pub fn with_serial(mut self, serial: String) -> Self {
        self.serial = Some(serial);
        self
    }

    /// Add extra field
    pub fn with_field(mut self, key: &str, value: String) -> Self {
        self.extra_fields.insert(key.to_string(), value);
        self
    }
}

/// Structured logger with context
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    pub(crate) context: LogContext,
}

impl StructuredLogger {
    /// Create a new structured logger with context
    pub fn new(context: LogContext) -> Self {
        Self { context }
    }

    /// Derive a logger for one system, keeping the existing context
    pub fn for_serial(&self, serial: &str) -> Self {
        Self {
            context: self.context.clone().with_serial(serial.to_string()),
        }
    }

    /// Derive a logger with one more context field
    pub fn with_field(&self, key: &str, value: &str) -> Self {
        Self {
            context: self.context.clone().with_field(key, value.to_string()),
        }
    }

    pub fn info(&self, message: &str) {
        let fields = self.format_fields();
        info!(%fields, "{}", message);
    }
    pub fn warn(&self, message: &str) {
        let fields = self.format_fields();
        warn!(%fields, "{}", message);
    }
    pub fn error(&self, message: &str) {
        let fields = self.format_fields();
        error!(%fields, "{}", message);
    }
    pub fn debug(&self, message: &str) {
        let fields = self.format_fields();
        debug!(%fields, "{}", message);
    }

    fn format_fields(&self) -> String {
        let mut fields = vec![format!("component={}", self.context.component)];
        if let Some(ref pass_id) = self.context.pass_id {
            fields.push(format!("pass_id={}", pass_id));
        }
        if let Some(ref serial) = self.context.serial {
            fields.push(format!("sys_sn={}", serial));
        }
        let mut extra: Vec<_> = self.context.extra_fields.iter().collect();
        extra.sort();
        for (key, value) in extra {
            fields.push(format!("{}={}", key, value));
        }
        fields.join(",")
    }
}

/// Create a logger for a specific component
pub fn get_logger(component: &str) -> StructuredLogger {
    StructuredLogger::new(LogContext::new(component))
}
/// Create a logger with full context
pub fn get_logger_with_context(context: LogContext) -> StructuredLogger {
    StructuredLogger::new(context)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_are_rendered_in_stable_order() {
        let logger = get_logger_with_context(
            LogContext::new("client")
                .with_serial("AL1".to_string())
                .with_field("b", "2".to_string())
                .with_field("a", "1".to_string()),
        );
        assert_eq!(logger.format_fields(), "component=client,sys_sn=AL1,a=1,b=2");
    }

    #[test]
    fn for_serial_keeps_component() {
        let logger = get_logger("aggregator").for_serial("AL9");
        assert_eq!(logger.context.component, "aggregator");
        assert_eq!(logger.context.serial.as_deref(), Some("AL9"));
    }

    #[test]
    fn step_field_is_added_per_read() {
        let logger = get_logger_with_context(
            LogContext::new("aggregator").with_pass_id("p1".to_string()),
        )
        .for_serial("AL1")
        .with_field("step", "SumData");
        assert_eq!(
            logger.format_fields(),
            "component=aggregator,pass_id=p1,sys_sn=AL1,step=SumData"
        );
    }
}
