//! Logging setup for the Formbind CLI
//!
//! This module provides:
//! - Structured logging setup (compact, full or JSON lines on stderr)
//! - Redaction of sensitive values before they are printed
//! - Timing spans for CLI phases
//!
//! Copyright (c) 2025 Formbind Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use is_terminal::IsTerminal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{field, Span};
use tracing_subscriber::EnvFilter;

/// Environment variable selecting the log format
pub const LOG_FORMAT_ENV: &str = "FORMBIND_LOG_FORMAT";

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter, any `EnvFilter` directive
    pub level: String,
    pub format: LogFormat,
    /// Enable ANSI colors on stderr
    pub console: bool,
    pub thread_ids: bool,
    /// Include file and line numbers
    pub source_location: bool,
    /// Per-module levels, e.g. `formbind_core::binder = trace`
    pub module_filter: BTreeMap<String, String>,
}

/// Log output format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Compact format for everyday use
    Compact,
    /// Full format with all details
    Full,
    /// JSON structured format
    Json,
}

impl LogFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "compact" => Some(LogFormat::Compact),
            "full" => Some(LogFormat::Full),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
            console: true,
            thread_ids: false,
            source_location: false,
            module_filter: BTreeMap::new(),
        }
    }
}

impl LoggingConfig {
    /// Create logging config from verbosity level
    pub fn from_verbosity(verbosity: u8) -> Self {
        let mut config = Self::default();

        match verbosity {
            0 => {}
            1 => {
                config.level = "info".to_string();
            }
            2 => {
                config.level = "debug".to_string();
                config.source_location = true;
            }
            _ => {
                config.level = "trace".to_string();
                config.format = LogFormat::Full;
                config.source_location = true;
                config.thread_ids = true;
            }
        }

        config
    }

    /// Take format and module filters from a configuration file section.
    ///
    /// The file level only applies when no `-v` flag raised the level.
    pub fn merge_with_file(&mut self, file: &LoggingConfig, verbosity: u8) {
        if verbosity == 0 {
            self.level = file.level.clone();
        }
        if verbosity < 3 {
            self.format = file.format;
        }
        self.module_filter.extend(file.module_filter.clone());
    }

    /// Apply environment overrides, `RUST_LOG` and [`LOG_FORMAT_ENV`]
    pub fn merge_with_env(&mut self) {
        if let Ok(rust_log) = std::env::var("RUST_LOG") {
            self.level = rust_log;
        }

        if let Ok(format) = std::env::var(LOG_FORMAT_ENV) {
            match LogFormat::from_name(&format) {
                Some(parsed) => self.format = parsed,
                None => eprintln!("Warning: invalid log format '{}', using default", format),
            }
        }
    }
}

/// Initialize the global logging system
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let env_filter = create_env_filter(&config)?;
    let ansi = config.console && std::io::stderr().is_terminal();

    // one arm per format, the subscriber types differ
    let installed = match config.format {
        LogFormat::Compact => tracing::subscriber::set_global_default(
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(ansi)
                .with_thread_ids(config.thread_ids)
                .with_file(config.source_location)
                .with_line_number(config.source_location)
                .compact()
                .finish(),
        ),
        LogFormat::Json => tracing::subscriber::set_global_default(
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(false)
                .with_thread_ids(config.thread_ids)
                .with_file(config.source_location)
                .with_line_number(config.source_location)
                .json()
                .finish(),
        ),
        LogFormat::Full => tracing::subscriber::set_global_default(
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(ansi)
                .with_thread_ids(config.thread_ids)
                .with_file(config.source_location)
                .with_line_number(config.source_location)
                .finish(),
        ),
    };
    installed.map_err(|e| Error::config(format!("Failed to initialize logging: {}", e)))?;

    tracing::debug!(config = ?config, "Logging system initialized");
    Ok(())
}

fn create_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let mut filter = EnvFilter::try_new(&config.level)
        .map_err(|e| Error::config(format!("Invalid log level '{}': {}", config.level, e)))?;

    for (module, level) in &config.module_filter {
        let directive = format!("{}={}", module, level)
            .parse()
            .map_err(|e| Error::config(format!("Invalid filter directive: {}", e)))?;
        filter = filter.add_directive(directive);
    }

    Ok(filter)
}

/// Create a span for one CLI phase
pub fn create_operation_span(operation: &str) -> Span {
    tracing::info_span!("operation", operation = operation, duration_ms = field::Empty)
}

/// Sensitive data redaction utilities
pub mod redaction {
    use regex::Regex;
    use serde_json::Value;
    use std::sync::OnceLock;

    /// Replacement for redacted values
    pub const REDACTED: &str = "***";

    static SECRET_ASSIGNMENT: OnceLock<Option<Regex>> = OnceLock::new();
    static SENSITIVE_KEY: OnceLock<Option<Regex>> = OnceLock::new();

    fn secret_assignment() -> Option<&'static Regex> {
        SECRET_ASSIGNMENT
            .get_or_init(|| {
                Regex::new(r#"(?i)(api[_-]?key|token|bearer|password|passwd|pwd|secret)[=:\s]+['"]?[^\s'",]{3,}['"]?"#)
                    .ok()
            })
            .as_ref()
    }

    fn sensitive_key() -> Option<&'static Regex> {
        SENSITIVE_KEY
            .get_or_init(|| Regex::new(r"(?i)(password|passwd|pwd|secret|token|credential|api[_-]?key|auth)").ok())
            .as_ref()
    }

    /// Redact `key=value` style secrets from a string
    pub fn redact_sensitive(input: &str) -> String {
        match secret_assignment() {
            Some(regex) => regex.replace_all(input, format!("$1={}", REDACTED).as_str()).into_owned(),
            None => input.to_string(),
        }
    }

    /// Whether a field name or path segment names a secret
    pub fn is_sensitive_key(key: &str) -> bool {
        sensitive_key().is_some_and(|regex| regex.is_match(key))
    }

    /// Redact sensitive information from JSON values, recursively
    pub fn redact_json_value(value: &mut Value) {
        match value {
            Value::Object(map) => {
                for (key, val) in map.iter_mut() {
                    if is_sensitive_key(key) && !val.is_null() {
                        *val = Value::String(REDACTED.to_string());
                    } else {
                        redact_json_value(val);
                    }
                }
            }
            Value::Array(items) => items.iter_mut().for_each(redact_json_value),
            Value::String(s) => *s = redact_sensitive(s),
            _ => {}
        }
    }

    /// Redact the rejected values of error-model entries on sensitive fields
    ///
    /// Works on the serialized form of `BindingErrors`, where each field
    /// error carries `field` and `rejected_value`.
    pub fn redact_error_model(errors: &mut Value) {
        let Some(entries) = errors.get_mut("errors").and_then(Value::as_array_mut) else {
            return;
        };
        for entry in entries {
            let sensitive = entry
                .get("field")
                .and_then(Value::as_str)
                .is_some_and(is_sensitive_key);
            if sensitive {
                if let Some(rejected) = entry.get_mut("rejected_value") {
                    if !rejected.is_null() {
                        *rejected = Value::String(REDACTED.to_string());
                    }
                }
            }
        }
    }
}

/// Performance timing utilities
pub mod timing {
    use std::time::Instant;
    use tracing::Span;

    /// A timer that logs its duration when dropped
    pub struct Timer {
        start: Instant,
        span: Span,
        operation: String,
    }

    impl Timer {
        pub fn new(operation: &str) -> Self {
            Self {
                start: Instant::now(),
                span: super::create_operation_span(operation),
                operation: operation.to_string(),
            }
        }
    }

    impl Drop for Timer {
        fn drop(&mut self) {
            let duration = self.start.elapsed();
            self.span.record("duration_ms", duration.as_millis() as u64);

            tracing::debug!(
                operation = %self.operation,
                duration_ms = duration.as_millis() as u64,
                "Operation completed"
            );
        }
    }
}
