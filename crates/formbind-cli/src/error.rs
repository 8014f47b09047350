//! Error types and handling for the CLI
//!
//! Copyright (c) 2025 Formbind Team
//! Licensed under the Apache-2.0 license

use std::io;
use std::path::PathBuf;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error from formbind-core library
    #[error("Core error: {0}")]
    Core(#[from] formbind_core::Error),

    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Invalid file format for {}: expected {}", path.display(), expected)]
    InvalidFormat { path: PathBuf, expected: String },

    #[error("Configuration error: {0}")]
    Config(String),

    /// The bind completed but left errors in the error model
    #[error("Binding '{}' failed with {} error(s)", object_name, error_count)]
    BindFailed {
        object_name: String,
        error_count: usize,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Failure with context attached at the binary edge
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Core(_) => 2,
            Self::FileNotFound { .. } => 3,
            Self::InvalidFormat { .. } => 4,
            Self::Config(_) => 5,
            Self::BindFailed { .. } => 6,
            Self::Json(_) => 12,
            Self::Yaml(_) => 13,
            Self::Other(_) => 99,
        }
    }

    /// Check if this error should display usage help
    pub fn should_show_help(&self) -> bool {
        matches!(self, Self::InvalidFormat { .. })
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    let message = match error {
        // anyhow carries its own context chain
        Error::Other(inner) => format!("{:#}", inner),
        other => other.to_string(),
    };
    if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), message)
    } else {
        format!("Error: {}", message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(Error::config("bad").exit_code(), 5);
        assert_eq!(
            Error::BindFailed {
                object_name: "user".into(),
                error_count: 2
            }
            .exit_code(),
            6
        );
        assert_eq!(Error::Other(anyhow::anyhow!("boom")).exit_code(), 99);
    }

    #[test]
    fn test_format_error_plain() {
        let err = Error::BindFailed {
            object_name: "user".into(),
            error_count: 2,
        };
        assert_eq!(format_error(&err, false), "Error: Binding 'user' failed with 2 error(s)");
    }

    #[test]
    fn test_format_error_keeps_context_chain() {
        let err = Error::Other(anyhow::anyhow!("missing").context("reading input.json"));
        assert_eq!(format_error(&err, false), "Error: reading input.json: missing");
    }

    #[test]
    fn test_core_error_conversion() {
        let core = formbind_core::Error::configuration("no object name");
        let err: Error = core.into();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().starts_with("Core error:"));
    }
}
