//! Error types for the formbind core library
//!
//! Data problems met while binding (unconvertible values, missing required
//! fields, validation failures) are never reported through [`Error`]: they
//! become entries in a [`BindingErrors`](crate::BindingErrors) model and
//! surface as a [`BindException`](crate::BindException) from `close()`.
//! [`Error`] covers the remaining recoverable failures such as loading a
//! configuration file or serializing a target.
//!
//! Copyright (c) 2025 Formbind Team
//! Licensed under the Apache-2.0 license

use crate::convert::ConvertError;
use thiserror::Error;

/// Main error type for formbind operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid or unreadable binder configuration
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        path: Option<String>,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("YAML error: {message}")]
    Yaml {
        message: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// A value-only conversion failed
    #[error("Conversion error: {source}")]
    Conversion {
        #[from]
        source: ConvertError,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
            path: None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Yaml {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}
