//! Binder configuration
//!
//! Copyright (c) 2025 Formbind Team
//! Licensed under the Apache-2.0 license

use crate::access::{AccessMode, DEFAULT_AUTO_GROW_COLLECTION_LIMIT};
use crate::codes::DefaultMessageCodesResolver;
use crate::filter::FieldFilter;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything about a [`Binder`](super::Binder) that can be written down in
/// a configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinderConfig {
    pub access_mode: AccessMode,
    /// Skip input fields the target does not have
    pub ignore_unknown_fields: bool,
    /// Skip input fields whose path cannot be resolved, such as a null
    /// intermediate or an index beyond the growth limit
    pub ignore_invalid_fields: bool,
    pub auto_grow_nested_paths: bool,
    pub auto_grow_collection_limit: usize,
    /// `allowed_fields` and `disallowed_fields` glob patterns
    #[serde(flatten)]
    pub filter: FieldFilter,
    pub required_fields: Vec<String>,
    /// Prefix of marker entries announcing a field that may be absent, such
    /// as `_active` for an unchecked checkbox
    pub field_marker_prefix: Option<String>,
    /// Prefix of entries supplying a default for an absent field, such as `!active`
    pub field_default_prefix: Option<String>,
    pub message_codes: DefaultMessageCodesResolver,
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            access_mode: AccessMode::default(),
            ignore_unknown_fields: true,
            ignore_invalid_fields: false,
            auto_grow_nested_paths: true,
            auto_grow_collection_limit: DEFAULT_AUTO_GROW_COLLECTION_LIMIT,
            filter: FieldFilter::default(),
            required_fields: Vec::new(),
            field_marker_prefix: None,
            field_default_prefix: None,
            message_codes: DefaultMessageCodesResolver::default(),
        }
    }
}

impl BinderConfig {
    /// Load from a `.json`, `.yaml` or `.yml` file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text)?,
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text)?,
            other => {
                return Err(Error::Configuration {
                    message: format!(
                        "unsupported configuration format '{}'",
                        other.unwrap_or_default()
                    ),
                    path: Some(path.display().to_string()),
                })
            }
        };
        tracing::debug!(path = %path.display(), "loaded binder configuration");
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::CodeFormat;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = BinderConfig::default();
        assert!(config.ignore_unknown_fields);
        assert!(!config.ignore_invalid_fields);
        assert!(config.auto_grow_nested_paths);
        assert_eq!(config.auto_grow_collection_limit, 256);
        assert_eq!(config.access_mode, AccessMode::Property);
    }

    #[test]
    fn test_from_yaml_str() {
        let config = BinderConfig::from_yaml_str(
            r#"
access_mode: direct
allowed_fields: ["user.*"]
required_fields: [name]
field_marker_prefix: "_"
message_codes:
  prefix: "form."
  format: postfix-error-code
"#,
        )
        .unwrap();
        assert_eq!(config.access_mode, AccessMode::Direct);
        assert_eq!(config.filter.allowed, vec!["user.*"]);
        assert!(config.filter.disallowed.is_empty());
        assert_eq!(config.field_marker_prefix.as_deref(), Some("_"));
        assert_eq!(config.message_codes.format, CodeFormat::PostfixErrorCode);
        assert!(config.ignore_unknown_fields);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"auto_grow_collection_limit": 8, "ignore_invalid_fields": true}}"#).unwrap();

        let config = BinderConfig::from_file(file.path()).unwrap();
        assert_eq!(config.auto_grow_collection_limit, 8);
        assert!(config.ignore_invalid_fields);
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        let err = BinderConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, Error::Configuration { path: Some(_), .. }));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            BinderConfig::from_json_str("{\"access_mode\": \"reflective\"}"),
            Err(Error::Json { .. })
        ));
    }
}
