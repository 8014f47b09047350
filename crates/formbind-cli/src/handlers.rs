//! Command handlers
//!
//! Copyright (c) 2025 Formbind Team
//! Licensed under the Apache-2.0 license

use crate::cli::{BindArgs, Cli, CodesArgs, CompletionsArgs};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::{redaction, timing::Timer};
use crate::output::{BindReport, OutputWriter};
use anyhow::Context;
use clap::CommandFactory;
use formbind_core::errors::MODEL_KEY_PREFIX;
use formbind_core::{Binder, FieldType, MessageCodesResolver, PropertyValues, Value};
use std::path::Path;

/// Bind an input document onto a target template.
///
/// The report is printed before the outcome is decided, so a failed bind
/// still shows its error model.
pub fn handle_bind(args: BindArgs, config: &Config, output: &OutputWriter) -> Result<()> {
    let object_name = args.name.clone().unwrap_or_else(|| config.object_name.clone());
    let target = load_document(&args.target).with_context(|| format!("reading target {}", args.target.display()))?;
    let input = load_document(&args.input).with_context(|| format!("reading input {}", args.input.display()))?;

    let Value::Object(fields) = input else {
        return Err(Error::InvalidFormat {
            path: args.input,
            expected: "an object of field paths".to_string(),
        });
    };
    let values = PropertyValues::from_json_object(&fields);

    let mut binder = Binder::new(target, object_name.clone())?.with_config(config.binder.clone());
    if !args.required.is_empty() {
        let mut required = config.binder.required_fields.clone();
        required.extend(args.required.iter().cloned());
        binder.set_required_fields(required);
    }

    {
        let _timer = Timer::new("bind");
        tracing::info!(object_name = %object_name, fields = values.len(), "Binding input");
        binder.bind(values);
    }

    let mut model = binder.binding_result().model()?;
    let mut errors = model
        .remove(&format!("{}{}", MODEL_KEY_PREFIX, object_name))
        .unwrap_or(Value::Null);
    let mut bound = model.remove(&object_name).unwrap_or(Value::Null);

    if let Some(path) = &args.save_to {
        let text = serde_json::to_string_pretty(&bound)?;
        std::fs::write(path, text)?;
        tracing::info!(path = %path.display(), "Saved bound target");
    }

    if config.output.redact {
        redaction::redact_json_value(&mut bound);
        redaction::redact_error_model(&mut errors);
    }
    let report = BindReport {
        object_name: object_name.clone(),
        target: bound,
        errors,
    };
    output.write(&output.render_bind_report(&report)?)?;

    binder.close().map_err(|e| Error::BindFailed {
        object_name,
        error_count: e.errors().error_count(),
    })
}

/// Print the message codes resolved for an error code
pub fn handle_codes(args: CodesArgs, config: &Config, output: &OutputWriter) -> Result<()> {
    let resolver = &config.binder.message_codes;
    let codes = match &args.field {
        Some(field) => {
            let field_type = args.field_type.map(FieldType::from);
            let field = formbind_core::path::canonicalize(field);
            resolver.resolve_field_codes(&args.code, &args.object, &field, field_type.as_ref())
        }
        None => resolver.resolve_object_codes(&args.code, &args.object),
    };
    tracing::debug!(code = %args.code, count = codes.len(), "Resolved message codes");
    output.write(&output.render_codes(&codes)?)
}

/// Print shell completions for the `formbind` binary
pub fn handle_completions(args: CompletionsArgs) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(args.shell.to_clap_shell(), &mut command, name, &mut std::io::stdout());
    Ok(())
}

/// Read a JSON or YAML document, chosen by extension
fn load_document(path: &Path) -> anyhow::Result<Value> {
    if !path.exists() {
        anyhow::bail!(Error::FileNotFound {
            path: path.to_path_buf()
        });
    }
    let text = std::fs::read_to_string(path)?;
    let value: Value = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&text)?,
        _ => serde_json::from_str(&text)?,
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use serde_json::json;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    fn quiet_writer() -> OutputWriter {
        OutputWriter::new(OutputFormat::Human, false, true)
    }

    fn bind_args(target: std::path::PathBuf, input: std::path::PathBuf) -> BindArgs {
        BindArgs {
            target,
            input,
            name: Some("user".into()),
            required: Vec::new(),
            save_to: None,
        }
    }

    #[test]
    fn test_bind_success_saves_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = write_file(&dir, "target.json", r#"{"name": "", "age": 0}"#);
        let input = write_file(&dir, "input.yaml", "name: Ann\nage: \"42\"\n");
        let saved = dir.path().join("out.json");

        let mut args = bind_args(target, input);
        args.save_to = Some(saved.clone());
        handle_bind(args, &Config::default(), &quiet_writer()).unwrap();

        let bound: Value = serde_json::from_str(&std::fs::read_to_string(saved).unwrap()).unwrap();
        assert_eq!(bound, json!({"name": "Ann", "age": 42}));
    }

    #[test]
    fn test_bind_failure_reports_error_count() {
        let dir = tempfile::tempdir().unwrap();
        let target = write_file(&dir, "target.json", r#"{"name": "", "age": 0}"#);
        let input = write_file(&dir, "input.json", r#"{"age": "old"}"#);

        let mut args = bind_args(target, input);
        args.required = vec!["name".into()];
        let err = handle_bind(args, &Config::default(), &quiet_writer()).unwrap_err();

        match err {
            Error::BindFailed {
                object_name,
                error_count,
            } => {
                assert_eq!(object_name, "user");
                assert_eq!(error_count, 2);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_bind_rejects_non_object_input() {
        let dir = tempfile::tempdir().unwrap();
        let target = write_file(&dir, "target.json", r#"{"name": ""}"#);
        let input = write_file(&dir, "input.json", r#"["name"]"#);

        let err = handle_bind(bind_args(target, input), &Config::default(), &quiet_writer()).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat { .. }));
    }

    #[test]
    fn test_bind_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_file(&dir, "input.json", "{}");
        let err = handle_bind(
            bind_args(dir.path().join("absent.json"), input),
            &Config::default(),
            &quiet_writer(),
        )
        .unwrap_err();

        assert_eq!(err.exit_code(), 99);
        assert!(crate::error::format_error(&err, false).contains("reading target"));
    }

    #[test]
    fn test_codes_command() {
        let args = CodesArgs {
            code: "required".into(),
            object: "user".into(),
            field: Some("items[ 0 ].sku".into()),
            field_type: None,
        };
        assert!(handle_codes(args, &Config::default(), &quiet_writer()).is_ok());
    }
}
