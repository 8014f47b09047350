//! Output formatting for bind reports and message codes
//!
//! Copyright (c) 2025 Formbind Team
//! Licensed under the Apache-2.0 license

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};

/// Outcome of one `bind` invocation, as printed
#[derive(Debug, Clone, Serialize)]
pub struct BindReport {
    pub object_name: String,
    /// The target after binding
    pub target: Value,
    /// Serialized error model
    pub errors: Value,
}

impl BindReport {
    pub fn error_count(&self) -> usize {
        self.errors
            .get("error_count")
            .and_then(Value::as_u64)
            .unwrap_or_default() as usize
    }
}

/// Writes results to stdout in the selected format
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
}

impl OutputWriter {
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self {
            format,
            use_color,
            quiet,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Serialize a value in a machine-readable format, pretty JSON for human output
    pub fn render<T: Serialize>(&self, value: &T) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            OutputFormat::JsonPretty | OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
        }
    }

    pub fn render_bind_report(&self, report: &BindReport) -> Result<String> {
        match self.format {
            OutputFormat::Human => Ok(self.human_bind_report(report)),
            _ => self.render(report),
        }
    }

    pub fn render_codes(&self, codes: &[String]) -> Result<String> {
        match self.format {
            OutputFormat::Human => Ok(codes.join("\n")),
            _ => self.render(&codes),
        }
    }

    fn human_bind_report(&self, report: &BindReport) -> String {
        let mut out = String::new();
        let target = serde_json::to_string_pretty(&report.target).unwrap_or_else(|_| report.target.to_string());
        out.push_str(&self.heading(&format!("Bound '{}'", report.object_name)));
        out.push('\n');
        out.push_str(&target);
        out.push('\n');

        let count = report.error_count();
        if count == 0 {
            out.push_str(&self.success("No binding errors"));
            out.push('\n');
            return out;
        }

        out.push_str(&self.failure(&format!("{} error(s)", count)));
        out.push('\n');
        let entries = report.errors.get("errors").and_then(Value::as_array);
        for entry in entries.into_iter().flatten() {
            out.push_str("  ");
            out.push_str(&self.human_entry(entry));
            out.push('\n');
        }
        if let Some(suppressed) = report.errors.get("suppressed_fields").and_then(Value::as_array) {
            if !suppressed.is_empty() {
                let names: Vec<&str> = suppressed.iter().filter_map(Value::as_str).collect();
                out.push_str(&format!("Suppressed fields: {}\n", names.join(", ")));
            }
        }
        out
    }

    fn human_entry(&self, entry: &Value) -> String {
        let code = entry
            .get("error_code")
            .or_else(|| entry.get("codes").and_then(Value::as_array).and_then(|codes| codes.last()))
            .and_then(Value::as_str)
            .unwrap_or("?");
        let message = entry.get("default_message").and_then(Value::as_str);

        let subject = match entry.get("field").and_then(Value::as_str) {
            Some(field) => field.to_string(),
            None => "(global)".to_string(),
        };
        let mut line = if self.use_color {
            format!("{} {}", subject.bold(), code.yellow())
        } else {
            format!("{} {}", subject, code)
        };
        if let Some(rejected) = entry.get("rejected_value").filter(|v| !v.is_null()) {
            line.push_str(&format!(" [rejected: {}]", formbind_core::value::display_value(rejected)));
        }
        if let Some(message) = message {
            line.push_str(&format!(" - {}", message));
        }
        line
    }

    fn heading(&self, text: &str) -> String {
        if self.use_color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn success(&self, text: &str) -> String {
        if self.use_color {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }

    fn failure(&self, text: &str) -> String {
        if self.use_color {
            text.red().bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// Print a rendered block to stdout unless running quietly in human mode
    pub fn write(&self, rendered: &str) -> Result<()> {
        if self.quiet && self.format == OutputFormat::Human {
            return Ok(());
        }
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", rendered.trim_end())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn report() -> BindReport {
        BindReport {
            object_name: "user".into(),
            target: json!({"name": "Ann", "age": 0}),
            errors: json!({
                "object_name": "user",
                "error_count": 1,
                "errors": [{
                    "kind": "field",
                    "object_name": "user",
                    "codes": ["type-mismatch.user.age", "type-mismatch"],
                    "arguments": [],
                    "default_message": "Failed to convert",
                    "field": "age",
                    "rejected_value": "old",
                    "binding_failure": true
                }],
                "suppressed_fields": ["role"]
            }),
        }
    }

    #[test]
    fn test_human_report() {
        let writer = OutputWriter::new(OutputFormat::Human, false, false);
        let text = writer.render_bind_report(&report()).unwrap();

        assert!(text.starts_with("Bound 'user'\n"));
        assert!(text.contains("1 error(s)"));
        assert!(text.contains("  age type-mismatch [rejected: old] - Failed to convert"));
        assert!(text.contains("Suppressed fields: role"));
    }

    #[test]
    fn test_human_report_shows_unprefixed_code() {
        let writer = OutputWriter::new(OutputFormat::Human, false, false);
        let mut prefixed = report();
        prefixed.errors["errors"][0]["codes"] = json!(["form.type-mismatch.user.age", "form.type-mismatch"]);
        prefixed.errors["errors"][0]["error_code"] = json!("type-mismatch");

        let text = writer.render_bind_report(&prefixed).unwrap();
        assert!(text.contains("  age type-mismatch [rejected: old]"));
    }

    #[test]
    fn test_human_report_without_errors() {
        let writer = OutputWriter::new(OutputFormat::Human, false, false);
        let mut clean = report();
        clean.errors = json!({"object_name": "user", "error_count": 0, "errors": [], "suppressed_fields": []});

        let text = writer.render_bind_report(&clean).unwrap();
        assert!(text.ends_with("No binding errors\n"));
        assert_eq!(clean.error_count(), 0);
    }

    #[test]
    fn test_json_report() {
        let writer = OutputWriter::new(OutputFormat::Json, false, false);
        let text = writer.render_bind_report(&report()).unwrap();
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["target"]["name"], "Ann");
        assert_eq!(parsed["errors"]["errors"][0]["field"], "age");
    }

    #[test]
    fn test_codes_rendering() {
        let codes = vec!["required.user.name".to_string(), "required".to_string()];
        let human = OutputWriter::new(OutputFormat::Human, false, false);
        assert_eq!(human.render_codes(&codes).unwrap(), "required.user.name\nrequired");

        let yaml = OutputWriter::new(OutputFormat::Yaml, false, false);
        assert!(yaml.render_codes(&codes).unwrap().contains("- required.user.name"));
    }
}
