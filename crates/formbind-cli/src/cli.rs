//! Command-line interface argument parsing and definitions
//!
//! Copyright (c) 2025 Formbind Team
//! Licensed under the Apache-2.0 license

use clap::{Parser, Subcommand, ValueEnum};
use formbind_core::FieldType;
use is_terminal::IsTerminal;
use std::path::PathBuf;

/// Formbind CLI - bind loosely-typed input documents onto typed templates
///
/// Applies a JSON or YAML document of named input values onto a JSON
/// template and reports every binding failure as a structured error model.
#[derive(Parser, Debug)]
#[command(
    name = "formbind",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file (JSON or YAML)
    #[arg(short, long, global = true, env = "FORMBIND_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Bind an input document onto a target template
    Bind(BindArgs),

    /// Print the message codes resolved for an error code
    Codes(CodesArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
pub struct BindArgs {
    /// JSON template the input is bound onto
    #[arg(short, long, value_name = "TARGET")]
    pub target: PathBuf,

    /// Input values, a flat JSON or YAML object of field paths
    #[arg(short, long, value_name = "INPUT")]
    pub input: PathBuf,

    /// Object name used in error codes (overrides the configuration)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Fields that must be present and non-blank
    #[arg(long = "require", value_delimiter = ',')]
    pub required: Vec<String>,

    /// Write the bound target to a file
    #[arg(long = "save-to", value_name = "OUTPUT_FILE")]
    pub save_to: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct CodesArgs {
    /// Error code, e.g. `required` or `type-mismatch`
    pub code: String,

    /// Object name
    #[arg(long, default_value = "target")]
    pub object: String,

    /// Field path; object codes are printed when omitted
    #[arg(long)]
    pub field: Option<String>,

    /// Type of the field
    #[arg(long = "type", value_enum)]
    pub field_type: Option<FieldTypeArg>,
}

#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    Json,
    JsonPretty,
    Yaml,
}

impl OutputFormat {
    /// Parse a format name from the configuration file
    pub fn from_name(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name, true).ok()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FieldTypeArg {
    Boolean,
    Integer,
    Float,
    String,
    Array,
    Object,
}

impl From<FieldTypeArg> for FieldType {
    fn from(arg: FieldTypeArg) -> Self {
        match arg {
            FieldTypeArg::Boolean => FieldType::Boolean,
            FieldTypeArg::Integer => FieldType::Integer,
            FieldTypeArg::Float => FieldType::Float,
            FieldTypeArg::String => FieldType::String,
            FieldTypeArg::Array => FieldType::Array(None),
            FieldTypeArg::Object => FieldType::Object,
        }
    }
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Effective verbosity level, zero in quiet mode
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bind() {
        let cli = Cli::parse_from([
            "formbind", "-vv", "bind", "--target", "t.json", "--input", "i.yaml", "--require", "name,age",
        ]);
        assert_eq!(cli.verbosity_level(), 2);
        match cli.command {
            Commands::Bind(args) => {
                assert_eq!(args.target, PathBuf::from("t.json"));
                assert_eq!(args.input, PathBuf::from("i.yaml"));
                assert_eq!(args.required, vec!["name", "age"]);
                assert!(args.name.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_codes() {
        let cli = Cli::parse_from([
            "formbind", "--format", "json", "codes", "required", "--object", "user", "--field", "name", "--type",
            "string",
        ]);
        assert_eq!(cli.format, Some(OutputFormat::Json));
        match cli.command {
            Commands::Codes(args) => {
                assert_eq!(args.code, "required");
                assert_eq!(args.object, "user");
                assert_eq!(args.field.as_deref(), Some("name"));
                assert_eq!(args.field_type.map(FieldType::from), Some(FieldType::String));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_quiet_resets_verbosity() {
        let cli = Cli::parse_from(["formbind", "--quiet", "codes", "required"]);
        assert_eq!(cli.verbosity_level(), 0);
    }

    #[test]
    fn test_output_format_from_name() {
        assert_eq!(OutputFormat::from_name("json-pretty"), Some(OutputFormat::JsonPretty));
        assert_eq!(OutputFormat::from_name("HUMAN"), Some(OutputFormat::Human));
        assert_eq!(OutputFormat::from_name("xml"), None);
    }
}
