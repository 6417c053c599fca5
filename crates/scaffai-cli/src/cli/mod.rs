//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums. No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::Value;

use scaffai_core::domain::TemplateCategory;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "scaffai",
    bin_name = "scaffai",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{26a1} Prompt templates in, project files out",
    long_about = "scaffai compiles prompt templates for AI code generation and \
                  recovers the generated files from the model's reply.",
    after_help = "EXAMPLES:\n\
        \x20 scaffai list --category component-generation\n\
        \x20 scaffai compile react-component --var componentName=Card --feature typescript\n\
        \x20 scaffai extract reply.txt --out ./my-app\n\
        \x20 scaffai completions bash > /usr/share/bash-completion/completions/scaffai",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List available templates.
    #[command(
        visible_alias = "ls",
        about = "List available templates",
        after_help = "EXAMPLES:\n\
            \x20 scaffai list\n\
            \x20 scaffai list --category animation\n\
            \x20 scaffai list --format json"
    )]
    List(ListArgs),

    /// Compile a template into a prompt.
    #[command(
        visible_alias = "c",
        about = "Compile a template into a prompt",
        after_help = "EXAMPLES:\n\
            \x20 scaffai compile react-project --var projectName=shop --ui-library mui\n\
            \x20 scaffai compile react-component --var componentName=Card -F typescript,accessibility\n\
            \x20 scaffai compile landing-page --var productName=Acme --var 'sections=[\"hero\",\"faq\"]' --json"
    )]
    Compile(CompileArgs),

    /// Extract generated files from a model reply.
    #[command(
        visible_alias = "x",
        about = "Extract files from model output",
        after_help = "EXAMPLES:\n\
            \x20 scaffai extract reply.txt\n\
            \x20 pbpaste | scaffai extract --format json\n\
            \x20 scaffai extract reply.txt --out ./my-app"
    )]
    Extract(ExtractArgs),

    /// Show template manager statistics.
    #[command(about = "Show template and cache statistics")]
    Stats(StatsArgs),

    /// Initialise a scaffai configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 scaffai init           # user config directory\n\
            \x20 scaffai init --local   # .scaffai.toml in CWD"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 scaffai completions bash > ~/.local/share/bash-completion/completions/scaffai\n\
            \x20 scaffai completions zsh  > ~/.zfunc/_scaffai\n\
            \x20 scaffai completions fish > ~/.config/fish/completions/scaffai.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the effective configuration.
    #[command(
        about = "Configuration inspection",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 scaffai config get templates.base_url\n\
            \x20 scaffai config list\n\
            \x20 scaffai config path"
    )]
    Config(ConfigCommands),
}

// ── list ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only templates in this category.
    #[arg(
        short = 'C',
        long = "category",
        value_name = "CATEGORY",
        value_parser = parse_category,
        help = "Filter by category (e.g. page-layout)"
    )]
    pub category: Option<TemplateCategory>,

    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One id per line.
    List,
    /// JSON array.
    Json,
}

// ── compile ───────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompileArgs {
    /// Template id, as shown by `scaffai list`.
    #[arg(value_name = "ID")]
    pub template_id: String,

    #[arg(long = "project-type", value_name = "TYPE", help = "Project type")]
    pub project_type: Option<String>,

    #[arg(
        long = "ui-library",
        value_name = "LIB",
        help = "UI library id (mui, antd, chakra, mantine, tailwind, shadcn, bootstrap, ...)"
    )]
    pub ui_library: Option<String>,

    #[arg(long = "framework", value_name = "NAME", help = "Framework")]
    pub framework: Option<String>,

    /// Features, repeatable or comma separated.
    #[arg(
        short = 'F',
        long = "feature",
        value_name = "FEATURE",
        value_delimiter = ',',
        help = "Enable a feature (repeatable)"
    )]
    pub features: Vec<String>,

    /// `KEY=VALUE`; VALUE is parsed as JSON when possible, else taken as a string.
    #[arg(
        long = "var",
        value_name = "KEY=VALUE",
        value_parser = parse_var,
        help = "Template variable (repeatable)"
    )]
    pub vars: Vec<(String, Value)>,

    #[arg(long = "json", help = "Print the full compiled prompt as JSON")]
    pub json: bool,
}

// ── extract ───────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// File holding the raw model output; stdin when omitted or `-`.
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Write the extracted files below this directory (must not exist).
    #[arg(short = 'o', long = "out", value_name = "DIR")]
    pub out: Option<PathBuf>,

    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ExtractFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExtractFormat {
    /// Paths and sizes.
    Table,
    /// `{ "files": { path: content }, "grammar": ... }`.
    Json,
}

// ── stats ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StatsArgs {
    #[arg(long = "json", help = "Print statistics as JSON")]
    pub json: bool,
}

// ── init ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write `.scaffai.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `templates.base_url`.
        key: String,
    },
    /// Print the effective configuration as TOML.
    List,
    /// Print the path of the user configuration file.
    Path,
}

// ── value parsers ─────────────────────────────────────────────────────────────

fn parse_category(s: &str) -> Result<TemplateCategory, String> {
    s.parse().map_err(|e: scaffai_core::domain::DomainError| {
        let valid: Vec<_> = TemplateCategory::ALL.iter().map(|c| c.as_str()).collect();
        format!("{e} (expected one of: {})", valid.join(", "))
    })
}

/// Split `KEY=VALUE` at the first `=`.
fn parse_var(s: &str) -> Result<(String, Value), String> {
    let (key, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty variable name in '{s}'"));
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};
    use serde_json::json;

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_var_prefers_json() {
        assert_eq!(parse_var("n=3").unwrap(), ("n".into(), json!(3)));
        assert_eq!(parse_var("flag=true").unwrap(), ("flag".into(), json!(true)));
        assert_eq!(
            parse_var("list=[\"a\",\"b\"]").unwrap(),
            ("list".into(), json!(["a", "b"]))
        );
    }

    #[test]
    fn parse_var_falls_back_to_string() {
        assert_eq!(
            parse_var("name=My App").unwrap(),
            ("name".into(), json!("My App"))
        );
        assert_eq!(parse_var("eq=a=b").unwrap(), ("eq".into(), json!("a=b")));
        assert_eq!(parse_var("empty=").unwrap(), ("empty".into(), json!("")));
    }

    #[test]
    fn parse_var_rejects_malformed() {
        assert!(parse_var("novalue").is_err());
        assert!(parse_var("=x").is_err());
    }

    #[test]
    fn parse_category_accepts_kebab_case() {
        assert_eq!(
            parse_category("page-layout").unwrap(),
            TemplateCategory::PageLayout
        );
        assert!(parse_category("poetry").unwrap_err().contains("animation"));
    }

    #[test]
    fn parse_compile_command() {
        let cli = Cli::parse_from([
            "scaffai",
            "compile",
            "react-component",
            "--var",
            "componentName=Card",
            "-F",
            "typescript,routing",
            "--feature",
            "state",
        ]);
        let Commands::Compile(args) = cli.command else {
            panic!("expected Compile command");
        };
        assert_eq!(args.template_id, "react-component");
        assert_eq!(args.features, ["typescript", "routing", "state"]);
        assert_eq!(args.vars.len(), 1);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["scaffai", "--quiet", "--verbose", "list"]);
        assert!(result.is_err());
    }
}
