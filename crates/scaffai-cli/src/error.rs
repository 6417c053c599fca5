//! CLI error type, exit codes, and the stderr report printed on failure.

use std::error::Error;
use std::fmt::Write as _;

use owo_colors::OwoColorize;
use thiserror::Error;

use scaffai_core::error::{ErrorCategory as CoreCategory, ScaffaiError};

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Arguments that parsed but make no sense together.
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[source]
        source: Option<Box<dyn Error + Send + Sync>>,
    },

    /// Config file unreadable, malformed, or asked for an unknown key.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn Error + Send + Sync>>,
    },

    #[error("{0}")]
    Core(#[from] ScaffaiError),

    /// The extractor recognised no files in the model output.
    #[error("Could not parse generated output from {source_name}: no files found")]
    NoFilesExtracted { source_name: String },

    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<std::io::Error> for CliError {
    fn from(source: std::io::Error) -> Self {
        Self::IoError {
            message: source.to_string(),
            source,
        }
    }
}

/// Broad failure class; decides the exit code and the log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    UserError,
    NotFound,
    Configuration,
    Internal,
}

impl ErrorCategory {
    /// 2 user error, 3 not found, 4 configuration, 1 anything else.
    pub fn exit_code(self) -> u8 {
        match self {
            Self::UserError => 2,
            Self::NotFound => 3,
            Self::Configuration => 4,
            Self::Internal => 1,
        }
    }
}

impl From<CoreCategory> for ErrorCategory {
    fn from(core: CoreCategory) -> Self {
        match core {
            CoreCategory::Validation => Self::UserError,
            CoreCategory::NotFound => Self::NotFound,
            CoreCategory::Configuration => Self::Configuration,
            CoreCategory::Internal => Self::Internal,
        }
    }
}

impl CliError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            source: None,
        }
    }

    /// Hints printed under the error message.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { .. } => vec!["Run the command with --help to see its arguments".into()],
            Self::ConfigError { .. } => vec![
                "Show the effective configuration with: scaffai config list".into(),
                "Recreate a default file with: scaffai init --force".into(),
                "SCAFFAI_<SECTION>__<KEY> environment variables override files".into(),
            ],
            Self::Core(core) => core.suggestions(),
            Self::NoFilesExtracted { .. } => vec![
                "The output contains neither '===FILE: <path> ===' markers nor fenced \
                 code blocks starting with a '// <path>' comment"
                    .into(),
                "Ask the model to follow the file format in the prompt and retry".into(),
            ],
            Self::IoError { .. } => vec![
                "Check that the path exists and is readable/writable".into(),
            ],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } => ErrorCategory::UserError,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::Core(core) => core.category().into(),
            Self::NoFilesExtracted { .. } => ErrorCategory::NotFound,
            Self::IoError { .. } => ErrorCategory::Internal,
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.category().exit_code()
    }

    /// Report with ANSI styling, for a terminal.
    pub fn format_colored(&self, verbose: bool) -> String {
        self.render(verbose, true)
    }

    /// Report without escape codes, for pipes and log files.
    pub fn format_plain(&self, verbose: bool) -> String {
        self.render(verbose, false)
    }

    fn render(&self, verbose: bool, styled: bool) -> String {
        let paint = |text: &str, f: fn(&str) -> String| {
            if styled { f(text) } else { text.to_owned() }
        };

        let mut out = String::new();
        let _ = writeln!(
            out,
            "\n{} {self}",
            paint("Error:", |s| s.red().bold().to_string())
        );

        if verbose {
            let mut cause = self.source();
            while let Some(err) = cause {
                let _ = writeln!(
                    out,
                    "  {}",
                    paint(&format!("Caused by: {err}"), |s| s.dimmed().to_string())
                );
                cause = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            let _ = writeln!(
                out,
                "\n{}",
                paint("Suggestions:", |s| s.yellow().bold().to_string())
            );
            for hint in &suggestions {
                let _ = writeln!(out, "  - {hint}");
            }
        }

        if !verbose {
            let _ = writeln!(
                out,
                "\n{}",
                paint("Use -v / --verbose for more details.", |s| s
                    .dimmed()
                    .to_string())
            );
        }
        out
    }

    /// Emit one event at a level matching the category.
    pub fn log(&self) {
        let cause = self.source().map(ToString::to_string);
        match self.category() {
            ErrorCategory::UserError | ErrorCategory::NotFound => {
                tracing::warn!(category = ?self.category(), cause, "{self}");
            }
            ErrorCategory::Configuration | ErrorCategory::Internal => {
                tracing::error!(category = ?self.category(), cause, "{self}");
            }
        }
    }
}

/// Attach a message to a foreign error while converting it into [`CliError`].
pub trait IntoCli<T> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|source| CliError::IoError {
            message: f().into(),
            source,
        })
    }
}

impl<T> IntoCli<T> for Result<T, ScaffaiError> {
    /// Core errors already name what failed; the message is dropped.
    fn with_cli_context<F, S>(self, _f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(CliError::Core)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scaffai_core::application::ApplicationError;
    use scaffai_core::domain::DomainError;
    use std::io;

    fn not_found() -> CliError {
        ScaffaiError::from(ApplicationError::TemplateNotFound { id: "nope".into() }).into()
    }

    #[test]
    fn no_files_suggestions_mention_marker_format() {
        let err = CliError::NoFilesExtracted {
            source_name: "stdin".into(),
        };
        assert!(err.suggestions().iter().any(|s| s.contains("===FILE:")));
    }

    #[test]
    fn core_suggestions_are_forwarded() {
        assert!(not_found().suggestions().iter().any(|s| s.contains("scaffai list")));
    }

    #[test]
    fn exit_codes_follow_category() {
        assert_eq!(CliError::invalid_input("x").exit_code(), 2);

        let missing: CliError =
            ScaffaiError::from(DomainError::MissingRequiredVariable { name: "a".into() }).into();
        assert_eq!(missing.exit_code(), 2);

        assert_eq!(not_found().exit_code(), 3);
        assert_eq!(
            CliError::NoFilesExtracted {
                source_name: "f".into()
            }
            .exit_code(),
            3
        );

        let remote: CliError = ScaffaiError::from(ApplicationError::RemoteUnavailable {
            reason: "down".into(),
        })
        .into();
        assert_eq!(remote.exit_code(), 4);
        assert_eq!(
            CliError::ConfigError {
                message: "bad".into(),
                source: None
            }
            .exit_code(),
            4
        );

        assert_eq!(CliError::from(io::Error::other("e")).exit_code(), 1);
    }

    #[test]
    fn plain_report_has_header_and_hint() {
        let report = CliError::invalid_input("bad --var").format_plain(false);
        assert!(report.contains("Error: Invalid input: bad --var"));
        assert!(report.contains("Suggestions:"));
        assert!(report.contains("--verbose"));
        assert!(!report.contains('\u{1b}'));
    }

    #[test]
    fn verbose_report_shows_cause_chain() {
        let err = CliError::IoError {
            message: "reading input".into(),
            source: io::Error::other("disk on fire"),
        };
        let report = err.format_plain(true);
        assert!(report.contains("Caused by: disk on fire"));
        assert!(!report.contains("--verbose"));
    }

    #[test]
    fn colored_report_has_escape_codes() {
        assert!(not_found().format_colored(false).contains('\u{1b}'));
    }

    #[test]
    fn io_context_replaces_message() {
        let result: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::NotFound, "missing"));
        let cli = result.with_cli_context(|| "reading config");
        assert!(matches!(cli, Err(CliError::IoError { ref message, .. }) if message == "reading config"));
    }
}
