//! Application layer errors.
//!
//! These errors represent failures in orchestration, not template logic.
//! Template and grammar errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// No template with this id is registered.
    #[error("Template not found: {id}")]
    TemplateNotFound { id: String },

    /// A local template resource was unreachable or malformed.
    #[error("Failed to load template from {source_name}: {reason}")]
    TemplateLoad { source_name: String, reason: String },

    /// Remote catalog not configured, unreachable, or returned an error.
    #[error("Remote template catalog unavailable: {reason}")]
    RemoteUnavailable { reason: String },

    /// Store access failed (lock poisoned, etc.).
    #[error("Template store error")]
    StoreLockError,

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Generated file path escapes the output root.
    #[error("Refusing to write outside the output directory: {path}")]
    UnsafePath { path: String },

    /// Output directory already exists.
    #[error("Output already exists at {path}")]
    OutputExists { path: PathBuf },

    /// Rollback failed (best-effort cleanup failed).
    #[error("Rollback failed for {path}: {reason}")]
    RollbackFailed { path: PathBuf, reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TemplateNotFound { id } => vec![
                format!("No template registered with id '{}'", id),
                "Try: scaffai list to see available templates".into(),
            ],
            Self::TemplateLoad { source_name, .. } => vec![
                format!("Check that {} exists and is valid template JSON", source_name),
                "Required fields: id, name, version, category, content, variables, metadata"
                    .into(),
            ],
            Self::RemoteUnavailable { .. } => vec![
                "Check templates.base_url in your configuration".into(),
                "Set templates.fallback_mode = true to continue with builtin templates".into(),
            ],
            Self::StoreLockError => vec![
                "The template store is locked".into(),
                "Try again in a moment".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::UnsafePath { path } => vec![
                format!("Generated path '{}' is absolute or contains '..'", path),
                "The model output was not written; review it manually".into(),
            ],
            Self::OutputExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Choose a different --out directory".into(),
            ],
            Self::RollbackFailed { path, .. } => vec![format!(
                "Partial output may remain at {}; remove it manually",
                path.display()
            )],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TemplateNotFound { .. } => ErrorCategory::NotFound,
            Self::TemplateLoad { .. } => ErrorCategory::Validation,
            Self::RemoteUnavailable { .. } => ErrorCategory::Configuration,
            Self::StoreLockError => ErrorCategory::Internal,
            Self::FilesystemError { .. } | Self::RollbackFailed { .. } => ErrorCategory::Internal,
            Self::UnsafePath { .. } | Self::OutputExists { .. } => ErrorCategory::Validation,
        }
    }
}
