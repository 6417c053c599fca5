// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (they are cached alongside nothing, but travel through layers)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    /// A candidate template definition is structurally malformed.
    ///
    /// `field` names the first missing or malformed field, in the order
    /// `id, name, version, category, content, variables, metadata`.
    #[error("Template validation failed at '{field}': {reason}")]
    TemplateValidation { field: String, reason: String },

    #[error("Unknown template category '{0}'")]
    UnknownCategory(String),

    // ========================================================================
    // Constraint Violations
    // ========================================================================
    #[error("Missing required variable: {name}")]
    MissingRequiredVariable { name: String },
}

impl DomainError {
    /// Build a validation error for `field`.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::TemplateValidation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidTemplate(msg) => vec![
                "The template content or definition is malformed".into(),
                format!("Details: {}", msg),
                "Every {{#if ...}} block must be closed with {{/if}}".into(),
            ],
            Self::TemplateValidation { field, .. } => vec![
                format!("Check the '{}' field of the template definition", field),
                "Required fields: id, name, version, category, content, variables, metadata"
                    .into(),
            ],
            Self::UnknownCategory(_) => vec![
                "Valid categories:".into(),
                "  • project-creation, component-generation, page-layout".into(),
                "  • animation, styling, testing, documentation".into(),
            ],
            Self::MissingRequiredVariable { name } => vec![
                format!("Provide a value for '{}'", name),
                format!("Example: scaffai compile <ID> --var {}=...", name),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidTemplate(_) | Self::TemplateValidation { .. } => {
                ErrorCategory::Validation
            }
            Self::UnknownCategory(_) | Self::MissingRequiredVariable { .. } => {
                ErrorCategory::Validation
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_names_field() {
        let err = DomainError::validation("content", "missing");
        assert!(err.to_string().contains("'content'"));
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn missing_variable_suggests_var_flag() {
        let err = DomainError::MissingRequiredVariable {
            name: "projectName".into(),
        };
        assert!(err.suggestions().iter().any(|s| s.contains("--var")));
    }
}
