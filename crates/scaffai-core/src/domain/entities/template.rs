//! Template aggregate.
//!
//! A [`Template`] is a parameterized prompt document: declared variables plus
//! a body written in the grammar from [`crate::domain::grammar`]. Templates
//! are registered in a store and compiled against a
//! [`PromptContext`](super::context::PromptContext) to produce a
//! [`CompiledPrompt`](super::compiled::CompiledPrompt).
//!
//! ## JSON contract
//!
//! The serde representation is the remote catalog format:
//!
//! ```json
//! {
//!   "id": "react-component",
//!   "name": "React Component",
//!   "description": "Generate a single component",
//!   "version": "1.0.0",
//!   "category": "component-generation",
//!   "tags": ["react"],
//!   "variables": [
//!     { "name": "componentName", "type": "string", "required": true }
//!   ],
//!   "content": "Create {{componentName}} using {{uiLibraryName}}.",
//!   "metadata": { "author": "scaffai", "license": "MIT" }
//! }
//! ```

use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{
    error::DomainError,
    grammar::{self, TemplateAst},
    value_objects::{TemplateCategory, VariableType},
};

// ============================================================================
// Core Template Aggregate
// ============================================================================

/// A reusable prompt blueprint.
///
/// ## Invariants (enforced by `validate()`)
///
/// 1. `id` and `name` are non-empty
/// 2. `content` parses: every `{{#if}}` is closed, no stray `{{/if}}`
/// 3. Variable names are unique
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub version: String,
    pub category: TemplateCategory,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Declared variables, in declaration order.
    pub variables: Vec<Variable>,
    /// Body in the template grammar.
    pub content: String,
    pub metadata: TemplateMetadata,
}

impl Template {
    pub fn builder() -> TemplateBuilder {
        TemplateBuilder::default()
    }

    /// Validate all invariants.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.trim().is_empty() {
            return Err(DomainError::InvalidTemplate(
                "Template id cannot be empty".into(),
            ));
        }

        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidTemplate(format!(
                "Template '{}' has an empty name",
                self.id
            )));
        }

        let mut seen = HashSet::new();
        for variable in &self.variables {
            if variable.name.trim().is_empty() {
                return Err(DomainError::InvalidTemplate(format!(
                    "Template '{}' declares a variable with an empty name",
                    self.id
                )));
            }
            if !seen.insert(variable.name.as_str()) {
                return Err(DomainError::InvalidTemplate(format!(
                    "Template '{}' declares variable '{}' more than once",
                    self.id, variable.name
                )));
            }
        }

        self.ast().map_err(|e| match e {
            DomainError::InvalidTemplate(msg) => {
                DomainError::InvalidTemplate(format!("template '{}': {msg}", self.id))
            }
            other => other,
        })?;

        Ok(())
    }

    /// Parse `content` into an AST.
    pub fn ast(&self) -> Result<TemplateAst, DomainError> {
        grammar::parse(&self.content)
    }

    /// Variables marked `required`.
    pub fn required_variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables.iter().filter(|v| v.required)
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }
}

/// Builder for constructing templates in code (builtins, tests).
///
/// `build()` enforces presence of `id`, `name`, `category` and `content`, then
/// runs [`Template::validate`].
#[derive(Default)]
pub struct TemplateBuilder {
    id: Option<String>,
    name: Option<String>,
    description: String,
    version: Option<String>,
    category: Option<TemplateCategory>,
    tags: BTreeSet<String>,
    variables: Vec<Variable>,
    content: Option<String>,
    metadata: TemplateMetadata,
}

impl TemplateBuilder {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn category(mut self, category: TemplateCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Append a variable declaration (accumulates).
    pub fn variable(mut self, variable: Variable) -> Self {
        self.variables.push(variable);
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn metadata(mut self, metadata: TemplateMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Consume builder and construct a validated `Template`.
    ///
    /// # Errors
    ///
    /// - `TemplateValidation` naming the first unset required field
    /// - `InvalidTemplate` if the assembled template breaks an invariant
    pub fn build(self) -> Result<Template, DomainError> {
        let template = Template {
            id: self
                .id
                .ok_or_else(|| DomainError::validation("id", "not set"))?,
            name: self
                .name
                .ok_or_else(|| DomainError::validation("name", "not set"))?,
            description: self.description,
            version: self.version.unwrap_or_else(|| "1.0.0".into()),
            category: self
                .category
                .ok_or_else(|| DomainError::validation("category", "not set"))?,
            tags: self.tags,
            variables: self.variables,
            content: self
                .content
                .ok_or_else(|| DomainError::validation("content", "not set"))?,
            metadata: self.metadata,
        };
        template.validate()?;
        Ok(template)
    }
}

// ============================================================================
// Variable
// ============================================================================

/// A declared template variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub name: String,
    #[serde(rename = "type")]
    pub var_type: VariableType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<Value>>,
}

impl Variable {
    pub fn required(name: impl Into<String>, var_type: VariableType) -> Self {
        Self {
            name: name.into(),
            var_type,
            required: true,
            description: String::new(),
            default_value: None,
            options: None,
        }
    }

    pub fn optional(name: impl Into<String>, var_type: VariableType) -> Self {
        Self {
            required: false,
            ..Self::required(name, var_type)
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn options<I, V>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }
}

// ============================================================================
// TemplateMetadata
// ============================================================================

/// Provenance and compatibility information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMetadata {
    #[serde(default)]
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    /// Frameworks/runtimes this template targets (e.g. `"react@18"`).
    #[serde(default)]
    pub compatibility: Vec<String>,
    /// Packages the generated project is expected to depend on.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl TemplateMetadata {
    pub fn new(author: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            ..Self::default()
        }
    }

    pub fn license(mut self, license: impl Into<String>) -> Self {
        self.license = Some(license.into());
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self.updated_at.get_or_insert(at);
        self
    }

    pub fn compatibility(mut self, items: Vec<String>) -> Self {
        self.compatibility = items;
        self
    }

    pub fn dependencies(mut self, items: Vec<String>) -> Self {
        self.dependencies = items;
        self
    }
}
