//! Core domain layer for scaffai.
//!
//! This module contains pure logic with no I/O:
//!
//! - **Entities**: `Template`, `PromptContext`, `CompiledPrompt`,
//!   `GeneratedFileSet`
//! - **Grammar**: tokenizer + recursive-descent parser for prompt templates
//! - **Validation**: structural checks for untyped template definitions
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Immutable entities**: All domain objects are Clone + PartialEq
pub mod entities;
pub mod error;
pub mod grammar;
pub mod value_objects;

mod validation;

// Re-exports for convenience
pub use entities::{
    CompiledMetadata, CompiledPrompt, ExtractionGrammar, GeneratedFileSet, PromptContext,
    Template, TemplateBuilder, TemplateMetadata, Variable,
    compiled::cache_key,
};

pub use error::{DomainError, ErrorCategory};

pub use value_objects::{TemplateCategory, UiLibraryInfo, VariableType, ui_library_info};

pub use validation::DomainValidator;
