pub mod compiled;
pub mod context;
pub mod generated;
pub mod template;

pub use crate::domain::DomainError;
pub use compiled::{CompiledMetadata, CompiledPrompt};
pub use context::PromptContext;
pub use generated::{ExtractionGrammar, GeneratedFileSet};
pub use template::{Template, TemplateBuilder, TemplateMetadata, Variable};
