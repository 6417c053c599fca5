//! Infrastructure adapters for scaffai.
//!
//! This crate implements the ports defined in `scaffai-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod bootstrap;
pub mod builtin_templates;
pub mod extractor;
pub mod filesystem;
pub mod template_loader;
pub mod template_store;

#[cfg(test)]
mod test_support;

// Re-export commonly used adapters
pub use bootstrap::initialize;
pub use extractor::GrammarExtractor;
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use template_loader::{LoadReport, LoaderConfig, RemoteTemplateSummary, TemplateLoader};
pub use template_store::InMemoryStore;
