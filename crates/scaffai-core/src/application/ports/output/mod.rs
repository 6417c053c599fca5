//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `scaffai-adapters` crate provides implementations.

use std::path::Path;

use crate::domain::{GeneratedFileSet, Template, TemplateCategory};
use crate::error::ScaffaiResult;

/// Port for template storage and retrieval.
///
/// Implemented by:
/// - `scaffai_adapters::template_store::InMemoryStore`
///
/// ## Semantics
///
/// - `register` inserts or replaces by `Template::id`; a replaced template
///   keeps its original position in listing order.
/// - Listing returns templates in first-registration order.
#[cfg_attr(test, mockall::automock)]
pub trait TemplateStore: Send + Sync {
    /// Insert or replace a template.
    fn register(&self, template: Template) -> ScaffaiResult<()>;

    /// Get a template by id.
    fn get(&self, id: &str) -> ScaffaiResult<Template>;

    /// Templates in `category`, in insertion order.
    fn list_by_category(&self, category: TemplateCategory) -> ScaffaiResult<Vec<Template>>;

    /// All templates, in insertion order.
    fn list(&self) -> ScaffaiResult<Vec<Template>>;

    /// Number of registered templates.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Port for recovering files from a model's raw reply.
///
/// Implemented by:
/// - `scaffai_adapters::extractor::GrammarExtractor`
///
/// Never fails: an unparsable reply yields an empty set, which callers must
/// treat as a failed generation.
pub trait FileExtractor: Send + Sync {
    fn extract(&self, raw: &str) -> GeneratedFileSet;
}

/// Port for filesystem operations used when materializing a file set.
///
/// Implemented by:
/// - `scaffai_adapters::filesystem::LocalFilesystem` (production)
/// - `scaffai_adapters::filesystem::MemoryFilesystem` (testing)
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> ScaffaiResult<()>;

    /// Write content to a file.
    fn write_file(&self, path: &Path, content: &str) -> ScaffaiResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> ScaffaiResult<()>;
}
