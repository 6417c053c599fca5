//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `scaffai-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `TemplateStore`: Template registration/lookup
//!   - `FileExtractor`: Parsing model output into files
//!   - `Filesystem`: Materializing a generated file set

pub mod output;

pub use output::{FileExtractor, Filesystem, TemplateStore};

#[cfg(test)]
pub use output::MockTemplateStore;
