//! Application layer for scaffai.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (TemplateManager, MaterializeService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! template logic itself. Grammar and validation rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    CompilerOptions, CompilerStats, InitOutcome, MaterializeReport, MaterializeService,
    TemplateManager,
};

// Re-export port traits (for adapter implementation)
pub use ports::{FileExtractor, Filesystem, TemplateStore};

pub use error::ApplicationError;
