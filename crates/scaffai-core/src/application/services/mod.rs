//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "compile a prompt" or "write generated files".

pub mod materialize_service;
pub mod template_manager;

pub use materialize_service::{MaterializeReport, MaterializeService};
pub use template_manager::{CompilerOptions, CompilerStats, InitOutcome, TemplateManager};
