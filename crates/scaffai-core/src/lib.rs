//! scaffai Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for scaffai: a
//! prompt-template compiler and an extractor that recovers files from a
//! language model's reply.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           scaffai-cli (CLI)             │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (TemplateManager, MaterializeService)   │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │  (TemplateStore, FileExtractor, Fs)     │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    scaffai-adapters (Infrastructure)    │
//! │ (InMemoryStore, TemplateLoader, etc)    │
//! └──────────────────┬──────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (Template, grammar, PromptContext, ...) │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::collections::BTreeMap;
//! use scaffai_core::prelude::*;
//!
//! # fn run(store: Box<dyn TemplateStore>) -> ScaffaiResult<()> {
//! let manager = TemplateManager::new(store, CompilerOptions::default());
//! let context = PromptContext::new().ui_library("mui").feature("typescript");
//! let prompt = manager.compile("react-component", &context, &BTreeMap::new())?;
//! println!("{}", prompt.content);
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        CompilerOptions, CompilerStats, InitOutcome, MaterializeService, TemplateManager,
        ports::{FileExtractor, Filesystem, TemplateStore},
    };
    pub use crate::domain::{
        CompiledPrompt, ExtractionGrammar, GeneratedFileSet, PromptContext, Template,
        TemplateCategory, TemplateMetadata, Variable, VariableType,
    };
    pub use crate::error::{ScaffaiError, ScaffaiResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
