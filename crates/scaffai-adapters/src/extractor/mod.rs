//! Generated-file extractor adapters.

mod grammar;

pub use grammar::GrammarExtractor;
