//! Files recovered from a model's raw reply.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Which textual convention produced a [`GeneratedFileSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionGrammar {
    /// `=== FILE: path ===` delimiter blocks.
    Primary,
    /// Fenced code blocks whose first line is `// path`.
    Fallback,
}

impl fmt::Display for ExtractionGrammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => f.write_str("file markers"),
            Self::Fallback => f.write_str("fenced code blocks"),
        }
    }
}

/// Mapping from relative path to file content.
///
/// Paths and contents are stored trimmed; entries with an empty path or empty
/// content are never admitted. Inserting an existing path overwrites it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFileSet {
    files: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    grammar: Option<ExtractionGrammar>,
}

impl GeneratedFileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a file. Returns `false` (and leaves the set unchanged) when the
    /// trimmed path or content is empty.
    pub fn insert(&mut self, path: &str, content: &str) -> bool {
        let path = path.trim();
        let content = content.trim();
        if path.is_empty() || content.is_empty() {
            return false;
        }
        self.files.insert(path.to_string(), content.to_string());
        true
    }

    pub fn with_grammar(mut self, grammar: ExtractionGrammar) -> Self {
        self.grammar = Some(grammar);
        self
    }

    /// Grammar that produced this set; `None` for an empty extraction.
    pub fn grammar(&self) -> Option<ExtractionGrammar> {
        self.grammar
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.files
    }
}
