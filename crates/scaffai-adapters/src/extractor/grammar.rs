//! Regex-driven extraction of files from a model reply.
//!
//! Two grammars are tried in order:
//!
//! 1. **File markers**: `===FILE: <path> ===` (spaces around `FILE:`
//!    tolerated) ending its line, followed by the file body, up to the next
//!    marker or the end of input. Text before the marker on the same line is
//!    ignored.
//! 2. **Fenced code blocks**, only if the markers produced nothing: a fence
//!    with an optional language tag whose first non-blank line is
//!    `// <path>`. Fences without such a line are dropped. A comment with
//!    spaces must contain `/` or end in an extension to count as a path, so
//!    `// src/My Button.tsx` is a path and `// renders the app` is not.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use scaffai_core::{
    application::ports::FileExtractor,
    domain::{ExtractionGrammar, GeneratedFileSet},
};

static FILE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)===[ \t]*FILE:[ \t]*(.+?)[ \t]*===[ \t]*\r?$")
        .expect("Invalid file marker regex")
});

static FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[\w.+#-]*[ \t]*\r?\n(.*?)```").expect("Invalid code fence regex")
});

static FILENAME_COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*//[ \t]*(.+?)[ \t]*$").expect("Invalid filename comment regex")
});

/// Stateless [`FileExtractor`] implementing both grammars.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrammarExtractor;

impl GrammarExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Marker grammar only.
    pub fn extract_markers(&self, raw: &str) -> GeneratedFileSet {
        let mut files = GeneratedFileSet::new();
        let markers: Vec<_> = FILE_MARKER.captures_iter(raw).collect();

        for (i, caps) in markers.iter().enumerate() {
            let (Some(whole), Some(path)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let end = markers
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map_or(raw.len(), |m| m.start());
            files.insert(path.as_str(), &raw[whole.end()..end]);
        }

        files
    }

    /// Fenced-block grammar only.
    pub fn extract_fences(&self, raw: &str) -> GeneratedFileSet {
        let mut files = GeneratedFileSet::new();

        for caps in FENCE.captures_iter(raw) {
            let Some(body) = caps.get(1) else {
                continue;
            };
            if let Some((path, content)) = split_filename_comment(body.as_str()) {
                files.insert(path, content);
            }
        }

        files
    }
}

impl FileExtractor for GrammarExtractor {
    fn extract(&self, raw: &str) -> GeneratedFileSet {
        let primary = self.extract_markers(raw);
        if !primary.is_empty() {
            debug!(files = primary.len(), "extracted files from markers");
            return primary.with_grammar(ExtractionGrammar::Primary);
        }

        let fallback = self.extract_fences(raw);
        if !fallback.is_empty() {
            debug!(files = fallback.len(), "extracted files from code fences");
            return fallback.with_grammar(ExtractionGrammar::Fallback);
        }

        debug!(bytes = raw.len(), "no files found in model output");
        GeneratedFileSet::new()
    }
}

/// Split a fence body into `(path, rest)` when its first non-blank line is a
/// filename comment.
fn split_filename_comment(body: &str) -> Option<(&str, &str)> {
    let mut offset = 0;
    for line in body.split_inclusive('\n') {
        offset += line.len();
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            continue;
        }
        let path = FILENAME_COMMENT.captures(line)?.get(1)?.as_str();
        return looks_like_path(path).then(|| (path, &body[offset..]));
    }
    None
}

fn looks_like_path(candidate: &str) -> bool {
    if !candidate.contains(char::is_whitespace) || candidate.contains('/') {
        return true;
    }
    let name = candidate.rsplit('/').next().unwrap_or(candidate);
    name.rsplit_once('.').is_some_and(|(stem, ext)| {
        !stem.is_empty() && !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(raw: &str) -> GeneratedFileSet {
        GrammarExtractor::new().extract(raw)
    }

    #[test]
    fn markers_split_files() {
        let files = extract("=== FILE: a.ts ===\nconsole.log(1)\n=== FILE: b.ts ===\nconsole.log(2)");

        assert_eq!(files.len(), 2);
        assert_eq!(files.get("a.ts"), Some("console.log(1)"));
        assert_eq!(files.get("b.ts"), Some("console.log(2)"));
        assert_eq!(files.grammar(), Some(ExtractionGrammar::Primary));
    }

    #[test]
    fn compact_marker_form_is_recognised() {
        let files = extract("Here you go:\n===FILE: src/App.tsx ===\nexport default App\n");
        assert_eq!(files.get("src/App.tsx"), Some("export default App"));
    }

    #[test]
    fn marker_with_empty_body_is_dropped() {
        let files = extract("===FILE: empty.ts ===\n   \n===FILE: full.ts ===\nx");
        assert_eq!(files.len(), 1);
        assert!(files.get("empty.ts").is_none());
    }

    #[test]
    fn duplicate_marker_paths_last_wins() {
        let files = extract("===FILE: a ===\nfirst\n===FILE: a ===\nsecond");
        assert_eq!(files.get("a"), Some("second"));
    }

    #[test]
    fn marker_after_prose_on_same_line() {
        let files = extract("Here are the files: ===FILE: a.ts ===\nconsole.log(1)\n");
        assert_eq!(files.len(), 1);
        assert_eq!(files.get("a.ts"), Some("console.log(1)"));
    }

    #[test]
    fn marker_must_end_its_line() {
        let files = extract("text ===FILE: a.ts === inline");
        assert!(files.is_empty());
    }

    #[test]
    fn fenced_block_with_filename_comment() {
        let files = extract("```ts\n// App.tsx\nexport default App\n```");

        assert_eq!(files.len(), 1);
        assert_eq!(files.get("App.tsx"), Some("export default App"));
        assert_eq!(files.grammar(), Some(ExtractionGrammar::Fallback));
    }

    #[test]
    fn fenced_block_without_filename_is_dropped() {
        let files = extract("```ts\nexport default App\n```");
        assert!(files.is_empty());
        assert_eq!(files.grammar(), None);
    }

    #[test]
    fn filename_comment_may_contain_spaces() {
        let files = extract("```tsx\n// src/My Button.tsx\nexport const B = 1\n```");
        assert_eq!(files.get("src/My Button.tsx"), Some("export const B = 1"));

        let files = extract("```md\n// Release Notes.md\n# 1.0\n```");
        assert_eq!(files.get("Release Notes.md"), Some("# 1.0"));
    }

    #[test]
    fn single_word_filename_without_extension() {
        let files = extract("```\n// Dockerfile\nFROM rust\n```");
        assert_eq!(files.get("Dockerfile"), Some("FROM rust"));
    }

    #[test]
    fn prose_comment_is_not_a_filename() {
        let files = extract("```js\n// This renders the app\nrender()\n```");
        assert!(files.is_empty());

        let files = extract("```js\n// Renders the app. Done\nrender()\n```");
        assert!(files.is_empty());
    }

    #[test]
    fn multiple_fences_without_language_tag() {
        let raw = "Intro\n```\n\n// a.js\nA\n```\nmiddle\n```css\n// styles/b.css\nbody {}\n```";
        let files = extract(raw);

        assert_eq!(files.get("a.js"), Some("A"));
        assert_eq!(files.get("styles/b.css"), Some("body {}"));
    }

    #[test]
    fn markers_win_over_fences() {
        let raw = "===FILE: a.ts ===\n```ts\n// b.ts\nb\n```";
        let files = extract(raw);

        assert_eq!(files.len(), 1);
        assert!(files.get("a.ts").is_some_and(|c| c.contains("// b.ts")));
    }

    #[test]
    fn empty_and_plain_input_yield_empty_set() {
        assert!(extract("").is_empty());
        assert!(extract("Sorry, I cannot help with that.").is_empty());
    }

    #[test]
    fn crlf_input_is_handled() {
        let files = extract("===FILE: a.ts ===\r\nline\r\n");
        assert_eq!(files.get("a.ts"), Some("line"));
    }
}
