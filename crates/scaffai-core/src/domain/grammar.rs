//! Prompt template grammar.
//!
//! Templates are plain text with three kinds of `{{ }}` tags:
//!
//! | Tag | Meaning |
//! |-----|---------|
//! | `{{NAME}}` | Interpolate `NAME`; left verbatim if `NAME` is unresolved |
//! | `{{#if NAME}} … {{/if}}` | Keep the body when `NAME` is truthy |
//! | `{{#if NAME.includes 'VALUE'}} … {{/if}}` | Keep the body when the array `NAME` contains `VALUE` |
//!
//! Source text is tokenized into text runs, variable references,
//! conditional-opens and conditional-closes, then parsed by a small
//! recursive-descent parser into a [`TemplateAst`]. Conditionals nest.
//!
//! Anything between `{{` and `}}` that is not one of the forms above is kept
//! as literal text, so `{{{NAME}}}` renders as `{` + value + `}` and prose such
//! as `{{ not a tag }}` passes through untouched.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::domain::error::DomainError;

// ============================================================================
// AST
// ============================================================================

/// Parsed template.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateAst {
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    /// `raw` is the exact source of the tag, re-emitted when unresolved.
    Variable { name: String, raw: String },
    Conditional { condition: Condition, body: Vec<Node> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `{{#if NAME}}`
    Truthy(String),
    /// `{{#if NAME.includes 'VALUE'}}`
    Includes { name: String, value: String },
}

impl Condition {
    fn name(&self) -> &str {
        match self {
            Self::Truthy(name) | Self::Includes { name, .. } => name,
        }
    }

    fn evaluate(&self, data: &BTreeMap<String, Value>) -> bool {
        match self {
            Self::Truthy(name) => lookup(data, name).is_some_and(is_truthy),
            Self::Includes { name, value } => match lookup(data, name) {
                Some(Value::Array(items)) => items.iter().any(|item| stringify(item) == *value),
                _ => false,
            },
        }
    }
}

// ============================================================================
// Tokenizer
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Text(String),
    Variable { name: String, raw: String },
    Open(Condition),
    Close,
}

#[derive(Debug, Clone, PartialEq)]
struct Token {
    kind: TokenKind,
    /// Byte offset of the token in the source.
    offset: usize,
}

fn tokenize(src: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut text = String::new();
    let mut text_start = 0;
    let mut pos = 0;

    while pos < src.len() {
        let Some(found) = src[pos..].find("{{") else {
            break;
        };
        let open = pos + found;
        text.push_str(&src[pos..open]);

        let Some(close_rel) = src[open + 2..].find("}}") else {
            pos = open;
            break;
        };
        let close = open + 2 + close_rel;
        let raw = &src[open..close + 2];

        match classify(&src[open + 2..close]) {
            Some(kind) => {
                if !text.is_empty() {
                    tokens.push(Token {
                        kind: TokenKind::Text(std::mem::take(&mut text)),
                        offset: text_start,
                    });
                }
                let kind = match kind {
                    TokenKind::Variable { name, .. } => TokenKind::Variable {
                        name,
                        raw: raw.to_string(),
                    },
                    other => other,
                };
                tokens.push(Token { kind, offset: open });
                pos = close + 2;
                text_start = pos;
            }
            None => {
                // Not a tag: keep one brace and rescan, so `{{{x}}}` still
                // finds the inner `{{x}}`.
                if text.is_empty() {
                    text_start = open;
                }
                text.push('{');
                pos = open + 1;
            }
        }
    }

    text.push_str(&src[pos..]);
    if !text.is_empty() {
        tokens.push(Token {
            kind: TokenKind::Text(text),
            offset: text_start,
        });
    }
    tokens
}

/// Classify the inside of a `{{ }}` pair.
fn classify(inner: &str) -> Option<TokenKind> {
    let inner = inner.trim();

    if inner == "/if" {
        return Some(TokenKind::Close);
    }

    if let Some(rest) = inner.strip_prefix("#if") {
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        return parse_condition(rest.trim()).map(TokenKind::Open);
    }

    is_identifier(inner).then(|| TokenKind::Variable {
        name: inner.to_string(),
        raw: String::new(),
    })
}

fn parse_condition(expr: &str) -> Option<Condition> {
    if let Some((name, rest)) = expr.split_once(".includes") {
        let name = name.trim();
        if !is_identifier(name) {
            return None;
        }
        let arg = rest.trim();
        let arg = arg
            .strip_prefix('(')
            .and_then(|a| a.strip_suffix(')'))
            .map(str::trim)
            .unwrap_or(arg);
        let value = strip_quotes(arg)?;
        return Some(Condition::Includes {
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    is_identifier(expr).then(|| Condition::Truthy(expr.to_string()))
}

fn strip_quotes(s: &str) -> Option<&str> {
    ['\'', '"']
        .into_iter()
        .find_map(|q| s.strip_prefix(q).and_then(|rest| rest.strip_suffix(q)))
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty()
        && !s.starts_with('.')
        && !s.ends_with('.')
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
}

// ============================================================================
// Parser
// ============================================================================

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Parse nodes until end of input (top level) or the `{{/if}}` closing
    /// `open` (nested).
    fn parse_nodes(&mut self, open: Option<(&Condition, usize)>) -> Result<Vec<Node>, DomainError> {
        let mut nodes = Vec::new();

        while let Some(token) = self.tokens.get(self.pos).cloned() {
            self.pos += 1;
            match token.kind {
                TokenKind::Text(text) => nodes.push(Node::Text(text)),
                TokenKind::Variable { name, raw } => nodes.push(Node::Variable { name, raw }),
                TokenKind::Open(condition) => {
                    let body = self.parse_nodes(Some((&condition, token.offset)))?;
                    nodes.push(Node::Conditional { condition, body });
                }
                TokenKind::Close => {
                    return match open {
                        Some(_) => Ok(nodes),
                        None => Err(DomainError::InvalidTemplate(format!(
                            "unexpected {{{{/if}}}} at byte {} with no open block",
                            token.offset
                        ))),
                    };
                }
            }
        }

        match open {
            None => Ok(nodes),
            Some((condition, offset)) => Err(DomainError::InvalidTemplate(format!(
                "{{{{#if {}}}}} opened at byte {} is never closed",
                condition.name(),
                offset
            ))),
        }
    }
}

/// Parse template source into an AST.
///
/// # Errors
///
/// Returns [`DomainError::InvalidTemplate`] for an unclosed `{{#if}}` or a
/// `{{/if}}` without a matching open.
pub fn parse(src: &str) -> Result<TemplateAst, DomainError> {
    let mut parser = Parser {
        tokens: tokenize(src),
        pos: 0,
    };
    let nodes = parser.parse_nodes(None)?;
    Ok(TemplateAst { nodes })
}

// ============================================================================
// Rendering
// ============================================================================

impl TemplateAst {
    /// Render against a merged data set.
    pub fn render(&self, data: &BTreeMap<String, Value>) -> String {
        let mut out = String::new();
        render_nodes(&self.nodes, data, &mut out);
        out
    }
}

fn render_nodes(nodes: &[Node], data: &BTreeMap<String, Value>, out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Variable { name, raw } => match lookup(data, name) {
                Some(value) if !value.is_null() => out.push_str(&stringify(value)),
                _ => out.push_str(raw),
            },
            Node::Conditional { condition, body } => {
                if condition.evaluate(data) {
                    render_nodes(body, data, out);
                }
            }
        }
    }
}

/// Resolve `name`, first as a flat key, then as a dotted path into objects.
fn lookup<'a>(data: &'a BTreeMap<String, Value>, name: &str) -> Option<&'a Value> {
    if let Some(value) = data.get(name) {
        return Some(value);
    }

    let mut parts = name.split('.');
    let mut current = data.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

/// Truthiness: `null`, `false`, `0` and `""` are falsy; everything else,
/// including empty arrays and objects, is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// String form used for interpolation.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(", "),
        Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(pairs: &[(&str, Value)]) -> BTreeMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn render(src: &str, pairs: &[(&str, Value)]) -> String {
        parse(src).unwrap().render(&data(pairs))
    }

    // ── interpolation ─────────────────────────────────────────────────────

    #[test]
    fn interpolates_known_variable() {
        assert_eq!(
            render("Build a {{projectType}} app", &[("projectType", json!("dashboard"))]),
            "Build a dashboard app"
        );
    }

    #[test]
    fn unresolved_placeholder_is_left_verbatim() {
        assert_eq!(render("Hello {{ who }}!", &[]), "Hello {{ who }}!");
    }

    #[test]
    fn null_value_counts_as_unresolved() {
        assert_eq!(render("{{x}}", &[("x", Value::Null)]), "{{x}}");
    }

    #[test]
    fn arrays_join_with_comma_space() {
        assert_eq!(
            render("{{features}}", &[("features", json!(["routing", "state"]))]),
            "routing, state"
        );
    }

    #[test]
    fn numbers_and_bools_use_display_form() {
        assert_eq!(
            render("{{n}} {{b}}", &[("n", json!(3)), ("b", json!(false))]),
            "3 false"
        );
    }

    #[test]
    fn dotted_name_walks_objects() {
        assert_eq!(
            render("{{theme.primary}}", &[("theme", json!({"primary": "teal"}))]),
            "teal"
        );
    }

    #[test]
    fn triple_braces_keep_outer_braces() {
        assert_eq!(render("{{{name}}}", &[("name", json!("App"))]), "{App}");
    }

    #[test]
    fn non_tag_braces_pass_through() {
        let src = "const style = {{ color: 'red' }};";
        assert_eq!(render(src, &[]), src);
    }

    #[test]
    fn interpolation_is_idempotent_without_placeholders() {
        let once = render("A {{x}} B", &[("x", json!("plain"))]);
        let twice = parse(&once).unwrap().render(&BTreeMap::new());
        assert_eq!(once, twice);
    }

    #[test]
    fn substituted_values_are_not_reinterpreted() {
        assert_eq!(
            render("{{a}}", &[("a", json!("{{b}}")), ("b", json!("nope"))]),
            "{{b}}"
        );
    }

    // ── conditionals ──────────────────────────────────────────────────────

    #[test]
    fn conditional_false_yields_empty() {
        assert_eq!(render("{{#if hasAnim}}X{{/if}}", &[("hasAnim", json!(false))]), "");
    }

    #[test]
    fn conditional_true_yields_body() {
        assert_eq!(render("{{#if hasAnim}}X{{/if}}", &[("hasAnim", json!(true))]), "X");
    }

    #[test]
    fn conditional_missing_is_falsy() {
        assert_eq!(render("a{{#if nope}}X{{/if}}b", &[]), "ab");
    }

    #[test]
    fn includes_matches_member() {
        let src = "{{#if features.includes 'routing'}}Y{{/if}}";
        assert_eq!(render(src, &[("features", json!(["routing", "state"]))]), "Y");
        assert_eq!(render(src, &[("features", json!(["state"]))]), "");
    }

    #[test]
    fn includes_accepts_double_quotes_and_parens() {
        let src = "{{#if features.includes(\"auth\")}}Z{{/if}}";
        assert_eq!(render(src, &[("features", json!(["auth"]))]), "Z");
    }

    #[test]
    fn includes_on_non_array_is_false() {
        let src = "{{#if features.includes 'routing'}}Y{{/if}}";
        assert_eq!(render(src, &[("features", json!("routing"))]), "");
    }

    #[test]
    fn body_is_interpolated() {
        let src = "{{#if ui}}Use {{uiLibraryName}}.{{/if}}";
        assert_eq!(
            render(src, &[("ui", json!("mui")), ("uiLibraryName", json!("Material-UI"))]),
            "Use Material-UI."
        );
    }

    #[test]
    fn nested_conditionals_close_correctly() {
        let src = "{{#if a}}A{{#if b}}B{{/if}}C{{/if}}D";
        assert_eq!(render(src, &[("a", json!(true)), ("b", json!(false))]), "ACD");
        assert_eq!(render(src, &[("a", json!(true)), ("b", json!(true))]), "ABCD");
        assert_eq!(render(src, &[("a", json!(false)), ("b", json!(true))]), "D");
    }

    #[test]
    fn truthiness_rules() {
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&Value::Null));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!("0")));
    }

    // ── errors ────────────────────────────────────────────────────────────

    #[test]
    fn unclosed_block_is_rejected() {
        let err = parse("{{#if a}}never closed").unwrap_err();
        assert!(matches!(err, DomainError::InvalidTemplate(msg) if msg.contains("never closed")));
    }

    #[test]
    fn stray_close_is_rejected() {
        let err = parse("text {{/if}}").unwrap_err();
        assert!(matches!(err, DomainError::InvalidTemplate(msg) if msg.contains("no open block")));
    }
}
