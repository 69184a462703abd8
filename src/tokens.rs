//! Token extraction from raw statement text
//!
//! Pulls the four token classes a rule template can hold out of a single
//! statement: one numeric literal, one arithmetic operator, one type keyword
//! and the ordered set of identifier names.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

/// Type keywords recognised in statement text, in lookup order
pub const TYPE_KEYWORDS: [&str; 3] = ["int", "float", "double"];

/// Arithmetic operators in scan priority order.
///
/// Multi-character operators precede their one-character prefixes so `**`
/// is never reported as `*`.
pub const OPERATORS: [&str; 7] = ["**", "//", "+", "-", "*", "/", "%"];

/// Literals at least this long (with a decimal point) are inferred as `double`
const DOUBLE_LITERAL_LEN: usize = 9;

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid literal pattern"));

static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").expect("valid identifier pattern"));

pub(crate) fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn preceded_by_ident(text: &str, start: usize) -> bool {
    text[..start].chars().next_back().is_some_and(is_ident_char)
}

fn followed_by_ident(text: &str, end: usize) -> bool {
    text[end..].chars().next().is_some_and(is_ident_char)
}

/// Byte ranges of numeric literals, skipping digits that continue an identifier
pub(crate) fn literal_spans(text: &str) -> Vec<Range<usize>> {
    NUMBER_RE
        .find_iter(text)
        .filter(|m| !preceded_by_ident(text, m.start()))
        .map(|m| m.range())
        .collect()
}

/// Byte ranges where `word` occurs as a whole identifier
pub(crate) fn word_spans(text: &str, word: &str) -> Vec<Range<usize>> {
    if word.is_empty() {
        return Vec::new();
    }
    text.match_indices(word)
        .map(|(start, _)| start..start + word.len())
        .filter(|r| !preceded_by_ident(text, r.start) && !followed_by_ident(text, r.end))
        .collect()
}

/// Byte ranges where `symbol` occurs verbatim
pub(crate) fn symbol_spans(text: &str, symbol: &str) -> Vec<Range<usize>> {
    if symbol.is_empty() {
        return Vec::new();
    }
    text.match_indices(symbol)
        .map(|(start, _)| start..start + symbol.len())
        .collect()
}

/// Identifier tokens in order of appearance, excluding type keywords and
/// suffixes glued to a literal (`3.5f`)
pub(crate) fn identifier_spans(text: &str) -> Vec<Range<usize>> {
    IDENTIFIER_RE
        .find_iter(text)
        .filter(|m| !preceded_by_ident(text, m.start()))
        .filter(|m| !TYPE_KEYWORDS.contains(&m.as_str()))
        .map(|m| m.range())
        .collect()
}

/// First numeric literal in the text
pub fn extract_value(text: &str) -> Option<String> {
    literal_spans(text)
        .into_iter()
        .next()
        .map(|r| text[r].to_string())
}

/// First arithmetic operator present, by scan priority
pub fn extract_operator(text: &str) -> Option<String> {
    OPERATORS
        .iter()
        .find(|op| text.contains(*op))
        .map(|op| op.to_string())
}

/// Type keyword written in the text, else inferred from its literal
pub fn extract_type(text: &str) -> Option<String> {
    TYPE_KEYWORDS
        .iter()
        .find(|kw| !word_spans(text, kw).is_empty())
        .map(|kw| kw.to_string())
        .or_else(|| extract_value(text).map(|value| infer_type(&value).to_string()))
}

/// Infer a type keyword from a numeric literal
pub fn infer_type(value: &str) -> &'static str {
    if !value.contains('.') {
        "int"
    } else if value.len() < DOUBLE_LITERAL_LEN {
        "float"
    } else {
        "double"
    }
}

/// Distinct identifier names in order of first appearance
pub fn extract_names(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for span in identifier_spans(text) {
        let name = &text[span];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// The token set extracted from one statement
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokens {
    pub value: Option<String>,
    pub operator: Option<String>,
    pub type_keyword: Option<String>,
    pub names: Vec<String>,
}

impl Tokens {
    /// Extract all token classes from a statement
    pub fn extract(text: &str) -> Self {
        let text = text.trim_end_matches(['\r', '\n']);
        Self {
            value: extract_value(text),
            operator: extract_operator(text),
            type_keyword: extract_type(text),
            names: extract_names(text),
        }
    }

    /// Check whether every token class was found
    pub fn is_complete(&self) -> bool {
        self.value.is_some()
            && self.operator.is_some()
            && self.type_keyword.is_some()
            && !self.names.is_empty()
    }
}
