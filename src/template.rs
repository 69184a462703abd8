//! Generic templates
//!
//! A template is a concrete statement whose tokens have been replaced with
//! placeholders (`value`, `operator`, `type`, `name` / `name_0`, `name_1`, ...).
//! [`genericize`] builds a template from a statement and [`instantiate`] fills
//! one back in from a [`Tokens`] set.

use crate::tokens::{identifier_spans, literal_spans, symbol_spans, word_spans, Tokens};
use regex::{Captures, Regex};
use std::ops::Range;
use std::sync::LazyLock;

pub const VALUE: &str = "value";
pub const OPERATOR: &str = "operator";
pub const TYPE: &str = "type";
pub const NAME: &str = "name";

/// Placeholder for the `index`-th of several names
pub fn indexed_name(index: usize) -> String {
    format!("{}_{}", NAME, index)
}

// name_N must be tried before the bare name
static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"name_(\d+)|name|value|operator|type").expect("valid placeholder pattern")
});

/// Placeholder spans claimed on the source text, in claim order
#[derive(Default)]
struct Claims {
    spans: Vec<(Range<usize>, String)>,
}

impl Claims {
    /// Claim a span unless an earlier step already owns part of it
    fn claim(&mut self, span: Range<usize>, placeholder: &str) {
        let overlaps = self
            .spans
            .iter()
            .any(|(r, _)| span.start < r.end && r.start < span.end);
        if !overlaps {
            self.spans.push((span, placeholder.to_string()));
        }
    }

    fn apply(mut self, text: &str) -> String {
        self.spans.sort_by_key(|(r, _)| r.start);
        let mut out = String::with_capacity(text.len());
        let mut cursor = 0;
        for (span, placeholder) in &self.spans {
            out.push_str(&text[cursor..span.start]);
            out.push_str(placeholder);
            cursor = span.end;
        }
        out.push_str(&text[cursor..]);
        out
    }
}

/// Build the generic template for a concrete statement.
///
/// Substitution runs `value`, `operator`, `type`, then names. Each step only
/// claims text no earlier step has claimed, so a placeholder inserted by one
/// step is never rewritten by the next.
pub fn genericize(statement: &str) -> String {
    let text = statement.trim_end_matches(['\r', '\n']);
    let tokens = Tokens::extract(text);
    let mut claims = Claims::default();

    if let Some(ref value) = tokens.value {
        for span in literal_spans(text) {
            if &text[span.clone()] == value {
                claims.claim(span, VALUE);
            }
        }
    }

    if let Some(ref operator) = tokens.operator {
        for span in symbol_spans(text, operator) {
            claims.claim(span, OPERATOR);
        }
    }

    if let Some(ref type_keyword) = tokens.type_keyword {
        for span in word_spans(text, type_keyword) {
            claims.claim(span, TYPE);
        }
    }

    let single = tokens.names.len() == 1;
    for span in identifier_spans(text) {
        let word = &text[span.clone()];
        if let Some(index) = tokens.names.iter().position(|n| n == word) {
            if single {
                claims.claim(span, NAME);
            } else {
                claims.claim(span, &indexed_name(index));
            }
        }
    }

    claims.apply(text)
}

/// Result of filling a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instantiation {
    /// The instantiated statement
    pub text: String,
    /// Placeholders left in `text` because no token was available
    pub unresolved: Vec<String>,
}

impl Instantiation {
    /// Check if every placeholder was filled
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Fill a template's placeholders from a token set.
///
/// The template is scanned once, so text inserted for one placeholder is
/// never matched again. The bare `name` is only filled when the tokens hold
/// exactly one name.
pub fn instantiate(template: &str, tokens: &Tokens) -> Instantiation {
    let mut unresolved: Vec<String> = Vec::new();

    let text = PLACEHOLDER_RE.replace_all(template, |caps: &Captures| {
        let placeholder = &caps[0];
        let filled = match placeholder {
            VALUE => tokens.value.clone(),
            OPERATOR => tokens.operator.clone(),
            TYPE => tokens.type_keyword.clone(),
            NAME if tokens.names.len() == 1 => Some(tokens.names[0].clone()),
            NAME => None,
            _ => caps
                .get(1)
                .and_then(|index| index.as_str().parse::<usize>().ok())
                .and_then(|index| tokens.names.get(index).cloned()),
        };
        filled.unwrap_or_else(|| {
            if !unresolved.iter().any(|p| p == placeholder) {
                unresolved.push(placeholder.to_string());
            }
            placeholder.to_string()
        })
    });

    Instantiation {
        text: text.into_owned(),
        unresolved,
    }
}
