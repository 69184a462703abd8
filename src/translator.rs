//! Template instantiation across languages
//!
//! Tokens are extracted once from the input statement and reused for every
//! language's template. This holds for the declaration/assignment shapes the
//! rules are learned from, where literals, operators, type keywords and
//! identifiers are spelled the same in Python, Java and C++.

use crate::language::Language;
use crate::rules::Rule;
use crate::template::{instantiate, Instantiation};
use crate::tokens::Tokens;

/// One instantiated statement per language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    /// Rule the templates came from
    pub rule_name: String,
    /// Tokens extracted from the input statement
    pub tokens: Tokens,
    outputs: Vec<(Language, Instantiation)>,
}

impl Translation {
    /// Statement for one language
    pub fn get(&self, language: Language) -> Option<&str> {
        self.outputs
            .iter()
            .find(|(lang, _)| *lang == language)
            .map(|(_, inst)| inst.text.as_str())
    }

    /// Statements in output order
    pub fn iter(&self) -> impl Iterator<Item = (Language, &str)> {
        self.outputs
            .iter()
            .map(|(lang, inst)| (*lang, inst.text.as_str()))
    }

    /// Placeholders left unfilled, per language
    pub fn unresolved(&self) -> impl Iterator<Item = (Language, &str)> {
        self.outputs.iter().flat_map(|(lang, inst)| {
            inst.unresolved.iter().map(move |p| (*lang, p.as_str()))
        })
    }

    /// Check if every template was fully filled
    pub fn is_complete(&self) -> bool {
        self.outputs.iter().all(|(_, inst)| inst.is_complete())
    }
}

/// Instantiate every language's template of `rule` with tokens from `input`
pub fn translate(input: &str, rule_name: &str, rule: &Rule) -> Translation {
    let tokens = Tokens::extract(input);

    let outputs: Vec<(Language, Instantiation)> = rule
        .entries()
        .map(|(language, entry)| (language, instantiate(&entry.template, &tokens)))
        .collect();

    for (language, inst) in &outputs {
        if !inst.is_complete() {
            log::warn!(
                "rule '{}' [{}]: no token for {} in '{}'",
                rule_name,
                language,
                inst.unresolved.join(", "),
                input.trim_end()
            );
        }
    }

    Translation {
        rule_name: rule_name.to_string(),
        tokens,
        outputs,
    }
}
