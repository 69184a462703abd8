//! Statement translation engine
//!
//! Glues the fingerprinter, matcher and translator together over a borrowed
//! rule database.

use crate::config::MatchingConfig;
use crate::fingerprint::{Fingerprinter, Similarity};
use crate::language::Language;
use crate::matcher::{Matcher, RuleMatch};
use crate::rules::RuleDatabase;
use crate::translator::{translate, Translation};
use crate::{Result, RuleError};

/// Translates statements using a rule database
pub struct Engine<'a> {
    db: &'a RuleDatabase,
    fingerprinter: &'a dyn Fingerprinter,
    matcher: Matcher<'a>,
}

impl<'a> Engine<'a> {
    /// Create an engine with the default threshold and strategy
    pub fn new(
        db: &'a RuleDatabase,
        fingerprinter: &'a dyn Fingerprinter,
        similarity: &'a dyn Similarity,
    ) -> Self {
        Self {
            db,
            fingerprinter,
            matcher: Matcher::new(similarity),
        }
    }

    /// Create an engine using configured matching settings
    pub fn with_config(
        db: &'a RuleDatabase,
        fingerprinter: &'a dyn Fingerprinter,
        similarity: &'a dyn Similarity,
        config: &MatchingConfig,
    ) -> Self {
        Self {
            db,
            fingerprinter,
            matcher: Matcher::new(similarity)
                .with_threshold(config.threshold)
                .with_strategy(config.strategy),
        }
    }

    pub fn database(&self) -> &RuleDatabase {
        self.db
    }

    pub fn matcher(&self) -> &Matcher<'a> {
        &self.matcher
    }

    /// Find the rule matching a statement, if any
    pub fn match_statement(&self, text: &str, language: Language) -> Result<Option<RuleMatch>> {
        let fingerprint = self.fingerprinter.fingerprint(text, language)?;
        Ok(self.matcher.rule_match(self.db, &fingerprint))
    }

    /// Match a statement and translate it into every language.
    ///
    /// Fails with [`RuleError::NoMatchFound`] when no rule clears the threshold.
    pub fn translate_statement(&self, text: &str, language: Language) -> Result<Translation> {
        let found = self
            .match_statement(text, language)?
            .ok_or_else(|| RuleError::NoMatchFound(text.trim_end().to_string()))?;
        log::debug!(
            "'{}' matched rule '{}' via {} (score {})",
            text.trim_end(),
            found.rule_name,
            found.language,
            found.score
        );
        self.translate_with_rule(text, &found.rule_name)
    }

    /// Translate a statement through a named rule, skipping matching
    pub fn translate_with_rule(&self, text: &str, rule_name: &str) -> Result<Translation> {
        let rule = self
            .db
            .get(rule_name)
            .ok_or_else(|| RuleError::UnknownRule(rule_name.to_string()))?;
        Ok(translate(text, rule_name, rule))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::testing::ShapeFingerprinter;
    use crate::fingerprint::IndelRatio;
    use crate::matcher::MatchStrategy;
    use crate::rules::{AlignedStatements, BOOTSTRAP_RULE};

    fn database() -> RuleDatabase {
        RuleDatabase::bootstrap(&ShapeFingerprinter).unwrap()
    }

    #[test]
    fn test_translate_python_statement() {
        let db = database();
        let engine = Engine::new(&db, &ShapeFingerprinter, &IndelRatio);

        let translation = engine.translate_statement("x = 12", Language::Python).unwrap();
        assert_eq!(translation.rule_name, BOOTSTRAP_RULE);
        assert_eq!(translation.get(Language::Python), Some("x = 12"));
        assert_eq!(translation.get(Language::Java), Some("int x = 12;"));
        assert_eq!(translation.get(Language::Cpp), Some("int x = 12;"));
    }

    #[test]
    fn test_translate_java_statement() {
        let db = database();
        let engine = Engine::new(&db, &ShapeFingerprinter, &IndelRatio);

        let translation = engine.translate_statement("int count = 40;", Language::Java).unwrap();
        assert_eq!(translation.get(Language::Python), Some("count = 40"));
    }

    #[test]
    fn test_no_match() {
        let db = database();
        let engine = Engine::new(&db, &ShapeFingerprinter, &IndelRatio);

        let err = engine
            .translate_statement("while (a < b) { a += 1; }", Language::Java)
            .unwrap_err();
        assert!(matches!(err, RuleError::NoMatchFound(_)));
    }

    #[test]
    fn test_unknown_rule() {
        let db = database();
        let engine = Engine::new(&db, &ShapeFingerprinter, &IndelRatio);

        let err = engine.translate_with_rule("x = 1", "MISSING").unwrap_err();
        assert!(matches!(err, RuleError::UnknownRule(ref n) if n == "MISSING"));
    }

    #[test]
    fn test_with_config() {
        let mut db = database();
        db.add_rule(
            &AlignedStatements::new("c = a + b", "int c = a + b;", "int c = a + b;"),
            "ADDITION",
            &ShapeFingerprinter,
        )
        .unwrap();

        let config = MatchingConfig {
            threshold: 100,
            strategy: MatchStrategy::First,
        };
        let engine = Engine::with_config(&db, &ShapeFingerprinter, &IndelRatio, &config);
        assert_eq!(engine.matcher().threshold(), 100);

        let found = engine
            .match_statement("z = p + q", Language::Python)
            .unwrap()
            .unwrap();
        assert_eq!(found.rule_name, "ADDITION");
        assert_eq!(found.score, 100);
    }
}
