//! Fuzzy fingerprint matching against the rule database

use crate::fingerprint::Similarity;
use crate::language::Language;
use crate::rules::RuleDatabase;
use serde::{Deserialize, Serialize};

/// Minimum similarity score accepted as a match
pub const DEFAULT_THRESHOLD: u8 = 95;

/// How the matcher picks among candidates above the threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// First entry in storage order that clears the threshold
    First,
    /// Highest-scoring entry; ties go to the earliest in storage order
    #[default]
    Best,
}

impl std::str::FromStr for MatchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "first" => Ok(MatchStrategy::First),
            "best" => Ok(MatchStrategy::Best),
            _ => Err(format!("Unknown match strategy: {}", s)),
        }
    }
}

/// A rule whose stored fingerprint matched the query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    /// Name of the matched rule
    pub rule_name: String,
    /// Language of the entry that matched
    pub language: Language,
    /// Similarity score of that entry
    pub score: u8,
}

/// Finds the rule whose fingerprint is closest to a query fingerprint
pub struct Matcher<'a> {
    similarity: &'a dyn Similarity,
    threshold: u8,
    strategy: MatchStrategy,
}

impl<'a> Matcher<'a> {
    pub fn new(similarity: &'a dyn Similarity) -> Self {
        Self {
            similarity,
            threshold: DEFAULT_THRESHOLD,
            strategy: MatchStrategy::default(),
        }
    }

    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    pub fn strategy(&self) -> MatchStrategy {
        self.strategy
    }

    /// Match a fingerprint against every stored entry.
    ///
    /// Rules are walked in insertion order and each rule's entries in
    /// language order. Returns `None` if no entry reaches the threshold.
    pub fn rule_match(&self, db: &RuleDatabase, fingerprint: &str) -> Option<RuleMatch> {
        let mut best: Option<RuleMatch> = None;

        for (name, rule) in db.iter() {
            for (language, entry) in rule.entries() {
                let score = self.similarity.score(&entry.fingerprint, fingerprint);
                log::debug!("rule '{}' [{}] scored {}", name, language, score);

                let candidate = RuleMatch {
                    rule_name: name.to_string(),
                    language,
                    score,
                };

                match self.strategy {
                    MatchStrategy::First if score >= self.threshold => return Some(candidate),
                    MatchStrategy::First => {}
                    MatchStrategy::Best => {
                        if best.as_ref().map_or(true, |b| score > b.score) {
                            best = Some(candidate);
                        }
                    }
                }
            }
        }

        best.filter(|b| b.score >= self.threshold)
    }
}
