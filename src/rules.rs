//! Rule database
//!
//! Maps a rule name to one (fingerprint, template) entry per language. The
//! table keeps insertion order, which is the order the matcher walks it in.

use crate::fingerprint::Fingerprinter;
use crate::language::Language;
use crate::template::genericize;
use crate::{Result, RuleError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the rule seeded into a fresh database
pub const BOOTSTRAP_RULE: &str = "ALLOCATION";

/// One language's side of a rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEntry {
    /// Structural fingerprint of the example statement
    pub fingerprint: String,
    /// Generic template derived from the same statement
    pub template: String,
    /// The concrete statement the entry was learned from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

/// A cross-language aligned rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct Rule {
    pub python: RuleEntry,
    pub java: RuleEntry,
    pub cpp: RuleEntry,
}

impl Rule {
    /// Get the entry for a language
    pub fn entry(&self, language: Language) -> &RuleEntry {
        match language {
            Language::Python => &self.python,
            Language::Java => &self.java,
            Language::Cpp => &self.cpp,
        }
    }

    /// Entries in output order
    pub fn entries(&self) -> impl Iterator<Item = (Language, &RuleEntry)> {
        Language::ALL.into_iter().map(move |lang| (lang, self.entry(lang)))
    }
}

/// The same statement written in each supported language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedStatements {
    pub python: String,
    pub java: String,
    pub cpp: String,
}

impl AlignedStatements {
    pub fn new(python: &str, java: &str, cpp: &str) -> Self {
        let clean = |s: &str| s.trim_end_matches(['\r', '\n']).to_string();
        Self {
            python: clean(python),
            java: clean(java),
            cpp: clean(cpp),
        }
    }

    pub fn get(&self, language: Language) -> &str {
        match language {
            Language::Python => &self.python,
            Language::Java => &self.java,
            Language::Cpp => &self.cpp,
        }
    }
}

/// In-memory rule table, persisted as a JSON object keyed by rule name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleDatabase {
    rules: IndexMap<String, Rule>,
}

impl RuleDatabase {
    /// Create an empty database
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a database holding only the built-in allocation rule
    pub fn bootstrap(fingerprinter: &dyn Fingerprinter) -> Result<Self> {
        let mut db = Self::new();
        db.add_rule(
            &AlignedStatements::new("b = 5", "int b = 5;", "int b = 5;"),
            BOOTSTRAP_RULE,
            fingerprinter,
        )?;
        Ok(db)
    }

    /// Load a database from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let db: Self = serde_json::from_str(&content)?;
        log::info!(
            "Loaded {} rules from {}",
            db.len(),
            path.as_ref().display()
        );
        Ok(db)
    }

    /// Write the database to a JSON file, replacing its contents
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Saved {} rules to {}", self.len(), path.display());
        Ok(())
    }

    /// Learn a rule from an aligned example triple.
    ///
    /// Fails with [`RuleError::DuplicateRuleName`] if the name is taken; the
    /// existing rule is left untouched.
    pub fn add_rule(
        &mut self,
        statements: &AlignedStatements,
        name: &str,
        fingerprinter: &dyn Fingerprinter,
    ) -> Result<&Rule> {
        if self.contains(name) {
            return Err(RuleError::DuplicateRuleName(name.to_string()));
        }

        let learn = |language: Language| -> Result<RuleEntry> {
            let statement = statements.get(language);
            Ok(RuleEntry {
                fingerprint: fingerprinter.fingerprint(statement, language)?,
                template: genericize(statement),
                example: Some(statement.to_string()),
            })
        };

        let rule = Rule {
            python: learn(Language::Python)?,
            java: learn(Language::Java)?,
            cpp: learn(Language::Cpp)?,
        };

        self.insert(name, rule)?;
        log::info!("Added rule '{}'", name);
        Ok(&self.rules[name])
    }

    /// Store a prebuilt rule under a new name
    pub fn insert(&mut self, name: &str, rule: Rule) -> Result<()> {
        if self.contains(name) {
            return Err(RuleError::DuplicateRuleName(name.to_string()));
        }
        self.rules.insert(name.to_string(), rule);
        Ok(())
    }

    /// Remove a rule, keeping the order of the rest
    pub fn remove_rule(&mut self, name: &str) -> Option<Rule> {
        self.rules.shift_remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Rule names in storage order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Rules in storage order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.rules.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
