//! rulecraft - Rule-based statement translation
//!
//! Translates single statements between Python, Java and C++ by matching a
//! statement's structural fingerprint against a database of learned rules,
//! then refilling the matched rule's generic templates with the tokens
//! extracted from the input.
//!
//! # Architecture
//!
//! ```text
//! statement -> Fingerprinter -> Matcher -> Rule -> Translator -> [py, java, cpp]
//!                                            ^
//!              Tokens::extract(statement) ---'
//! ```
//!
//! # Example
//!
//! ```no_run
//! use rulecraft::{Engine, Language, RuleSession};
//! use rulecraft::fingerprint::{IndelRatio, TreeSitterFingerprinter};
//!
//! let fingerprinter = TreeSitterFingerprinter::new();
//! let session = RuleSession::open("rule-set.json", &fingerprinter).unwrap();
//! let engine = Engine::new(session.database(), &fingerprinter, &IndelRatio);
//!
//! let translation = engine.translate_statement("x = 12", Language::Python).unwrap();
//! for (language, statement) in translation.iter() {
//!     println!("{}: {}", language, statement);
//! }
//! ```

pub mod authoring;
pub mod batch;
pub mod config;
pub mod engine;
pub mod evaluate;
pub mod fingerprint;
pub mod language;
pub mod matcher;
pub mod repl;
pub mod rules;
pub mod session;
pub mod template;
pub mod tokens;
pub mod translator;

pub use authoring::{learn_from_aligned, LearnReport, RuleNamer, SequentialNamer};
pub use batch::{BatchReport, BatchTranslator, UnmatchedPolicy};
pub use config::{Config, ConfigError};
pub use engine::Engine;
pub use evaluate::Precision;
pub use fingerprint::{Fingerprinter, IndelRatio, Similarity};
pub use language::Language;
pub use matcher::{MatchStrategy, Matcher, RuleMatch};
pub use rules::{AlignedStatements, Rule, RuleDatabase, RuleEntry};
pub use session::RuleSession;
pub use template::{genericize, instantiate, Instantiation};
pub use tokens::Tokens;
pub use translator::{translate, Translation};

use thiserror::Error;

/// Errors that can occur while learning or applying rules
#[derive(Error, Debug)]
pub enum RuleError {
    #[error("Rule '{0}' already exists in the database")]
    DuplicateRuleName(String),

    #[error("No appropriate rule for translating '{0}' was found")]
    NoMatchFound(String),

    #[error("Unsupported language: {0} (expected PYTHON, JAVA or CPP)")]
    UnsupportedLanguage(String),

    #[error("Unknown rule: {0}")]
    UnknownRule(String),

    #[error("Fingerprint error: {0}")]
    Fingerprint(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, RuleError>;
