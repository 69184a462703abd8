//! Configuration system
//!
//! Reads configuration from:
//! - `.rulecraft.yaml` / `.rulecraft.json` (project-level)
//! - `~/.rulecraft.yaml` (user-level)
//!
//! Command-line flags are merged on top with [`Config::merge_cli`].

use crate::batch::UnmatchedPolicy;
use crate::matcher::{MatchStrategy, DEFAULT_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Matcher settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Minimum similarity score (0-100) accepted as a match
    pub threshold: u8,

    /// Candidate selection strategy
    pub strategy: MatchStrategy,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            strategy: MatchStrategy::default(),
        }
    }
}

/// Batch translation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// What to write for lines no rule matches
    pub unmatched: UnmatchedPolicy,

    /// Directory receiving translations.{py,java,cpp}
    pub output_dir: PathBuf,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            unmatched: UnmatchedPolicy::default(),
            output_dir: PathBuf::from("data/translations"),
        }
    }
}

/// Evaluation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Precision log appended to after each evaluation
    pub log_path: PathBuf,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("data/translations/eval.txt"),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rule database file
    pub rules_path: PathBuf,

    /// Matcher settings
    pub matching: MatchingConfig,

    /// Batch translation settings
    pub batch: BatchConfig,

    /// Evaluation settings
    pub evaluation: EvaluationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules_path: PathBuf::from("rule-set.json"),
            matching: MatchingConfig::default(),
            batch: BatchConfig::default(),
            evaluation: EvaluationConfig::default(),
        }
    }
}

impl Config {
    /// Create default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let config: Self = match ext {
            "yaml" | "yml" => serde_yaml::from_str(&content)?,
            "json" => serde_json::from_str(&content)?,
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "Unknown config file format: {}",
                    ext
                )))
            }
        };

        config.validate()?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_names = [".rulecraft.yaml", ".rulecraft.yml", ".rulecraft.json"];

        // Check current directory
        for name in &config_names {
            let path = PathBuf::from(name);
            if path.exists() {
                return Self::load(&path);
            }
        }

        // Check home directory
        if let Some(home) = dirs::home_dir() {
            for name in &config_names {
                let path = home.join(name);
                if path.exists() {
                    return Self::load(&path);
                }
            }
        }

        Ok(Self::default())
    }

    /// Reject settings the engine cannot honour
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.matching.threshold > 100 {
            return Err(ConfigError::Invalid(format!(
                "matching.threshold must be between 0 and 100, got {}",
                self.matching.threshold
            )));
        }
        if self.rules_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("rules_path must not be empty".to_string()));
        }
        Ok(())
    }

    /// Merge CLI arguments into configuration
    pub fn merge_cli(
        &mut self,
        rules_path: Option<PathBuf>,
        threshold: Option<u8>,
        strategy: Option<MatchStrategy>,
        unmatched: Option<UnmatchedPolicy>,
        output_dir: Option<PathBuf>,
    ) {
        if let Some(path) = rules_path {
            self.rules_path = path;
        }
        if let Some(t) = threshold {
            self.matching.threshold = t;
        }
        if let Some(s) = strategy {
            self.matching.strategy = s;
        }
        if let Some(u) = unmatched {
            self.batch.unmatched = u;
        }
        if let Some(dir) = output_dir {
            self.batch.output_dir = dir;
        }
    }
}
