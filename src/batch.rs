//! Batch translation of statement files
//!
//! Translates a source file line by line and writes one output file per
//! target language (`translations.py`, `translations.java`,
//! `translations.cpp`). Blank lines are skipped; lines no rule matches are
//! handled according to the [`UnmatchedPolicy`].

use crate::engine::Engine;
use crate::language::Language;
use crate::{Result, RuleError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// What to emit for a line no rule matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmatchedPolicy {
    /// Copy the source line unchanged
    Passthrough,
    /// Emit a comment in the target language naming the source line
    #[default]
    Marker,
    /// Emit nothing; the line number is kept in the report
    Drop,
}

impl std::str::FromStr for UnmatchedPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "passthrough" => Ok(UnmatchedPolicy::Passthrough),
            "marker" => Ok(UnmatchedPolicy::Marker),
            "drop" => Ok(UnmatchedPolicy::Drop),
            _ => Err(format!("Unknown unmatched-line policy: {}", s)),
        }
    }
}

/// Marker line written for an untranslated statement
pub fn untranslated_marker(language: Language, line: &str) -> String {
    format!("{} untranslated: {}", language.comment_prefix(), line.trim())
}

/// Output file for one language inside `dir`
pub fn output_path(dir: &Path, language: Language) -> PathBuf {
    dir.join(format!("translations.{}", language.extension()))
}

/// Result of translating one source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Non-blank lines read
    pub lines: usize,
    /// Lines a rule matched
    pub translated: usize,
    /// 1-based numbers of lines no rule matched
    pub unmatched: Vec<usize>,
    /// 1-based numbers of matched lines with unfilled placeholders
    pub incomplete: Vec<usize>,
    /// Translated text per target language
    pub outputs: Vec<(Language, String)>,
    /// Files written, if any
    pub written: Vec<PathBuf>,
}

impl BatchReport {
    /// Output text for one language
    pub fn output(&self, language: Language) -> Option<&str> {
        self.outputs
            .iter()
            .find(|(lang, _)| *lang == language)
            .map(|(_, text)| text.as_str())
    }

    /// Get summary string
    pub fn summary(&self) -> String {
        format!(
            "{} of {} lines translated, {} unmatched, {} incomplete",
            self.translated,
            self.lines,
            self.unmatched.len(),
            self.incomplete.len()
        )
    }
}

/// Translates whole sources through an [`Engine`]
pub struct BatchTranslator<'e, 'a> {
    engine: &'e Engine<'a>,
    policy: UnmatchedPolicy,
    targets: Vec<Language>,
}

impl<'e, 'a> BatchTranslator<'e, 'a> {
    pub fn new(engine: &'e Engine<'a>, policy: UnmatchedPolicy) -> Self {
        Self {
            engine,
            policy,
            targets: Language::ALL.to_vec(),
        }
    }

    /// Restrict output to the given languages
    pub fn with_targets(mut self, targets: Vec<Language>) -> Self {
        self.targets = targets;
        self
    }

    /// Translate source text written in `language`
    pub fn translate_source(&self, source: &str, language: Language) -> Result<BatchReport> {
        let mut report = BatchReport::default();
        let mut outputs: Vec<(Language, String)> =
            self.targets.iter().map(|&lang| (lang, String::new())).collect();

        for (index, line) in source.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let line_no = index + 1;
            report.lines += 1;

            match self.engine.translate_statement(line, language) {
                Ok(translation) => {
                    log::debug!("line {}: rule '{}'", line_no, translation.rule_name);
                    report.translated += 1;
                    if !translation.is_complete() {
                        report.incomplete.push(line_no);
                    }
                    for (lang, text) in outputs.iter_mut() {
                        if let Some(statement) = translation.get(*lang) {
                            text.push_str(statement);
                            text.push('\n');
                        }
                    }
                }
                Err(RuleError::NoMatchFound(_)) => {
                    report.unmatched.push(line_no);
                    for (lang, text) in outputs.iter_mut() {
                        match self.policy {
                            UnmatchedPolicy::Passthrough => {
                                text.push_str(line.trim_end());
                                text.push('\n');
                            }
                            UnmatchedPolicy::Marker => {
                                text.push_str(&untranslated_marker(*lang, line));
                                text.push('\n');
                            }
                            UnmatchedPolicy::Drop => {}
                        }
                    }
                    if self.policy == UnmatchedPolicy::Drop {
                        log::warn!("line {}: no rule matched, dropped", line_no);
                    }
                }
                Err(e) => return Err(e),
            }
        }

        report.outputs = outputs;
        Ok(report)
    }

    /// Translate a file and write one output file per target language
    pub fn translate_file(
        &self,
        input: &Path,
        language: Language,
        output_dir: &Path,
    ) -> Result<BatchReport> {
        let source = std::fs::read_to_string(input)?;
        let mut report = self.translate_source(&source, language)?;

        std::fs::create_dir_all(output_dir)?;
        for (lang, text) in &report.outputs {
            let path = output_path(output_dir, *lang);
            std::fs::write(&path, text)?;
            report.written.push(path);
        }

        log::info!("{}: {}", input.display(), report.summary());
        Ok(report)
    }
}
