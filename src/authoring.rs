//! Rule authoring from aligned example files
//!
//! Walks three line-aligned sources (Python, Java, C++) in lockstep and
//! learns a new rule from every triple whose shape the database does not
//! already cover. A [`RuleNamer`] supplies rule names and is asked again
//! whenever it proposes a name that is already taken.

use crate::fingerprint::Fingerprinter;
use crate::language::Language;
use crate::matcher::Matcher;
use crate::rules::{AlignedStatements, RuleDatabase};
use crate::{Result, RuleError};

/// Supplies names for newly learned rules
pub trait RuleNamer {
    /// Propose a name for the rule learned from `statement`.
    ///
    /// `rejected` is the previous proposal when it clashed with an existing
    /// rule. Returning `None` skips this statement.
    fn name_rule(&mut self, statement: &str, rejected: Option<&str>) -> Result<Option<String>>;
}

/// Names rules `PREFIX_1`, `PREFIX_2`, ... without asking anyone
#[derive(Debug, Clone)]
pub struct SequentialNamer {
    prefix: String,
    next: usize,
}

impl SequentialNamer {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            next: 1,
        }
    }
}

impl Default for SequentialNamer {
    fn default() -> Self {
        Self::new("RULE")
    }
}

impl RuleNamer for SequentialNamer {
    fn name_rule(&mut self, _statement: &str, _rejected: Option<&str>) -> Result<Option<String>> {
        let name = format!("{}_{}", self.prefix, self.next);
        self.next += 1;
        Ok(Some(name))
    }
}

/// Outcome of a learning pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LearnReport {
    /// Names of rules added, in order
    pub added: Vec<String>,
    /// Triples an existing rule already matched
    pub already_covered: usize,
    /// Triples the namer declined to name
    pub skipped: usize,
}

/// Learn rules from three line-aligned sources.
///
/// Each triple is matched by its Java line. Blank triples are ignored, and
/// the walk stops at the end of the shortest source.
pub fn learn_from_aligned(
    db: &mut RuleDatabase,
    python: &str,
    java: &str,
    cpp: &str,
    fingerprinter: &dyn Fingerprinter,
    matcher: &Matcher<'_>,
    namer: &mut dyn RuleNamer,
) -> Result<LearnReport> {
    let mut report = LearnReport::default();

    for ((py_line, java_line), cpp_line) in python.lines().zip(java.lines()).zip(cpp.lines()) {
        if py_line.trim().is_empty() && java_line.trim().is_empty() && cpp_line.trim().is_empty() {
            continue;
        }

        let fingerprint = fingerprinter.fingerprint(java_line, Language::Java)?;
        if let Some(found) = matcher.rule_match(db, &fingerprint) {
            log::debug!("'{}' already covered by rule '{}'", java_line, found.rule_name);
            report.already_covered += 1;
            continue;
        }

        let statements = AlignedStatements::new(py_line, java_line, cpp_line);
        let mut rejected: Option<String> = None;

        loop {
            let Some(name) = namer.name_rule(java_line, rejected.as_deref())? else {
                report.skipped += 1;
                break;
            };

            match db.add_rule(&statements, &name, fingerprinter) {
                Ok(_) => {
                    report.added.push(name);
                    break;
                }
                Err(RuleError::DuplicateRuleName(taken)) => rejected = Some(taken),
                Err(e) => return Err(e),
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::testing::ShapeFingerprinter;
    use crate::fingerprint::IndelRatio;
    use crate::rules::BOOTSTRAP_RULE;
    use pretty_assertions::assert_eq;

    /// Replays a fixed list of answers, recording every rejection
    struct ScriptedNamer {
        answers: Vec<Option<&'static str>>,
        rejections: Vec<String>,
    }

    impl RuleNamer for ScriptedNamer {
        fn name_rule(&mut self, _statement: &str, rejected: Option<&str>) -> Result<Option<String>> {
            if let Some(r) = rejected {
                self.rejections.push(r.to_string());
            }
            Ok(self.answers.remove(0).map(str::to_string))
        }
    }

    const PY: &str = "b = 5\nc = a + b\n\nc = a * b\n";
    const JAVA: &str = "int b = 5;\nint c = a + b;\n\nint c = a * b;\n";
    const CPP: &str = "int b = 5;\nint c = a + b;\n\nint c = a * b;\n";

    #[test]
    fn test_learn_skips_covered_lines() {
        let mut db = RuleDatabase::bootstrap(&ShapeFingerprinter).unwrap();
        let matcher = Matcher::new(&IndelRatio);
        let mut namer = SequentialNamer::default();

        let report =
            learn_from_aligned(&mut db, PY, JAVA, CPP, &ShapeFingerprinter, &matcher, &mut namer)
                .unwrap();

        assert_eq!(report.already_covered, 2);
        assert_eq!(report.added, vec!["RULE_1"]);
        assert_eq!(report.skipped, 0);
        assert_eq!(db.get("RULE_1").unwrap().python.template, "name_0 = name_1 operator name_2");
    }

    #[test]
    fn test_learn_reprompts_on_duplicate() {
        let mut db = RuleDatabase::bootstrap(&ShapeFingerprinter).unwrap();
        let matcher = Matcher::new(&IndelRatio);
        let mut namer = ScriptedNamer {
            answers: vec![Some(BOOTSTRAP_RULE), Some("BINARY_OP")],
            rejections: Vec::new(),
        };

        let report =
            learn_from_aligned(&mut db, PY, JAVA, CPP, &ShapeFingerprinter, &matcher, &mut namer)
                .unwrap();

        assert_eq!(namer.rejections, vec![BOOTSTRAP_RULE]);
        assert_eq!(report.added, vec!["BINARY_OP"]);
        assert_eq!(db.len(), 2);
    }

    #[test]
    fn test_learn_namer_can_skip() {
        let mut db = RuleDatabase::bootstrap(&ShapeFingerprinter).unwrap();
        let matcher = Matcher::new(&IndelRatio);
        let mut namer = ScriptedNamer {
            answers: vec![None, None],
            rejections: Vec::new(),
        };

        let report =
            learn_from_aligned(&mut db, PY, JAVA, CPP, &ShapeFingerprinter, &matcher, &mut namer)
                .unwrap();

        assert_eq!(report.skipped, 2);
        assert!(report.added.is_empty());
        assert_eq!(db.len(), 1);
    }

    #[test]
    fn test_sequential_namer() {
        let mut namer = SequentialNamer::new("AUTO");
        assert_eq!(namer.name_rule("x", None).unwrap(), Some("AUTO_1".to_string()));
        assert_eq!(namer.name_rule("x", Some("AUTO_1")).unwrap(), Some("AUTO_2".to_string()));
    }
}
