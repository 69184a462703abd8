//! Structural fingerprints and fingerprint similarity
//!
//! The matcher never looks at statement text directly. It compares
//! fingerprints, which are canonical serializations of a statement's syntax
//! tree, using a 0-100 similarity score. Both collaborators sit behind traits
//! so the engine can run against any parser or scorer.

use crate::language::Language;
use crate::Result;
use similar::TextDiff;

/// Produces a structural fingerprint for a statement
pub trait Fingerprinter {
    /// Fingerprint `text` as written in `language`.
    ///
    /// Must be deterministic and depend only on the statement's shape.
    fn fingerprint(&self, text: &str, language: Language) -> Result<String>;
}

/// Scores how close two fingerprints are
pub trait Similarity {
    /// Symmetric score in `0..=100`, 100 only for identical inputs
    fn score(&self, a: &str, b: &str) -> u8;
}

/// Indel similarity ratio: `2 * matches / (len(a) + len(b))`, as a percentage.
///
/// Rounded to the nearest integer; unequal inputs never score 100.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndelRatio;

impl Similarity for IndelRatio {
    fn score(&self, a: &str, b: &str) -> u8 {
        if a == b {
            return 100;
        }

        let ratio = TextDiff::from_chars(a, b).ratio() * 100.0;
        (ratio.round() as u8).min(99)
    }
}

#[cfg(feature = "tree-sitter")]
pub use self::tree_sitter_backend::TreeSitterFingerprinter;

#[cfg(feature = "tree-sitter")]
mod tree_sitter_backend {
    use super::Fingerprinter;
    use crate::language::Language;
    use crate::{Result, RuleError};

    /// Literal node kinds, across all three grammars
    const LITERAL_KINDS: [&str; 9] = [
        "integer",
        "float",
        "decimal_integer_literal",
        "hex_integer_literal",
        "octal_integer_literal",
        "binary_integer_literal",
        "decimal_floating_point_literal",
        "hex_floating_point_literal",
        "number_literal",
    ];

    /// Primitive type node kinds, across all three grammars
    const TYPE_KINDS: [&str; 3] = ["integral_type", "floating_point_type", "primitive_type"];

    fn normalized_kind(kind: &str) -> &str {
        if LITERAL_KINDS.contains(&kind) {
            "literal"
        } else if TYPE_KINDS.contains(&kind) {
            "type"
        } else {
            kind
        }
    }

    /// Write the named-node S-expression under the cursor, with literal and
    /// primitive type kinds collapsed so `int b = 5;` and `double d = 2.0;`
    /// share a fingerprint
    fn write_sexp(cursor: &mut tree_sitter::TreeCursor, out: &mut String) {
        out.push('(');
        out.push_str(normalized_kind(cursor.node().kind()));

        if cursor.goto_first_child() {
            loop {
                if cursor.node().is_named() {
                    out.push(' ');
                    if let Some(field) = cursor.field_name() {
                        out.push_str(field);
                        out.push_str(": ");
                    }
                    write_sexp(cursor, out);
                }
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
            cursor.goto_parent();
        }

        out.push(')');
    }

    /// Fingerprints statements as the S-expression of their tree-sitter parse
    pub struct TreeSitterFingerprinter {
        python: tree_sitter::Language,
        java: tree_sitter::Language,
        cpp: tree_sitter::Language,
    }

    impl TreeSitterFingerprinter {
        pub fn new() -> Self {
            Self {
                python: tree_sitter_python::LANGUAGE.into(),
                java: tree_sitter_java::LANGUAGE.into(),
                cpp: tree_sitter_cpp::LANGUAGE.into(),
            }
        }

        fn grammar(&self, language: Language) -> &tree_sitter::Language {
            match language {
                Language::Python => &self.python,
                Language::Java => &self.java,
                Language::Cpp => &self.cpp,
            }
        }
    }

    impl Default for TreeSitterFingerprinter {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Fingerprinter for TreeSitterFingerprinter {
        fn fingerprint(&self, text: &str, language: Language) -> Result<String> {
            let source = text.trim_end();
            let mut parser = tree_sitter::Parser::new();
            parser
                .set_language(self.grammar(language))
                .map_err(|e| RuleError::Fingerprint(e.to_string()))?;

            let tree = parser.parse(source, None).ok_or_else(|| {
                RuleError::Fingerprint(format!("{} parser produced no tree for '{}'", language, source))
            })?;

            let mut sexp = String::new();
            write_sexp(&mut tree.walk(), &mut sexp);
            Ok(sexp)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_same_shape_same_fingerprint() {
            let fp = TreeSitterFingerprinter::new();
            let a = fp.fingerprint("b = 5", Language::Python).unwrap();
            let b = fp.fingerprint("x = 9\n", Language::Python).unwrap();
            assert_eq!(a, b);

            let a = fp.fingerprint("int b = 5;", Language::Java).unwrap();
            let b = fp.fingerprint("int x = 12;", Language::Java).unwrap();
            assert_eq!(a, b);

            let a = fp.fingerprint("int b = 5;", Language::Cpp).unwrap();
            let b = fp.fingerprint("int x = 12;", Language::Cpp).unwrap();
            assert_eq!(a, b);
        }

        #[test]
        fn test_literal_and_type_kinds_collapsed() {
            let fp = TreeSitterFingerprinter::new();
            let a = fp.fingerprint("b = 5", Language::Python).unwrap();
            let b = fp.fingerprint("y = 3.5", Language::Python).unwrap();
            assert_eq!(a, b);

            let a = fp.fingerprint("int b = 5;", Language::Java).unwrap();
            let b = fp.fingerprint("double d = 2.0;", Language::Java).unwrap();
            assert_eq!(a, b);

            let a = fp.fingerprint("int b = 5;", Language::Cpp).unwrap();
            let b = fp.fingerprint("float f = 0.5;", Language::Cpp).unwrap();
            assert_eq!(a, b);
        }

        #[test]
        fn test_different_shape_different_fingerprint() {
            let fp = TreeSitterFingerprinter::new();
            let a = fp.fingerprint("b = 5", Language::Python).unwrap();
            let b = fp.fingerprint("print(b)", Language::Python).unwrap();
            assert_ne!(a, b);
        }

        #[test]
        fn test_fingerprint_is_sexp() {
            let fp = TreeSitterFingerprinter::new();
            let sexp = fp.fingerprint("b = 5", Language::Python).unwrap();
            assert_eq!(
                sexp,
                "(module (expression_statement (assignment left: (identifier) right: (literal))))"
            );
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{Fingerprinter, Similarity};
    use crate::language::Language;
    use crate::template::genericize;
    use crate::Result;
    use std::collections::HashMap;

    /// Fingerprints a statement by its generic template
    pub(crate) struct ShapeFingerprinter;

    impl Fingerprinter for ShapeFingerprinter {
        fn fingerprint(&self, text: &str, language: Language) -> Result<String> {
            let shape = genericize(text)
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
            Ok(format!("({} {})", language, shape))
        }
    }

    /// Returns preset scores per stored fingerprint, 0 otherwise
    #[derive(Default)]
    pub(crate) struct ScriptedSimilarity {
        pub scores: HashMap<String, u8>,
    }

    impl ScriptedSimilarity {
        pub(crate) fn with(mut self, stored: &str, score: u8) -> Self {
            self.scores.insert(stored.to_string(), score);
            self
        }
    }

    impl Similarity for ScriptedSimilarity {
        fn score(&self, a: &str, b: &str) -> u8 {
            self.scores
                .get(a)
                .or_else(|| self.scores.get(b))
                .copied()
                .unwrap_or(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_scores_100() {
        assert_eq!(IndelRatio.score("(module)", "(module)"), 100);
        assert_eq!(IndelRatio.score("", ""), 100);
    }

    #[test]
    fn test_disjoint_scores_0() {
        assert_eq!(IndelRatio.score("abc", "xyz"), 0);
        assert_eq!(IndelRatio.score("abc", ""), 0);
    }

    #[test]
    fn test_known_ratio() {
        assert_eq!(IndelRatio.score("kitten", "sitting"), 62);
    }

    #[test]
    fn test_symmetric() {
        let a = "(module (expression_statement (assignment)))";
        let b = "(program (local_variable_declaration))";
        assert_eq!(IndelRatio.score(a, b), IndelRatio.score(b, a));
    }

    #[test]
    fn test_near_identical_capped_below_100() {
        let a = "a".repeat(300);
        let b = format!("{}b", "a".repeat(299));
        assert_eq!(IndelRatio.score(&a, &b), 99);
    }
}
