//! Supported source languages

use crate::RuleError;
use serde::{Deserialize, Serialize};

/// A language the translator can read and emit
///
/// The declaration order is the fixed output order used everywhere a
/// translation lists one statement per language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Language {
    Python,
    Java,
    Cpp,
}

impl Language {
    /// All languages in output order
    pub const ALL: [Language; 3] = [Language::Python, Language::Java, Language::Cpp];

    /// File extension used for batch output and ground-truth lookup
    pub fn extension(&self) -> &'static str {
        match self {
            Language::Python => "py",
            Language::Java => "java",
            Language::Cpp => "cpp",
        }
    }

    /// Line comment prefix
    pub fn comment_prefix(&self) -> &'static str {
        match self {
            Language::Python => "#",
            Language::Java | Language::Cpp => "//",
        }
    }

    /// Detect language from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "py" => Some(Language::Python),
            "java" => Some(Language::Java),
            "cpp" | "cc" | "cxx" | "hpp" | "h" => Some(Language::Cpp),
            _ => None,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::Python => write!(f, "PYTHON"),
            Language::Java => write!(f, "JAVA"),
            Language::Cpp => write!(f, "CPP"),
        }
    }
}

impl std::str::FromStr for Language {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PY" | "PYTHON" => Ok(Language::Python),
            "JAVA" => Ok(Language::Java),
            "CPP" | "C++" => Ok(Language::Cpp),
            _ => Err(RuleError::UnsupportedLanguage(s.trim().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language_tags() {
        assert_eq!("PYTHON".parse::<Language>().unwrap(), Language::Python);
        assert_eq!("py".parse::<Language>().unwrap(), Language::Python);
        assert_eq!("Java".parse::<Language>().unwrap(), Language::Java);
        assert_eq!("c++".parse::<Language>().unwrap(), Language::Cpp);
        assert_eq!(" CPP \n".parse::<Language>().unwrap(), Language::Cpp);
    }

    #[test]
    fn test_unsupported_language() {
        let err = "RUST".parse::<Language>().unwrap_err();
        assert!(matches!(err, RuleError::UnsupportedLanguage(ref tag) if tag == "RUST"));
    }

    #[test]
    fn test_display_roundtrips() {
        for language in Language::ALL {
            assert_eq!(language.to_string().parse::<Language>().unwrap(), language);
        }
    }

    #[test]
    fn test_output_order() {
        let mut sorted = vec![Language::Cpp, Language::Python, Language::Java];
        sorted.sort();
        assert_eq!(sorted, Language::ALL.to_vec());
    }

    #[test]
    fn test_extension_mapping() {
        assert_eq!(Language::Java.extension(), "java");
        assert_eq!(Language::from_extension("cpp"), Some(Language::Cpp));
        assert_eq!(Language::from_extension("rs"), None);
    }
}
