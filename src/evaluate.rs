//! Translation precision against a ground truth
//!
//! Every non-blank ground-truth line is compared with the next line of the
//! translation. Precision is the share of exact matches.

use crate::Result;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

const LOG_SEPARATOR: &str = "________________________________________";

/// Exact-line precision of a translation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Precision {
    /// Ground-truth lines reproduced exactly
    pub correct: usize,
    /// Non-blank ground-truth lines
    pub total: usize,
}

impl Precision {
    /// Compare ground-truth text with translated text
    pub fn compute(ground_truth: &str, translation: &str) -> Self {
        let translated: Vec<&str> = translation.lines().map(str::trim_end).collect();

        let mut precision = Self::default();
        for expected in ground_truth.lines().map(str::trim_end) {
            if expected.is_empty() {
                continue;
            }
            if translated.get(precision.total) == Some(&expected) {
                precision.correct += 1;
            }
            precision.total += 1;
        }
        precision
    }

    /// Compare two files
    pub fn from_files(ground_truth: &Path, translation: &Path) -> Result<Self> {
        let expected = std::fs::read_to_string(ground_truth)?;
        let actual = std::fs::read_to_string(translation)?;
        Ok(Self::compute(&expected, &actual))
    }

    /// Precision in `0.0..=1.0`; an empty ground truth scores 0
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }

    pub fn percent(&self) -> f64 {
        self.ratio() * 100.0
    }
}

impl std::fmt::Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}%", self.percent())
    }
}

/// Format one evaluation log entry
pub fn log_entry(date: &str, ground_truth: &Path, translation: &Path, precision: &Precision) -> String {
    format!(
        "{}\n\nSource: {}\nTranslation: {}\nPrecision: {:.2}\n{}\n\n",
        date,
        ground_truth.display(),
        translation.display(),
        precision.percent(),
        LOG_SEPARATOR
    )
}

/// Append an entry dated today to the evaluation log
pub fn append_log(
    log_path: &Path,
    ground_truth: &Path,
    translation: &Path,
    precision: &Precision,
) -> Result<()> {
    if let Some(parent) = log_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let date = chrono::Local::now().format("%Y/%m/%d").to_string();
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;
    file.write_all(log_entry(&date, ground_truth, translation, precision).as_bytes())?;

    log::info!(
        "{} vs {}: precision {}",
        translation.display(),
        ground_truth.display(),
        precision
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_precision_skips_blank_ground_truth_lines() {
        let ground_truth = "int a = 1;\n\nint b = 2;\nint c = 3;\n";
        let translation = "int a = 1;\nint b = 2;\nint c = 4;\n";

        let precision = Precision::compute(ground_truth, translation);
        assert_eq!(precision, Precision { correct: 2, total: 3 });
        assert_eq!(precision.to_string(), "66.67%");
    }

    #[test]
    fn test_precision_short_translation() {
        let precision = Precision::compute("a\nb\nc\n", "a\n");
        assert_eq!(precision, Precision { correct: 1, total: 3 });
    }

    #[test]
    fn test_precision_ignores_line_endings() {
        let precision = Precision::compute("x = 1\r\ny = 2\n", "x = 1\ny = 2");
        assert_eq!(precision.correct, 2);
        assert_eq!(precision.to_string(), "100.00%");
    }

    #[test]
    fn test_empty_ground_truth() {
        let precision = Precision::compute("\n\n", "x = 1\n");
        assert_eq!(precision.total, 0);
        assert_eq!(precision.ratio(), 0.0);
    }

    #[test]
    fn test_log_entry_format() {
        let entry = log_entry(
            "2024/05/01",
            Path::new("data/alloc.java"),
            Path::new("data/translations/translations.java"),
            &Precision { correct: 2, total: 3 },
        );
        assert_eq!(
            entry,
            "2024/05/01\n\nSource: data/alloc.java\nTranslation: data/translations/translations.java\nPrecision: 66.67\n________________________________________\n\n"
        );
    }

    #[test]
    fn test_append_log() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("logs").join("eval.txt");
        let precision = Precision { correct: 1, total: 1 };

        append_log(&log_path, Path::new("a.py"), Path::new("b.py"), &precision).unwrap();
        append_log(&log_path, Path::new("a.py"), Path::new("b.py"), &precision).unwrap();

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert_eq!(content.matches("Precision: 100.00").count(), 2);
    }
}
