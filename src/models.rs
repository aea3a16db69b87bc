use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Sentinel the portal shows for a course that is graded but not yet published.
pub const UNPUBLISHED: &str = "***";

/// Canonical identifier for an academic term, derived from the free-text
/// semester label on the report page. Contains only `[a-zA-Z0-9-]`, so it is
/// safe to use directly as a cache file name or remote store key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SemesterId(String);

impl SemesterId {
    /// Trims surrounding whitespace and replaces every remaining
    /// non-alphanumeric character with a dash. Deterministic, so repeated
    /// scrapes of the same term always map to the same id.
    pub fn from_label(label: &str) -> Self {
        let re = Regex::new(r"[^a-zA-Z0-9]").unwrap();
        SemesterId(re.replace_all(label.trim(), "-").into_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SemesterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One course row from the report: description plus the raw grade string
/// ("5.5", "***", or a normalized pass/fail substitution).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseGrade {
    pub description: String,
    pub grade: String,
}

/// Fresh snapshot of one term's grades, in the report's row order. Produced
/// on every fetch and never persisted directly; only the cache's merged
/// snapshot survives the run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SemesterReport {
    pub entries: Vec<CourseGrade>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semester_id_replaces_specials_with_dashes() {
        assert_eq!(SemesterId::from_label("Herbst 2013/14").as_str(), "Herbst-2013-14");
    }

    #[test]
    fn semester_id_trims_surrounding_whitespace() {
        assert_eq!(SemesterId::from_label("  TestSemester\n").as_str(), "TestSemester");
    }

    #[test]
    fn semester_id_is_deterministic() {
        let a = SemesterId::from_label("FS 2024");
        let b = SemesterId::from_label("FS 2024");
        assert_eq!(a, b);
    }
}
