use std::fmt;

use serde::{Deserialize, Serialize};

use crate::pbinfo::normalize::{fold_diacritics, normalize_text};

/// Difficulty of a problem, as labelled on its page.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProblemDifficulty {
    #[default]
    Unknown,
    Easy,
    Medium,
    Difficult,
    Contest,
}

impl ProblemDifficulty {
    /// Canonical lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Difficult => "difficult",
            Self::Contest => "contest",
        }
    }

    /// Determine the difficulty from a label.
    ///
    /// Matching ignores case and diacritics and accepts both the canonical
    /// English names and the Romanian labels the site uses (`ușoară`,
    /// `medie`, `dificilă`, `concurs`, plus their masculine forms).
    /// Anything else is [`ProblemDifficulty::Unknown`].
    pub fn parse(input: &str) -> Self {
        match fold_diacritics(normalize_text(input)).as_str() {
            "easy" | "usoara" | "usor" => Self::Easy,
            "medium" | "medie" | "mediu" => Self::Medium,
            "difficult" | "dificila" | "dificil" => Self::Difficult,
            "contest" | "concurs" => Self::Contest,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for ProblemDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
