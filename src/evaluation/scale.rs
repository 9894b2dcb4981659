use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualitative grade for a normalized score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingLabel {
    Deficiente,
    Regular,
    Aceptable,
    Bueno,
    Excelente,
}

impl RatingLabel {
    /// Maps a score normalized to `[0, 1]` onto the five-step scale.
    ///
    /// Input is not clamped; anything below 0.20 (including negatives) is `Deficiente`, and
    /// anything at or above 0.80 is `Excelente`.
    pub fn classify(normalized: f64) -> Self {
        if normalized < 0.2 {
            Self::Deficiente
        } else if normalized < 0.4 {
            Self::Regular
        } else if normalized < 0.6 {
            Self::Aceptable
        } else if normalized < 0.8 {
            Self::Bueno
        } else {
            Self::Excelente
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Deficiente => "Deficiente",
            Self::Regular => "Regular",
            Self::Aceptable => "Aceptable",
            Self::Bueno => "Bueno",
            Self::Excelente => "Excelente",
        }
    }
}

impl fmt::Display for RatingLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
