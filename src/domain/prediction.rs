//! Prediction result types.
//!
//! Represents the output of the classification pipeline for one record.

use std::fmt;

/// Decision threshold shown to the user next to the result.
///
/// Informational only: the risk label always comes from the classifier.
pub const DISPLAY_THRESHOLD: f64 = 0.5;

/// Binary risk classification for heart disease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskLabel {
    /// Class 0
    Low,
    /// Class 1
    High,
}

impl RiskLabel {
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::High => 1,
        }
    }

    /// Headline shown in the result panel.
    #[must_use]
    pub fn headline(self) -> &'static str {
        match self {
            Self::Low => "Low Risk of Heart Disease",
            Self::High => "High Risk of Heart Disease",
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// Classifier output for one record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Class label as reported by the classifier.
    pub label: RiskLabel,

    /// Estimated probability of the positive (high-risk) class.
    pub probability: f64,
}

impl Prediction {
    #[must_use]
    pub fn new(label: RiskLabel, probability: f64) -> Self {
        Self { label, probability }
    }

    /// Probability as a one-decimal percentage, e.g. `87.6%`.
    #[must_use]
    pub fn probability_percent(&self) -> String {
        format_percent(self.probability)
    }

    /// Gauge fill in `[0.0, 1.0]`.
    #[must_use]
    pub fn gauge_ratio(&self) -> f64 {
        self.probability.clamp(0.0, 1.0)
    }

    /// True when thresholding the probability at 50% would give the other label.
    #[must_use]
    pub fn disagrees_with_display_threshold(&self) -> bool {
        let by_threshold = if self.probability >= DISPLAY_THRESHOLD {
            RiskLabel::High
        } else {
            RiskLabel::Low
        };
        by_threshold != self.label
    }
}

/// Format a probability as a percentage with one decimal place.
#[must_use]
pub fn format_percent(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}
