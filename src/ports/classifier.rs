//! Classifier port: Trait for the pre-trained risk model.
//!
//! This trait abstracts the exported pipeline format from the application logic.

use crate::domain::{PatientRecord, RiskLabel};

/// Errors raised while running a prediction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InferenceError {
    #[error("invalid patient record: {0}")]
    InvalidRecord(String),

    #[error("classifier failure: {0}")]
    ClassifierFailure(String),
}

/// A trained binary classifier over [`PatientRecord`]s.
///
/// Implementations are read-only after construction and may be shared
/// across renders behind an `Arc`.
pub trait RiskClassifier: Send + Sync {
    /// Predict the class label for a record.
    ///
    /// # Errors
    /// Returns `InferenceError::InvalidRecord` if the record cannot be encoded
    /// for the model, `InferenceError::ClassifierFailure` if evaluation fails.
    fn classify(&self, record: &PatientRecord) -> Result<RiskLabel, InferenceError>;

    /// Estimate the probability of the high-risk class.
    ///
    /// # Errors
    /// Same as [`RiskClassifier::classify`].
    fn estimate_probability(&self, record: &PatientRecord) -> Result<f64, InferenceError>;

    /// Short human-readable description for the diagnostics panel.
    fn summary(&self) -> String {
        "classifier".to_string()
    }
}
