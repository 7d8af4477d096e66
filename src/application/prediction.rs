//! Prediction use case: guard, validate, invoke, translate.

use crate::application::loader::ModelHandle;
use crate::domain::{PatientRecord, Prediction};
use crate::ports::{InferenceError, RiskClassifier};

/// Guard message shown when submitting without a model.
pub const MODEL_UNAVAILABLE_MESSAGE: &str = "Model not loaded. Please check the model file.";

/// Result of one form submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// No model handle: nothing was invoked.
    ModelUnavailable,
    Predicted(Prediction),
    Failed(InferenceError),
}

impl SubmitOutcome {
    /// User-facing error text, if the submission did not produce a prediction.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self {
            Self::ModelUnavailable => Some(MODEL_UNAVAILABLE_MESSAGE.to_string()),
            Self::Predicted(_) => None,
            Self::Failed(e) => Some(format!("Prediction failed: {e}")),
        }
    }

    #[must_use]
    pub fn prediction(&self) -> Option<&Prediction> {
        match self {
            Self::Predicted(p) => Some(p),
            _ => None,
        }
    }
}

/// Run the classifier on a record.
///
/// The label is taken from `classify` as-is; it is not re-derived from the
/// probability.
///
/// # Errors
/// Returns `InferenceError::InvalidRecord` for out-of-domain records (the
/// classifier is not called) and `InferenceError::ClassifierFailure` when the
/// classifier fails or reports a probability outside `[0, 1]`.
pub fn predict(
    classifier: &dyn RiskClassifier,
    record: &PatientRecord,
) -> Result<Prediction, InferenceError> {
    record
        .validate()
        .map_err(|errors| InferenceError::InvalidRecord(errors.join(", ")))?;

    let label = classifier.classify(record)?;
    let probability = classifier.estimate_probability(record)?;

    if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
        return Err(InferenceError::ClassifierFailure(format!(
            "probability {probability} outside [0, 1]"
        )));
    }

    Ok(Prediction::new(label, probability))
}

/// Handle a form submission against the session's model, if any.
#[must_use]
pub fn submit(model: Option<&ModelHandle>, record: &PatientRecord) -> SubmitOutcome {
    let Some(handle) = model else {
        tracing::warn!("Prediction requested without a loaded model");
        return SubmitOutcome::ModelUnavailable;
    };

    match predict(handle.classifier(), record) {
        Ok(prediction) => {
            tracing::info!(
                label = %prediction.label,
                code = prediction.label.code(),
                probability = prediction.probability,
                "Prediction complete"
            );
            if prediction.disagrees_with_display_threshold() {
                tracing::debug!("Label disagrees with the 50% display threshold");
            }
            SubmitOutcome::Predicted(prediction)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Prediction failed");
            SubmitOutcome::Failed(e)
        }
    }
}
