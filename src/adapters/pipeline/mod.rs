//! Pipeline adapter: Implementation of RiskClassifier over an exported pipeline.
//!
//! The training side exports a fitted scikit-learn style pipeline to JSON:
//! - standard scaling of numeric columns: `(x - mean) / scale`
//! - one-hot encoding of categorical columns (unknown categories encode as
//!   all zeros, like `handle_unknown="ignore"`)
//! - a logistic-regression head with its own decision threshold
//!
//! Columns that appear in neither block are dropped before the head, as with
//! `remainder="drop"`.
//!
//! The artifact is checked against the 13-key feature contract when it is
//! decoded, so a mismatched export fails at load time rather than on the
//! first prediction.

use std::collections::HashSet;

use serde::Deserialize;

use crate::domain::{PatientRecord, RiskLabel, FEATURE_NAMES};
use crate::ports::{InferenceError, RiskClassifier};

/// Artifact format version understood by this adapter.
pub const FORMAT_VERSION: u32 = 1;

/// Errors raised while decoding an exported pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("cannot read artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid artifact JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported format_version {0} (expected {FORMAT_VERSION})")]
    UnsupportedVersion(u32),

    #[error("feature contract mismatch: {0}")]
    FeatureContract(String),

    #[error("malformed pipeline: {0}")]
    Shape(String),
}

fn default_threshold() -> f64 {
    0.5
}

/// Pipeline parameters as written by the training export.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportedPipeline {
    pub format_version: u32,
    pub feature_names: Vec<String>,
    #[serde(default)]
    pub numeric: Vec<NumericColumn>,
    #[serde(default)]
    pub categorical: Vec<CategoricalColumn>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

/// A standard-scaled numeric input.
#[derive(Debug, Clone, Deserialize)]
pub struct NumericColumn {
    pub name: String,
    pub mean: f64,
    pub scale: f64,
}

/// A one-hot encoded categorical input.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoricalColumn {
    pub name: String,
    pub categories: Vec<f64>,
}

/// A validated logistic pipeline ready for inference.
#[derive(Debug, Clone)]
pub struct LogisticPipeline {
    exported: ExportedPipeline,
}

impl LogisticPipeline {
    /// Decode and validate an artifact from raw bytes.
    ///
    /// # Errors
    /// Returns `PipelineError` if the JSON is malformed or violates the
    /// feature contract.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, PipelineError> {
        let exported: ExportedPipeline = serde_json::from_slice(bytes)?;
        Self::from_exported(exported)
    }

    /// Validate already-decoded pipeline parameters.
    ///
    /// # Errors
    /// Returns `PipelineError` describing the first violated rule.
    pub fn from_exported(exported: ExportedPipeline) -> Result<Self, PipelineError> {
        if exported.format_version != FORMAT_VERSION {
            return Err(PipelineError::UnsupportedVersion(exported.format_version));
        }

        if exported.feature_names.len() != FEATURE_NAMES.len()
            || exported
                .feature_names
                .iter()
                .zip(FEATURE_NAMES)
                .any(|(got, want)| got != want)
        {
            return Err(PipelineError::FeatureContract(format!(
                "expected [{}], got [{}]",
                FEATURE_NAMES.join(", "),
                exported.feature_names.join(", ")
            )));
        }

        let mut seen = HashSet::new();
        let column_names = exported
            .numeric
            .iter()
            .map(|c| c.name.as_str())
            .chain(exported.categorical.iter().map(|c| c.name.as_str()));
        for name in column_names {
            if !FEATURE_NAMES.contains(&name) {
                return Err(PipelineError::FeatureContract(format!(
                    "column '{name}' is not a known feature"
                )));
            }
            if !seen.insert(name) {
                return Err(PipelineError::Shape(format!(
                    "column '{name}' is encoded more than once"
                )));
            }
        }

        for column in &exported.numeric {
            if !column.mean.is_finite() || !column.scale.is_finite() || column.scale == 0.0 {
                return Err(PipelineError::Shape(format!(
                    "column '{}' has invalid scaler parameters (mean={}, scale={})",
                    column.name, column.mean, column.scale
                )));
            }
        }

        for column in &exported.categorical {
            if column.categories.iter().any(|c| !c.is_finite()) {
                return Err(PipelineError::Shape(format!(
                    "column '{}' has a non-finite category",
                    column.name
                )));
            }
        }

        let expected = exported.numeric.len()
            + exported
                .categorical
                .iter()
                .map(|c| c.categories.len())
                .sum::<usize>();
        if exported.coefficients.len() != expected {
            return Err(PipelineError::Shape(format!(
                "expected {expected} coefficients, got {}",
                exported.coefficients.len()
            )));
        }

        if exported.coefficients.iter().any(|w| !w.is_finite()) || !exported.intercept.is_finite()
        {
            return Err(PipelineError::Shape("non-finite model weights".into()));
        }

        if !(exported.threshold > 0.0 && exported.threshold < 1.0) {
            return Err(PipelineError::Shape(format!(
                "threshold {} must lie in (0, 1)",
                exported.threshold
            )));
        }

        Ok(Self { exported })
    }

    /// Decision threshold applied by `classify`.
    fn threshold(&self) -> f64 {
        self.exported.threshold
    }

    /// Apply the preprocessing steps and return the design row.
    fn transform(&self, record: &PatientRecord) -> Result<Vec<f64>, InferenceError> {
        let lookup = |name: &str| {
            record.feature(name).ok_or_else(|| {
                InferenceError::InvalidRecord(format!("missing feature '{name}'"))
            })
        };

        let mut row = Vec::with_capacity(self.exported.coefficients.len());

        for column in &self.exported.numeric {
            let x = lookup(&column.name)?;
            row.push((x - column.mean) / column.scale);
        }

        for column in &self.exported.categorical {
            let x = lookup(&column.name)?;
            row.extend(
                column
                    .categories
                    .iter()
                    .map(|c| if (x - c).abs() < 1e-9 { 1.0 } else { 0.0 }),
            );
        }

        Ok(row)
    }

    fn probability(&self, record: &PatientRecord) -> Result<f64, InferenceError> {
        let row = self.transform(record)?;
        let logit = row
            .iter()
            .zip(&self.exported.coefficients)
            .map(|(x, w)| x * w)
            .sum::<f64>()
            + self.exported.intercept;

        let p = sigmoid(logit);
        if !p.is_finite() {
            return Err(InferenceError::ClassifierFailure(format!(
                "non-finite probability (logit={logit})"
            )));
        }
        Ok(p)
    }
}

/// Logistic function, stable for large |x|.
fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

impl RiskClassifier for LogisticPipeline {
    fn classify(&self, record: &PatientRecord) -> Result<RiskLabel, InferenceError> {
        let p = self.probability(record)?;
        Ok(if p >= self.threshold() {
            RiskLabel::High
        } else {
            RiskLabel::Low
        })
    }

    fn estimate_probability(&self, record: &PatientRecord) -> Result<f64, InferenceError> {
        self.probability(record)
    }

    fn summary(&self) -> String {
        let one_hot: usize = self
            .exported
            .categorical
            .iter()
            .map(|c| c.categories.len())
            .sum();
        format!(
            "logistic regression: {} scaled + {} one-hot inputs, threshold {:.2}",
            self.exported.numeric.len(),
            one_hot,
            self.threshold()
        )
    }
}
