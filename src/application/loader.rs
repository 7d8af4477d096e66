//! Model loader: Locates and decodes the exported pipeline.
//!
//! Candidates are probed in a fixed order and the first one that exists is
//! the only one tried. A broken artifact at an earlier path is reported even
//! if a later candidate would load; the search never skips past a file it
//! found.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::adapters::pipeline::{LogisticPipeline, PipelineError};
use crate::ports::RiskClassifier;

/// Candidate artifact locations, relative to the loader's base directory.
pub const CANDIDATE_PATHS: [&str; 3] = [
    "models/final_model.json",
    "../models/final_model.json",
    "./final_model.json",
];

/// File extension of exported artifacts.
pub const ARTIFACT_EXTENSION: &str = "json";

/// Errors raised while loading the model.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("No model file found. Please train and export the model first.")]
    NotFound { searched: Vec<PathBuf> },

    #[error("Failed to load model at {}: {source}", path.display())]
    DeserializationFailure {
        path: PathBuf,
        #[source]
        source: PipelineError,
    },
}

/// A loaded classifier together with where it came from.
#[derive(Clone)]
pub struct ModelHandle {
    classifier: Arc<dyn RiskClassifier>,
    source: PathBuf,
    fingerprint: String,
}

impl ModelHandle {
    /// Wrap a classifier.
    ///
    /// `fingerprint` identifies the artifact bytes (hex SHA-256 for loaded files).
    pub fn new(
        classifier: Arc<dyn RiskClassifier>,
        source: impl Into<PathBuf>,
        fingerprint: impl Into<String>,
    ) -> Self {
        Self {
            classifier,
            source: source.into(),
            fingerprint: fingerprint.into(),
        }
    }

    #[must_use]
    pub fn classifier(&self) -> &dyn RiskClassifier {
        self.classifier.as_ref()
    }

    /// Path the artifact was loaded from.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    #[must_use]
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHandle")
            .field("source", &self.source)
            .field("fingerprint", &self.fingerprint)
            .field("classifier", &self.classifier.summary())
            .finish()
    }
}

/// Searches the fixed candidate list for an artifact.
#[derive(Debug, Clone, Default)]
pub struct ModelLoader {
    base_dir: PathBuf,
}

impl ModelLoader {
    /// Loader resolving candidates against `base_dir`.
    ///
    /// The default loader uses an empty base, i.e. the process working directory.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Base directory candidates are resolved against.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Candidate paths in search order.
    #[must_use]
    pub fn candidates(&self) -> Vec<PathBuf> {
        CANDIDATE_PATHS
            .iter()
            .map(|rel| self.base_dir.join(rel))
            .collect()
    }

    /// Load the first existing candidate.
    ///
    /// # Errors
    /// Returns `LoadError::NotFound` when no candidate exists and
    /// `LoadError::DeserializationFailure` when the first existing candidate
    /// cannot be decoded.
    pub fn load(&self) -> Result<ModelHandle, LoadError> {
        let candidates = self.candidates();

        let found = candidates.iter().position(|p| {
            let exists = p.exists();
            tracing::debug!(path = %p.display(), exists, "probing model candidate");
            exists
        });
        let Some(index) = found else {
            tracing::warn!("No model artifact found in {} candidate paths", candidates.len());
            return Err(LoadError::NotFound {
                searched: candidates,
            });
        };
        let path = &candidates[index];

        let fail = |source: PipelineError| {
            tracing::warn!(path = %path.display(), error = %source, "Failed to load model");
            LoadError::DeserializationFailure {
                path: path.clone(),
                source,
            }
        };

        let bytes = std::fs::read(path).map_err(|e| fail(e.into()))?;
        let pipeline = LogisticPipeline::from_slice(&bytes).map_err(fail)?;
        let fingerprint = sha256_hex(&bytes);

        tracing::info!(
            path = %path.display(),
            fingerprint = %&fingerprint[..16],
            "Model loaded"
        );

        Ok(ModelHandle::new(Arc::new(pipeline), path.clone(), fingerprint))
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    const VALID: &str = include_str!("../../models/final_model.json");
    const BROKEN: &str = "{ not json";

    /// `<tmp>/app` is the base; `../models` resolves to `<tmp>/models`.
    fn layout() -> (TempDir, ModelLoader) {
        let root = tempdir().expect("tempdir");
        let base = root.path().join("app");
        fs::create_dir_all(&base).expect("create base");
        (root, ModelLoader::new(base))
    }

    fn write(path: &Path, contents: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(path, contents).expect("write artifact");
    }

    #[test]
    fn test_candidates_keep_fixed_order() {
        let loader = ModelLoader::default();
        let candidates = loader.candidates();
        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0], PathBuf::from("models/final_model.json"));
        assert_eq!(candidates[1], PathBuf::from("../models/final_model.json"));
        assert_eq!(candidates[2], PathBuf::from("./final_model.json"));
    }

    #[test]
    fn test_single_valid_candidate_loads_from_its_path() {
        for (index, _) in CANDIDATE_PATHS.iter().enumerate() {
            let (_root, loader) = layout();
            let target = loader.candidates()[index].clone();
            write(&target, VALID);

            let handle = loader.load().expect("should load");
            assert_eq!(handle.source(), target.as_path());
            assert_eq!(handle.fingerprint().len(), 64);
        }
    }

    #[test]
    fn test_later_broken_candidates_are_ignored() {
        let (_root, loader) = layout();
        let candidates = loader.candidates();
        write(&candidates[1], VALID);
        write(&candidates[2], BROKEN);

        let handle = loader.load().expect("should load");
        assert_eq!(handle.source(), candidates[1].as_path());
    }

    #[test]
    fn test_first_existing_broken_candidate_fails_fast() {
        let (_root, loader) = layout();
        let candidates = loader.candidates();
        write(&candidates[0], BROKEN);
        write(&candidates[1], VALID);

        match loader.load() {
            Err(LoadError::DeserializationFailure { path, source }) => {
                assert_eq!(path, candidates[0]);
                assert!(matches!(source, PipelineError::Json(_)));
            }
            other => panic!("expected deserialization failure, got {other:?}"),
        }
    }

    #[test]
    fn test_contract_violation_is_a_deserialization_failure() {
        let (_root, loader) = layout();
        let mismatched = VALID.replace("\"trestbps\", \"chol\"", "\"chol\", \"trestbps\"");
        assert_ne!(mismatched, VALID);
        write(&loader.candidates()[2], &mismatched);

        let err = loader.load().expect_err("must fail");
        assert!(matches!(
            err,
            LoadError::DeserializationFailure {
                source: PipelineError::FeatureContract(_),
                ..
            }
        ));
        assert!(err.to_string().starts_with("Failed to load model at "));
    }

    #[test]
    fn test_directory_at_candidate_path_is_not_skipped() {
        let (_root, loader) = layout();
        let candidates = loader.candidates();
        fs::create_dir_all(&candidates[0]).expect("create dir");
        write(&candidates[2], VALID);

        let err = loader.load().expect_err("must fail");
        assert!(matches!(
            err,
            LoadError::DeserializationFailure {
                source: PipelineError::Io(_),
                ..
            }
        ));
    }

    #[test]
    fn test_not_found_lists_searched_paths() {
        let (_root, loader) = layout();
        match loader.load() {
            Err(LoadError::NotFound { searched }) => assert_eq!(searched, loader.candidates()),
            other => panic!("expected not found, got {other:?}"),
        }
    }

    #[test]
    fn test_retry_after_failure_repeats_search() {
        let (_root, loader) = layout();
        assert!(loader.load().is_err());

        write(&loader.candidates()[0], VALID);
        assert!(loader.load().is_ok());
    }
}
