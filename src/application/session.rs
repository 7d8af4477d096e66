//! Session context: owns the lazily loaded model handle.
//!
//! The handle moves from not-loaded to loaded at most once and is never
//! dropped or replaced afterwards. While nothing is loaded, each call to
//! [`Session::ensure_model`] repeats the search.

use crate::application::loader::{LoadError, ModelHandle, ModelLoader};

/// Hint shown next to a load failure.
pub const LOAD_HINT: &str = "Make sure final_model.json exists in a models/ folder.";

/// Model availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelStatus {
    NotLoaded,
    Loaded,
}

/// Status line for the top of the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadBanner {
    /// No attempt yet.
    Pending,
    Loaded(String),
    Failed { message: String, hint: &'static str },
}

/// Per-session state shared across renders.
#[derive(Debug)]
pub struct Session {
    loader: ModelLoader,
    model: Option<ModelHandle>,
    load_error: Option<LoadError>,
    attempts: u32,
}

impl Session {
    #[must_use]
    pub fn new(loader: ModelLoader) -> Self {
        Self {
            loader,
            model: None,
            load_error: None,
            attempts: 0,
        }
    }

    /// Session with a model already in place.
    #[must_use]
    pub fn with_model(loader: ModelLoader, model: ModelHandle) -> Self {
        Self {
            loader,
            model: Some(model),
            load_error: None,
            attempts: 0,
        }
    }

    /// Return the model, loading it first if no load has succeeded yet.
    pub fn ensure_model(&mut self) -> Option<&ModelHandle> {
        if self.model.is_none() {
            self.attempts += 1;
            match self.loader.load() {
                Ok(handle) => {
                    self.model = Some(handle);
                    self.load_error = None;
                }
                Err(e) => {
                    self.load_error = Some(e);
                }
            }
        }
        self.model.as_ref()
    }

    #[must_use]
    pub fn status(&self) -> ModelStatus {
        if self.model.is_some() {
            ModelStatus::Loaded
        } else {
            ModelStatus::NotLoaded
        }
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.status() == ModelStatus::Loaded
    }

    #[must_use]
    pub fn model(&self) -> Option<&ModelHandle> {
        self.model.as_ref()
    }

    /// Error from the most recent failed attempt, cleared on success.
    #[must_use]
    pub fn load_error(&self) -> Option<&LoadError> {
        self.load_error.as_ref()
    }

    #[must_use]
    pub fn loader(&self) -> &ModelLoader {
        &self.loader
    }

    /// Number of load attempts made by this session.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    #[must_use]
    pub fn load_banner(&self) -> LoadBanner {
        match (&self.model, &self.load_error) {
            (Some(handle), _) => {
                LoadBanner::Loaded(format!("Model loaded from: {}", handle.source().display()))
            }
            (None, Some(err)) => LoadBanner::Failed {
                message: err.to_string(),
                hint: LOAD_HINT,
            },
            (None, None) => LoadBanner::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const VALID: &str = include_str!("../../models/final_model.json");

    #[test]
    fn test_starts_not_loaded() {
        let dir = tempdir().expect("tempdir");
        let session = Session::new(ModelLoader::new(dir.path().join("app")));
        assert_eq!(session.status(), ModelStatus::NotLoaded);
        assert_eq!(session.load_banner(), LoadBanner::Pending);
        assert_eq!(session.attempts(), 0);
    }

    #[test]
    fn test_failed_load_keeps_error_and_retries() {
        let dir = tempdir().expect("tempdir");
        let base = dir.path().join("app");
        fs::create_dir_all(&base).expect("base");
        let mut session = Session::new(ModelLoader::new(&base));

        assert!(session.ensure_model().is_none());
        assert!(matches!(session.load_error(), Some(LoadError::NotFound { .. })));
        match session.load_banner() {
            LoadBanner::Failed { message, hint } => {
                assert!(message.starts_with("No model file found"));
                assert_eq!(hint, LOAD_HINT);
            }
            other => panic!("unexpected banner {other:?}"),
        }

        fs::create_dir_all(base.join("models")).expect("models dir");
        fs::write(base.join("models/final_model.json"), VALID).expect("write");

        assert!(session.ensure_model().is_some());
        assert_eq!(session.attempts(), 2);
        assert!(session.load_error().is_none());
        assert_eq!(session.status(), ModelStatus::Loaded);
    }

    #[test]
    fn test_loads_once_and_never_unloads() {
        let dir = tempdir().expect("tempdir");
        let base = dir.path().join("app");
        fs::create_dir_all(&base).expect("base");
        let artifact = base.join("final_model.json");
        fs::write(&artifact, VALID).expect("write");
        let mut session = Session::new(ModelLoader::new(&base));

        let fingerprint = session
            .ensure_model()
            .map(|h| h.fingerprint().to_string())
            .expect("loaded");

        // Replacing or removing the file afterwards has no effect on the session.
        fs::remove_file(&artifact).expect("remove");
        let again = session.ensure_model().expect("still loaded");
        assert_eq!(again.fingerprint(), fingerprint);
        assert_eq!(session.attempts(), 1);
        assert!(matches!(
            session.load_banner(),
            LoadBanner::Loaded(msg) if msg.starts_with("Model loaded from: ")
        ));
    }
}
