//! Read-only diagnostics for the debug panel.

use std::path::Path;

use crate::application::loader::ARTIFACT_EXTENSION;
use crate::application::session::Session;

/// Snapshot of load status and the filesystem around the loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostics {
    pub model_loaded: bool,
    pub working_dir: String,
    /// Artifact-like entries in the loader's base directory.
    pub model_files: Vec<String>,
    pub source: Option<String>,
    pub fingerprint: Option<String>,
    pub classifier: Option<String>,
    pub load_attempts: u32,
}

impl Diagnostics {
    #[must_use]
    pub fn collect(session: &Session) -> Self {
        let working_dir = std::env::current_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|e| format!("<unavailable: {e}>"));

        let base = session.loader().base_dir();
        let base = if base.as_os_str().is_empty() {
            Path::new(".")
        } else {
            base
        };

        let model = session.model();
        Self {
            model_loaded: session.is_loaded(),
            working_dir,
            model_files: list_model_files(base),
            source: model.map(|m| m.source().display().to_string()),
            fingerprint: model.map(|m| m.fingerprint().chars().take(16).collect()),
            classifier: model.map(|m| m.classifier().summary()),
            load_attempts: session.attempts(),
        }
    }
}

/// Names of entries in `dir` that look like model artifacts, sorted.
///
/// A missing or unreadable directory yields an empty list.
#[must_use]
pub fn list_model_files(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| {
            name == "models"
                || Path::new(name)
                    .extension()
                    .is_some_and(|ext| ext == ARTIFACT_EXTENSION)
        })
        .collect();
    names.sort();
    names
}
