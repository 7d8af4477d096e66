//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! model loading, the session state and the prediction flow.

pub mod diagnostics;
pub mod loader;
pub mod prediction;
pub mod session;

pub use diagnostics::Diagnostics;
pub use loader::{LoadError, ModelHandle, ModelLoader, CANDIDATE_PATHS};
pub use prediction::{predict, submit, SubmitOutcome, MODEL_UNAVAILABLE_MESSAGE};
pub use session::{LoadBanner, ModelStatus, Session};
