//! Adapters layer: Concrete implementations of ports.
//!
//! - `pipeline`: the exported scaler + one-hot + logistic regression artifact
//! - `sanitize`: clinical value filtering for logs

pub mod pipeline;
pub mod sanitize;

pub use pipeline::{LogisticPipeline, PipelineError};
