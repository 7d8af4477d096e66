//! # CardioRisk
//!
//! Terminal front end for a pre-trained heart-disease risk classifier.
//!
//! This crate provides:
//! - Loading of an exported preprocessing + logistic regression pipeline
//! - A bounded 13-field patient form and single-record prediction
//! - Log redaction so clinical values never reach log sinks
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (PatientRecord, Prediction)
//! - `ports`: Trait definitions for the classifier
//! - `adapters`: Concrete implementations (exported pipeline, log sanitizing)
//! - `application`: Use cases orchestrating domain and ports
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use application::{LoadError, ModelHandle, ModelLoader, Session, SubmitOutcome};
pub use domain::{PatientRecord, Prediction, RiskLabel};
pub use ports::{InferenceError, RiskClassifier};
