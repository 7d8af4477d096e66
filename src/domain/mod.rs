//! Domain layer: Core business types.
//!
//! Pure Rust types with no I/O. The patient record and the prediction
//! it produces.

mod prediction;
mod record;

pub use prediction::{format_percent, Prediction, RiskLabel, DISPLAY_THRESHOLD};
pub use record::{
    Categorical, ChestPain, PatientRecord, RestingEcg, Sex, StSlope, Thalassemia, VesselCount,
    YesNo, AGE_RANGE, CHOL_RANGE, FEATURE_NAMES, OLDPEAK_RANGE, THALACH_RANGE, TRESTBPS_RANGE,
};
