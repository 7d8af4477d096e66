//! Patient record for heart-disease risk prediction.
//!
//! Thirteen clinical measurements following the UCI heart-disease feature set.
//! Categorical fields are explicit enums with a code <-> label table so the
//! value fed to the model never depends on presentation text.

use std::fmt;
use std::ops::RangeInclusive;

/// Feature keys expected by the exported pipeline, in contract order.
pub const FEATURE_NAMES: [&str; 13] = [
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
    "slope", "ca", "thal",
];

/// Age in years.
pub const AGE_RANGE: RangeInclusive<u32> = 18..=100;
/// Resting blood pressure in mmHg.
pub const TRESTBPS_RANGE: RangeInclusive<u32> = 80..=200;
/// Serum cholesterol in mg/dl.
pub const CHOL_RANGE: RangeInclusive<u32> = 100..=600;
/// Maximum heart rate achieved in bpm.
pub const THALACH_RANGE: RangeInclusive<u32> = 60..=220;
/// ST depression induced by exercise relative to rest.
pub const OLDPEAK_RANGE: RangeInclusive<f64> = 0.0..=10.0;

/// A categorical clinical field with a fixed code table.
pub trait Categorical: Copy + PartialEq + fmt::Debug + 'static {
    /// Options in presentation order. The first one is the form default.
    const OPTIONS: &'static [Self];

    /// Numeric code the model was trained on.
    fn code(self) -> u8;

    /// Display text.
    fn label(self) -> &'static str;

    #[must_use]
    fn from_code(code: u8) -> Option<Self> {
        Self::OPTIONS.iter().copied().find(|o| o.code() == code)
    }

    #[must_use]
    fn from_label(label: &str) -> Option<Self> {
        Self::OPTIONS.iter().copied().find(|o| o.label() == label)
    }

    /// Position of this option in `OPTIONS`.
    #[must_use]
    fn position(self) -> usize {
        Self::OPTIONS.iter().position(|o| *o == self).unwrap_or(0)
    }

    /// Next (or previous) option, wrapping around.
    #[must_use]
    fn cycle(self, forward: bool) -> Self {
        let n = Self::OPTIONS.len();
        let i = self.position();
        let next = if forward { (i + 1) % n } else { (i + n - 1) % n };
        Self::OPTIONS[next]
    }
}

macro_rules! categorical {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl Categorical for $name {
            const OPTIONS: &'static [Self] = &[$( Self::$variant ),+];

            fn code(self) -> u8 {
                match self {
                    $( Self::$variant => $code ),+
                }
            }

            fn label(self) -> &'static str {
                match self {
                    $( Self::$variant => $label ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

categorical! {
    /// Biological sex (`sex`).
    Sex {
        Male = 1 => "Male",
        Female = 0 => "Female",
    }
}

categorical! {
    /// Chest pain type (`cp`).
    ChestPain {
        TypicalAngina = 0 => "Typical Angina",
        AtypicalAngina = 1 => "Atypical Angina",
        NonAnginalPain = 2 => "Non-anginal Pain",
        Asymptomatic = 3 => "Asymptomatic",
    }
}

categorical! {
    /// Binary flag used by `fbs` and `exang`.
    YesNo {
        No = 0 => "No",
        Yes = 1 => "Yes",
    }
}

categorical! {
    /// Resting electrocardiographic result (`restecg`).
    RestingEcg {
        Normal = 0 => "Normal",
        StTAbnormality = 1 => "ST-T Wave Abnormality",
        LvHypertrophy = 2 => "Left Ventricular Hypertrophy",
    }
}

categorical! {
    /// Slope of the peak exercise ST segment (`slope`).
    StSlope {
        Upsloping = 0 => "Upsloping",
        Flat = 1 => "Flat",
        Downsloping = 2 => "Downsloping",
    }
}

categorical! {
    /// Number of major vessels colored by fluoroscopy (`ca`).
    VesselCount {
        Zero = 0 => "0",
        One = 1 => "1",
        Two = 2 => "2",
        Three = 3 => "3",
    }
}

categorical! {
    /// Thalassemia (`thal`).
    Thalassemia {
        Normal = 1 => "Normal",
        FixedDefect = 2 => "Fixed Defect",
        ReversibleDefect = 3 => "Reversible Defect",
    }
}

/// One patient's measurements, assembled fresh on every submission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatientRecord {
    pub age: u32,
    pub sex: Sex,
    pub cp: ChestPain,
    pub trestbps: u32,
    pub chol: u32,
    pub fbs: YesNo,
    pub restecg: RestingEcg,
    pub thalach: u32,
    pub exang: YesNo,
    pub oldpeak: f64,
    pub slope: StSlope,
    pub ca: VesselCount,
    pub thal: Thalassemia,
}

impl Default for PatientRecord {
    /// Form defaults.
    fn default() -> Self {
        Self {
            age: 55,
            sex: Sex::OPTIONS[0],
            cp: ChestPain::OPTIONS[0],
            trestbps: 130,
            chol: 246,
            fbs: YesNo::No,
            restecg: RestingEcg::OPTIONS[0],
            thalach: 150,
            exang: YesNo::No,
            oldpeak: 1.0,
            slope: StSlope::OPTIONS[0],
            ca: VesselCount::OPTIONS[0],
            thal: Thalassemia::OPTIONS[0],
        }
    }
}

impl PatientRecord {
    /// Named feature values in contract order.
    #[must_use]
    pub fn features(&self) -> [(&'static str, f64); 13] {
        let values = [
            f64::from(self.age),
            f64::from(self.sex.code()),
            f64::from(self.cp.code()),
            f64::from(self.trestbps),
            f64::from(self.chol),
            f64::from(self.fbs.code()),
            f64::from(self.restecg.code()),
            f64::from(self.thalach),
            f64::from(self.exang.code()),
            self.oldpeak,
            f64::from(self.slope.code()),
            f64::from(self.ca.code()),
            f64::from(self.thal.code()),
        ];

        let mut out = [("", 0.0); 13];
        for (slot, (name, value)) in out.iter_mut().zip(FEATURE_NAMES.into_iter().zip(values)) {
            *slot = (name, value);
        }
        out
    }

    /// Look up a single feature by its contract key.
    #[must_use]
    pub fn feature(&self, name: &str) -> Option<f64> {
        self.features()
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
    }

    /// Check every numeric field against its domain.
    ///
    /// Categorical fields are valid by construction.
    ///
    /// # Errors
    /// Returns one message per violated constraint.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        let integer_checks = [
            ("age", self.age, &AGE_RANGE),
            ("trestbps", self.trestbps, &TRESTBPS_RANGE),
            ("chol", self.chol, &CHOL_RANGE),
            ("thalach", self.thalach, &THALACH_RANGE),
        ];
        for (name, value, range) in integer_checks {
            if !range.contains(&value) {
                errors.push(format!(
                    "{name} {value} out of range [{}, {}]",
                    range.start(),
                    range.end()
                ));
            }
        }

        if !self.oldpeak.is_finite() || !OLDPEAK_RANGE.contains(&self.oldpeak) {
            errors.push(format!(
                "oldpeak {} out of range [{:.1}, {:.1}]",
                self.oldpeak,
                OLDPEAK_RANGE.start(),
                OLDPEAK_RANGE.end()
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_form() {
        let record = PatientRecord::default();
        assert_eq!(record.age, 55);
        assert_eq!(record.trestbps, 130);
        assert_eq!(record.chol, 246);
        assert_eq!(record.thalach, 150);
        assert_eq!(record.fbs, YesNo::No);
        assert_eq!(record.exang, YesNo::No);
        assert!((record.oldpeak - 1.0).abs() < f64::EPSILON);
        assert_eq!(record.sex, Sex::Male);
        assert_eq!(record.thal, Thalassemia::Normal);
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_features_follow_contract_order() {
        let record = PatientRecord::default();
        let features = record.features();
        let names: Vec<&str> = features.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, FEATURE_NAMES);
        assert_eq!(record.feature("sex"), Some(1.0));
        assert_eq!(record.feature("thal"), Some(1.0));
        assert_eq!(record.feature("chol"), Some(246.0));
        assert_eq!(record.feature("bmi"), None);
    }

    #[test]
    fn test_code_label_tables_are_bidirectional() {
        assert_eq!(Sex::from_code(0), Some(Sex::Female));
        assert_eq!(Sex::Female.code(), 0);
        assert_eq!(
            ChestPain::from_label("Non-anginal Pain"),
            Some(ChestPain::NonAnginalPain)
        );
        assert_eq!(Thalassemia::from_code(0), None);
        assert_eq!(Thalassemia::ReversibleDefect.code(), 3);
        assert_eq!(RestingEcg::LvHypertrophy.to_string(), "Left Ventricular Hypertrophy");

        for option in StSlope::OPTIONS {
            assert_eq!(StSlope::from_code(option.code()), Some(*option));
            assert_eq!(StSlope::from_label(option.label()), Some(*option));
        }
    }

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(VesselCount::Three.cycle(true), VesselCount::Zero);
        assert_eq!(VesselCount::Zero.cycle(false), VesselCount::Three);
        assert_eq!(Sex::Male.cycle(true), Sex::Female);
    }

    #[test]
    fn test_validation_reports_every_violation() {
        let record = PatientRecord {
            age: 10,
            chol: 700,
            oldpeak: f64::NAN,
            ..PatientRecord::default()
        };
        let errors = record.validate().expect_err("should be invalid");
        assert_eq!(errors.len(), 3);
        assert!(errors[0].starts_with("age 10"));
        assert!(errors.iter().any(|e| e.starts_with("chol 700")));
        assert!(errors.iter().any(|e| e.starts_with("oldpeak")));
    }

    #[test]
    fn test_validation_accepts_bounds() {
        let record = PatientRecord {
            age: 100,
            trestbps: 80,
            chol: 600,
            thalach: 60,
            oldpeak: 10.0,
            ..PatientRecord::default()
        };
        assert!(record.validate().is_ok());
    }
}
