//! Body-mass metrics derived from height and weight.

use serde::{Deserialize, Serialize};

/// Health verdict derived from a BMI value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Verdict {
    Underweight,
    Normal,
    Obese,
}

impl Verdict {
    /// Classify a BMI value.
    ///
    /// The 18.5..25 and 25..30 bands both map to `Normal`; there is no
    /// separate overweight band.
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            Verdict::Underweight
        } else if bmi < 30.0 {
            Verdict::Normal
        } else {
            Verdict::Obese
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Underweight => "Underweight",
            Verdict::Normal => "Normal",
            Verdict::Obese => "Obese",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compute BMI (kg/m²) rounded to two decimal places.
///
/// Rounding works on the exact binary value with ties going to even, so a
/// quotient stored exactly as 23.125 becomes 23.12. Inputs whose square
/// underflows yield an infinite BMI; validation rejects those records.
pub fn compute_bmi(height_m: f64, weight_kg: f64) -> f64 {
    let bmi = weight_kg / (height_m * height_m);
    round_to_cents(bmi)
}

fn round_to_cents(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Compute both derived fields in one go.
pub fn derive_metrics(height_m: f64, weight_kg: f64) -> (f64, Verdict) {
    let bmi = compute_bmi(height_m, weight_kg);
    (bmi, Verdict::from_bmi(bmi))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_compute_bmi_rounds_to_two_places() {
        assert_eq!(compute_bmi(1.8, 80.0), 24.69);
        assert_eq!(compute_bmi(1.75, 70.0), 22.86);
        assert_eq!(compute_bmi(2.0, 100.0), 25.0);
    }

    #[test]
    fn test_compute_bmi_exact_half_rounds_to_even() {
        // 33.3 / 1.2² is exactly 23.125 in binary
        assert_eq!(compute_bmi(1.2, 33.3), 23.12);
        assert_eq!(round_to_cents(0.125), 0.12);
        assert_eq!(round_to_cents(0.375), 0.38);
        // Not an exact half in binary: 2.675 is stored just below
        assert_eq!(round_to_cents(2.675), 2.67);
    }

    #[test]
    fn test_compute_bmi_underflowing_height_is_infinite() {
        assert!(compute_bmi(1e-200, 70.0).is_infinite());
    }

    #[test]
    fn test_verdict_thresholds() {
        assert_eq!(Verdict::from_bmi(18.49), Verdict::Underweight);
        assert_eq!(Verdict::from_bmi(18.5), Verdict::Normal);
        assert_eq!(Verdict::from_bmi(24.99), Verdict::Normal);
        assert_eq!(Verdict::from_bmi(25.0), Verdict::Normal);
        assert_eq!(Verdict::from_bmi(29.99), Verdict::Normal);
        assert_eq!(Verdict::from_bmi(30.0), Verdict::Obese);
    }

    #[test]
    fn test_verdict_serializes_as_label() {
        let json = serde_json::to_string(&Verdict::Underweight).unwrap();
        assert_eq!(json, "\"Underweight\"");
        assert_eq!(Verdict::Obese.to_string(), "Obese");
    }

    proptest! {
        #[test]
        fn prop_bmi_is_deterministic(height in 0.3f64..2.6, weight in 1.0f64..400.0) {
            let (bmi_a, verdict_a) = derive_metrics(height, weight);
            let (bmi_b, verdict_b) = derive_metrics(height, weight);
            prop_assert_eq!(bmi_a, bmi_b);
            prop_assert_eq!(verdict_a, verdict_b);
        }

        #[test]
        fn prop_bmi_within_rounding_of_exact(height in 0.3f64..2.6, weight in 1.0f64..400.0) {
            let exact = weight / (height * height);
            let bmi = compute_bmi(height, weight);
            prop_assert!((bmi - exact).abs() <= 0.005 + 1e-9);
        }

        #[test]
        fn prop_verdict_follows_rounded_bmi(height in 0.3f64..2.6, weight in 1.0f64..400.0) {
            let (bmi, verdict) = derive_metrics(height, weight);
            let expected = if bmi < 18.5 {
                Verdict::Underweight
            } else if bmi < 30.0 {
                Verdict::Normal
            } else {
                Verdict::Obese
            };
            prop_assert_eq!(verdict, expected);
        }
    }
}
