//! Request payload validation.
//!
//! Payloads are deserialized into loosely typed drafts first, then checked
//! field by field. Every broken rule is collected into a single
//! [`ValidationError`] instead of stopping at the first one.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::models::{compute_bmi, Gender, Patient, PatientRecord};

/// Exclusive upper bound for a patient's age.
pub const MAX_AGE: i64 = 120;

/// A single broken field constraint.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Aggregated validation failure; never empty.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("validation failed: {}", join_violations(.violations))]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Whether any violation concerns `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Default)]
struct Violations(Vec<Violation>);

impl Violations {
    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(Violation::new(field, message));
    }

    fn finish<T>(self, build: impl FnOnce() -> T) -> Result<T, ValidationError> {
        if self.0.is_empty() {
            Ok(build())
        } else {
            Err(ValidationError { violations: self.0 })
        }
    }

    fn required<'a, T>(&mut self, field: &str, value: &'a Option<T>) -> Option<&'a T> {
        if value.is_none() {
            self.push(field, "field required");
        }
        value.as_ref()
    }

    fn text(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(field, "must not be empty");
        }
    }

    fn age(&mut self, value: i64, upper: Option<i64>) {
        if value <= 0 {
            self.push("age", "must be greater than 0");
        } else if let Some(upper) = upper {
            if value >= upper {
                self.push("age", format!("must be less than {}", upper));
            }
        }
    }

    fn positive(&mut self, field: &str, value: f64) {
        // Written so that NaN fails too.
        if !(value > 0.0) || !value.is_finite() {
            self.push(field, "must be greater than 0");
        }
    }

    fn gender(&mut self, value: &str, allowed: &[Gender]) -> Option<Gender> {
        match Gender::parse(value).filter(|g| allowed.contains(g)) {
            Some(gender) => Some(gender),
            None => {
                let labels: Vec<_> = allowed.iter().map(Gender::as_str).collect();
                self.push("gender", format!("must be one of: {}", labels.join(", ")));
                None
            }
        }
    }
}

/// Unvalidated full patient payload, as received on create.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PatientDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub weight: Option<f64>,
}

impl PatientDraft {
    /// Rebuild a draft from a stored record, used as the merge base on update.
    pub fn from_record(id: impl Into<String>, record: &PatientRecord) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(record.name.clone()),
            city: Some(record.city.clone()),
            age: Some(i64::from(record.age)),
            gender: Some(record.gender.as_str().to_string()),
            height: Some(record.height),
            weight: Some(record.weight),
        }
    }

    /// Check every field constraint and build a [`Patient`].
    pub fn validate(&self) -> Result<Patient, ValidationError> {
        let mut errors = Violations::default();

        if let Some(id) = errors.required("id", &self.id) {
            errors.text("id", id);
        }
        if let Some(name) = errors.required("name", &self.name) {
            errors.text("name", name);
        }
        if let Some(city) = errors.required("city", &self.city) {
            errors.text("city", city);
        }
        let age = errors.required("age", &self.age).copied();
        if let Some(age) = age {
            errors.age(age, Some(MAX_AGE));
        }
        let gender = errors
            .required("gender", &self.gender)
            .and_then(|g| errors.gender(g, &Gender::ALL));
        if let Some(height) = errors.required("height", &self.height) {
            errors.positive("height", *height);
        }
        if let Some(weight) = errors.required("weight", &self.weight) {
            errors.positive("weight", *weight);
        }
        if let (Some(height), Some(weight)) = (self.height, self.weight) {
            if height > 0.0 && weight > 0.0 && !compute_bmi(height, weight).is_finite() {
                errors.push("height", "too small to derive a bmi");
            }
        }

        errors.finish(|| Patient {
            id: self.id.clone().unwrap_or_default(),
            record: PatientRecord {
                name: self.name.clone().unwrap_or_default(),
                city: self.city.clone().unwrap_or_default(),
                age: age.and_then(|a| u32::try_from(a).ok()).unwrap_or_default(),
                gender: gender.unwrap_or(Gender::Others),
                height: self.height.unwrap_or_default(),
                weight: self.weight.unwrap_or_default(),
            },
        })
    }
}

/// Deserialize a field that was present in the payload, keeping an explicit
/// `null` distinct from an absent key.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Partial update payload.
///
/// Each field is `None` when absent, `Some(None)` when sent as `null`, and
/// `Some(Some(v))` when sent with a value.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PatientUpdate {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub city: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub age: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present")]
    pub gender: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub height: Option<Option<f64>>,
    #[serde(default, deserialize_with = "present")]
    pub weight: Option<Option<f64>>,
}

impl PatientUpdate {
    /// Genders an update may set. `others` is only accepted on create.
    pub const GENDERS: [Gender; 2] = [Gender::Male, Gender::Female];

    /// Check the constraints of the values that were supplied.
    ///
    /// Nulls pass here; the merged record is validated in full afterwards.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Violations::default();

        if let Some(Some(age)) = self.age {
            errors.age(age, None);
        }
        if let Some(Some(gender)) = &self.gender {
            errors.gender(gender, &Self::GENDERS);
        }
        if let Some(Some(height)) = self.height {
            errors.positive("height", height);
        }
        if let Some(Some(weight)) = self.weight {
            errors.positive("weight", weight);
        }

        errors.finish(|| ())
    }

    /// Overwrite exactly the fields present in this payload.
    pub fn apply_to(&self, draft: &mut PatientDraft) {
        if let Some(name) = &self.name {
            draft.name = name.clone();
        }
        if let Some(city) = &self.city {
            draft.city = city.clone();
        }
        if let Some(age) = self.age {
            draft.age = age;
        }
        if let Some(gender) = &self.gender {
            draft.gender = gender.clone();
        }
        if let Some(height) = self.height {
            draft.height = height;
        }
        if let Some(weight) = self.weight {
            draft.weight = weight;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_draft() -> PatientDraft {
        PatientDraft {
            id: Some("P010".into()),
            name: Some("Tom".into()),
            city: Some("NY".into()),
            age: Some(30),
            gender: Some("male".into()),
            height: Some(1.8),
            weight: Some(80.0),
        }
    }

    #[test]
    fn test_valid_draft_builds_patient() {
        let patient = valid_draft().validate().unwrap();
        assert_eq!(patient.id, "P010");
        assert_eq!(patient.record.gender, Gender::Male);
        assert_eq!(patient.bmi(), 24.69);
    }

    #[test]
    fn test_reports_every_violation() {
        let draft = PatientDraft {
            id: Some("P1".into()),
            name: Some("".into()),
            city: None,
            age: Some(120),
            gender: Some("robot".into()),
            height: Some(0.0),
            weight: Some(-3.0),
        };

        let err = draft.validate().unwrap_err();
        let fields: Vec<_> = err.violations().iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "city", "age", "gender", "height", "weight"]);
    }

    #[test]
    fn test_age_bounds() {
        for (age, ok) in [(0, false), (1, true), (119, true), (120, false), (-5, false)] {
            let draft = PatientDraft {
                age: Some(age),
                ..valid_draft()
            };
            assert_eq!(draft.validate().is_ok(), ok, "age {}", age);
        }
    }

    #[test]
    fn test_missing_fields_are_required() {
        let err = PatientDraft::default().validate().unwrap_err();
        assert_eq!(err.violations().len(), 7);
        assert!(err
            .violations()
            .iter()
            .all(|v| v.message == "field required"));
    }

    #[test]
    fn test_deserialize_draft_ignores_derived_fields() {
        let json = r#"{"id":"P2","name":"Ana","city":"Lima","age":41,"gender":"others",
                       "height":1.6,"weight":50,"bmi":1.0,"verdict":"Obese"}"#;
        let draft: PatientDraft = serde_json::from_str(json).unwrap();
        let patient = draft.validate().unwrap();
        assert_eq!(patient.record.gender, Gender::Others);
        assert_eq!(patient.bmi(), 19.53);
    }

    #[test]
    fn test_update_distinguishes_null_from_absent() {
        let update: PatientUpdate = serde_json::from_str(r#"{"city": null, "weight": 90}"#).unwrap();
        assert_eq!(update.name, None);
        assert_eq!(update.city, Some(None));
        assert_eq!(update.weight, Some(Some(90.0)));

        let empty: PatientUpdate = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, PatientUpdate::default());
    }

    #[test]
    fn test_rejects_height_with_no_finite_bmi() {
        let draft = PatientDraft {
            height: Some(1e-200),
            ..valid_draft()
        };
        let err = draft.validate().unwrap_err();
        assert_eq!(
            err.violations(),
            &[Violation::new("height", "too small to derive a bmi")]
        );
    }

    #[test]
    fn test_update_rejects_others_gender() {
        let update = PatientUpdate {
            gender: Some(Some("others".into())),
            ..Default::default()
        };
        let err = update.validate().unwrap_err();
        assert!(err.has_field("gender"));
        assert_eq!(err.violations()[0].message, "must be one of: male, female");
    }

    #[test]
    fn test_update_age_has_no_upper_bound() {
        let update = PatientUpdate {
            age: Some(Some(150)),
            ..Default::default()
        };
        assert!(update.validate().is_ok());

        let update = PatientUpdate {
            age: Some(Some(0)),
            ..Default::default()
        };
        assert!(update.validate().unwrap_err().has_field("age"));
    }

    #[test]
    fn test_apply_merges_present_fields_only() {
        let mut draft = valid_draft();
        let update = PatientUpdate {
            city: Some(Some("Boston".into())),
            height: Some(Some(1.9)),
            ..Default::default()
        };
        update.apply_to(&mut draft);

        assert_eq!(draft.city.as_deref(), Some("Boston"));
        assert_eq!(draft.height, Some(1.9));
        assert_eq!(draft.name.as_deref(), Some("Tom"));
        assert_eq!(draft.weight, Some(80.0));
    }

    #[test]
    fn test_applied_null_fails_full_validation() {
        let mut draft = valid_draft();
        let update = PatientUpdate {
            name: Some(None),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
        update.apply_to(&mut draft);

        let err = draft.validate().unwrap_err();
        assert_eq!(err.violations(), &[Violation::new("name", "field required")]);
    }

    #[test]
    fn test_error_display_lists_violations() {
        let err = ValidationError {
            violations: vec![
                Violation::new("age", "must be greater than 0"),
                Violation::new("city", "field required"),
            ],
        };
        assert_eq!(
            err.to_string(),
            "validation failed: age: must be greater than 0; city: field required"
        );
    }
}
