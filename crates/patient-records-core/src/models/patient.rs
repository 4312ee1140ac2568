//! Patient models.

use serde::{Deserialize, Serialize};

use super::metrics::{derive_metrics, Verdict};

/// Gender values accepted on a full patient record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Others,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Others];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Others => "others",
        }
    }

    /// Parse an exact lowercase gender label.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.as_str() == value)
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Patient attributes as persisted in the store, keyed externally by id.
///
/// Derived fields are not part of the persisted shape. Legacy `bmi` and
/// `verdict` keys in the file are ignored on load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientRecord {
    pub name: String,
    pub city: String,
    /// Age in years
    pub age: u32,
    pub gender: Gender,
    /// Height in metres
    pub height: f64,
    /// Weight in kilograms
    pub weight: f64,
}

impl PatientRecord {
    pub fn bmi(&self) -> f64 {
        derive_metrics(self.height, self.weight).0
    }

    pub fn verdict(&self) -> Verdict {
        derive_metrics(self.height, self.weight).1
    }

    /// Materialize the record with freshly computed derived fields.
    pub fn to_view(&self) -> PatientView {
        let (bmi, verdict) = derive_metrics(self.height, self.weight);
        PatientView {
            record: self.clone(),
            bmi,
            verdict,
        }
    }
}

/// A patient record as returned to clients, including derived fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientView {
    #[serde(flatten)]
    pub record: PatientRecord,
    pub bmi: f64,
    pub verdict: Verdict,
}

impl From<&PatientRecord> for PatientView {
    fn from(record: &PatientRecord) -> Self {
        record.to_view()
    }
}

/// A validated patient together with its store key.
#[derive(Debug, Clone, PartialEq)]
pub struct Patient {
    pub id: String,
    pub record: PatientRecord,
}

impl Patient {
    pub fn into_parts(self) -> (String, PatientRecord) {
        (self.id, self.record)
    }

    pub fn bmi(&self) -> f64 {
        self.record.bmi()
    }

    pub fn verdict(&self) -> Verdict {
        self.record.verdict()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tom() -> PatientRecord {
        PatientRecord {
            name: "Tom".into(),
            city: "NY".into(),
            age: 30,
            gender: Gender::Male,
            height: 1.8,
            weight: 80.0,
        }
    }

    #[test]
    fn test_gender_parse() {
        assert_eq!(Gender::parse("male"), Some(Gender::Male));
        assert_eq!(Gender::parse("others"), Some(Gender::Others));
        assert_eq!(Gender::parse("Male"), None);
        assert_eq!(Gender::parse("unknown"), None);
    }

    #[test]
    fn test_view_includes_derived_fields() {
        let view = tom().to_view();
        assert_eq!(view.bmi, 24.69);
        assert_eq!(view.verdict, Verdict::Normal);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["name"], "Tom");
        assert_eq!(json["gender"], "male");
        assert_eq!(json["bmi"], 24.69);
        assert_eq!(json["verdict"], "Normal");
    }

    #[test]
    fn test_record_ignores_legacy_derived_keys() {
        let json = r#"{
            "name": "Ana", "city": "Lima", "age": 41, "gender": "female",
            "height": 1.6, "weight": 40.0, "bmi": 99.0, "verdict": "Obese"
        }"#;
        let record: PatientRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.verdict(), Verdict::Underweight);

        let written = serde_json::to_value(&record).unwrap();
        assert!(written.get("bmi").is_none());
        assert!(written.get("verdict").is_none());
    }
}
