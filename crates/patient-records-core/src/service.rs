//! Patient record operations.
//!
//! Each operation is a single transaction against the store: load the full
//! record set, check and mutate it in memory, and save it back only when
//! the whole operation succeeded.

use std::cmp::Ordering;
use std::str::FromStr;
use std::sync::Arc;

use indexmap::IndexMap;
use thiserror::Error;

use crate::models::PatientView;
use crate::store::{PatientStore, StoreError};
use crate::validation::{PatientDraft, PatientUpdate, ValidationError, Violation};

/// Service errors.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Patient not found: {0}")]
    NotFound(String),

    #[error("Patient already exists: {0}")]
    Conflict(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Field a listing can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Height,
    Weight,
    Bmi,
}

impl SortField {
    pub const ALL: [SortField; 3] = [SortField::Height, SortField::Weight, SortField::Bmi];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Height => "height",
            SortField::Weight => "weight",
            SortField::Bmi => "bmi",
        }
    }

    fn key(&self, view: &PatientView) -> f64 {
        match self {
            SortField::Height => view.record.height,
            SortField::Weight => view.record.weight,
            SortField::Bmi => view.bmi,
        }
    }
}

impl FromStr for SortField {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| {
                let fields: Vec<_> = Self::ALL.iter().map(|f| format!("'{}'", f.as_str())).collect();
                ServiceError::BadRequest(format!("Invalid field select from [{}]", fields.join(", ")))
            })
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(ServiceError::BadRequest(
                "Invalid order select between asc and desc".into(),
            )),
        }
    }
}

/// Record service over an injected store.
#[derive(Clone)]
pub struct PatientService {
    store: Arc<dyn PatientStore>,
}

impl PatientService {
    pub fn new(store: Arc<dyn PatientStore>) -> Self {
        Self { store }
    }

    /// All records, keyed by id, with derived fields.
    pub fn view(&self) -> ServiceResult<IndexMap<String, PatientView>> {
        let patients = self.store.load()?;
        Ok(patients
            .iter()
            .map(|(id, record)| (id.clone(), record.to_view()))
            .collect())
    }

    /// Look up one record. The id is matched in upper case.
    pub fn get(&self, patient_id: &str) -> ServiceResult<PatientView> {
        let patients = self.store.load()?;
        let key = patient_id.to_uppercase();
        patients
            .get(&key)
            .map(|record| record.to_view())
            .ok_or(ServiceError::NotFound(key))
    }

    /// All records ordered by `field`. Ties keep file order in both directions.
    pub fn sort(&self, field: SortField, order: SortOrder) -> ServiceResult<Vec<PatientView>> {
        let patients = self.store.load()?;
        let mut views: Vec<_> = patients.values().map(|r| r.to_view()).collect();

        views.sort_by(|a, b| {
            let (ka, kb) = (field.key(a), field.key(b));
            let ordering = match order {
                SortOrder::Asc => ka.partial_cmp(&kb),
                SortOrder::Desc => kb.partial_cmp(&ka),
            };
            ordering.unwrap_or(Ordering::Equal)
        });

        Ok(views)
    }

    /// Parse raw query values and sort. `order` defaults to ascending.
    ///
    /// A missing `sort_by` is a validation failure; an unknown value is a
    /// bad request.
    pub fn sort_by_query(&self, sort_by: Option<&str>, order: Option<&str>) -> ServiceResult<Vec<PatientView>> {
        let field: SortField = sort_by
            .ok_or_else(|| ValidationError {
                violations: vec![Violation::new("sort_by", "field required")],
            })?
            .parse()?;
        let order = order.map(str::parse::<SortOrder>).transpose()?.unwrap_or_default();
        self.sort(field, order)
    }

    /// Validate and insert a new record, returning its id.
    pub fn create(&self, draft: &PatientDraft) -> ServiceResult<String> {
        let patient = draft.validate()?;
        let mut patients = self.store.load()?;

        if patients.contains_key(&patient.id) {
            return Err(ServiceError::Conflict(patient.id));
        }

        let (id, record) = patient.into_parts();
        patients.insert(id.clone(), record);
        self.store.save(&patients)?;

        tracing::info!(patient_id = %id, "Patient created");
        Ok(id)
    }

    /// Merge `update` into an existing record and re-validate the result.
    pub fn update(&self, patient_id: &str, update: &PatientUpdate) -> ServiceResult<PatientView> {
        update.validate()?;
        let mut patients = self.store.load()?;

        let existing = patients
            .get(patient_id)
            .ok_or_else(|| ServiceError::NotFound(patient_id.to_string()))?;

        let mut draft = PatientDraft::from_record(patient_id, existing);
        update.apply_to(&mut draft);
        let (_, record) = draft.validate()?.into_parts();

        let view = record.to_view();
        patients.insert(patient_id.to_string(), record);
        self.store.save(&patients)?;

        tracing::info!(patient_id = %patient_id, "Patient updated");
        Ok(view)
    }

    /// Remove a record.
    pub fn delete(&self, patient_id: &str) -> ServiceResult<()> {
        let mut patients = self.store.load()?;

        if patients.shift_remove(patient_id).is_none() {
            return Err(ServiceError::NotFound(patient_id.to_string()));
        }
        self.store.save(&patients)?;

        tracing::info!(patient_id = %patient_id, "Patient deleted");
        Ok(())
    }
}
