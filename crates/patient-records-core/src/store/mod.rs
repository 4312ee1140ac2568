//! Whole-file persistence for patient records.
//!
//! A store hands out the complete record set on every [`PatientStore::load`]
//! and replaces it wholesale on every [`PatientStore::save`]. There is no
//! locking across a load/save pair: two concurrent writers both start from
//! the same snapshot and the last save wins.

mod file;
mod memory;

pub use file::*;
pub use memory::*;

use indexmap::IndexMap;
use thiserror::Error;

use crate::models::PatientRecord;

/// Patient records keyed by id, in file order.
pub type PatientMap = IndexMap<String, PatientRecord>;

/// Store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store lock poisoned")]
    Poisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage capability used by the patient service.
pub trait PatientStore: Send + Sync {
    /// Read the entire record set.
    fn load(&self) -> StoreResult<PatientMap>;

    /// Replace the entire record set.
    fn save(&self, patients: &PatientMap) -> StoreResult<()>;
}
