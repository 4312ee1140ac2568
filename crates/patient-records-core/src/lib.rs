//! Patient Records Core Library
//!
//! Record management for a small patient registry persisted as a single
//! JSON document.
//!
//! # Data flow
//!
//! ```text
//! request payload ──► PatientDraft / PatientUpdate ──► validate (all violations)
//!                                                          │
//!                          PatientStore::load ──► PatientMap (id → PatientRecord)
//!                                                          │
//!                                              mutate in memory, PatientStore::save
//!                                                          │
//!                                   PatientRecord::to_view ──► bmi + verdict recomputed
//! ```
//!
//! # Modules
//!
//! - [`models`]: Domain types (PatientRecord, PatientView, Gender, Verdict)
//! - [`validation`]: Payload drafts and aggregated field validation
//! - [`store`]: Whole-file JSON store and an in-memory fake
//! - [`service`]: The record operations (view, get, sort, create, update, delete)

pub mod models;
pub mod service;
pub mod store;
pub mod validation;

// Re-export commonly used types
pub use models::{compute_bmi, derive_metrics, Gender, Patient, PatientRecord, PatientView, Verdict};
pub use service::{PatientService, ServiceError, ServiceResult, SortField, SortOrder};
pub use store::{JsonFileStore, MemoryStore, PatientMap, PatientStore, StoreError, StoreResult};
pub use validation::{PatientDraft, PatientUpdate, ValidationError, Violation};
