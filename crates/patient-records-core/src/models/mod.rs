//! Domain models for the patient records system.

mod metrics;
mod patient;

pub use metrics::*;
pub use patient::*;
