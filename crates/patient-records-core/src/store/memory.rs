//! In-memory store for tests and embedding.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{PatientMap, PatientStore, StoreError, StoreResult};

/// Store holding the record set in memory. Counts saves so callers can
/// assert that a failed operation wrote nothing.
#[derive(Debug, Default)]
pub struct MemoryStore {
    patients: Mutex<PatientMap>,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_patients(patients: PatientMap) -> Self {
        Self {
            patients: Mutex::new(patients),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl PatientStore for MemoryStore {
    fn load(&self) -> StoreResult<PatientMap> {
        let patients = self.patients.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(patients.clone())
    }

    fn save(&self, patients: &PatientMap) -> StoreResult<()> {
        let mut guard = self.patients.lock().map_err(|_| StoreError::Poisoned)?;
        *guard = patients.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, PatientRecord};

    #[test]
    fn test_save_replaces_contents() {
        let store = MemoryStore::new();
        assert!(store.load().unwrap().is_empty());

        let mut patients = PatientMap::new();
        patients.insert(
            "P001".into(),
            PatientRecord {
                name: "Ravi".into(),
                city: "Pune".into(),
                age: 52,
                gender: Gender::Male,
                height: 1.7,
                weight: 72.0,
            },
        );
        store.save(&patients).unwrap();

        assert_eq!(store.load().unwrap(), patients);
        assert_eq!(store.save_count(), 1);
    }
}
