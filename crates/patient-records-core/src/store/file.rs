//! JSON file backed store.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{PatientMap, PatientStore, StoreError, StoreResult};

/// Store backed by a single JSON document of the form
/// `{ "<id>": { name, city, age, gender, height, weight }, ... }`.
///
/// Saves overwrite the file in place; a crash mid-write can leave a
/// truncated document behind.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Use the file at `path`, writing an empty `{}` document if it does not
    /// exist yet.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let store = Self::new(path);
        match fs::metadata(&store.path) {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %store.path.display(), "Creating empty patient store");
                store.save(&PatientMap::new())?;
            }
            Err(e) => return Err(store.io_error(e)),
        }
        Ok(store)
    }

    /// Use the file at `path` as-is. Loading fails while it is missing.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl PatientStore for JsonFileStore {
    fn load(&self) -> StoreResult<PatientMap> {
        let contents = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        let patients: PatientMap = serde_json::from_str(&contents)?;
        tracing::debug!(path = %self.path.display(), count = patients.len(), "Loaded patients");
        Ok(patients)
    }

    fn save(&self, patients: &PatientMap) -> StoreResult<()> {
        let json = serde_json::to_string(patients)?;
        fs::write(&self.path, json).map_err(|e| self.io_error(e))?;
        tracing::debug!(path = %self.path.display(), count = patients.len(), "Saved patients");
        Ok(())
    }
}
