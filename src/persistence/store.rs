use std::path::{Path, PathBuf};

use super::PersistenceError;
use crate::highscores::{BestRecord, BestStore};

/// Personal best stored as a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

impl BestStore for JsonFileStore {
    fn get_best(&self) -> Result<BestRecord, PersistenceError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(BestRecord::default());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&json)?)
    }

    fn set_best(&mut self, record: &BestRecord) -> Result<(), PersistenceError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        let json = serde_json::to_string_pretty(record)?;
        let tmp = self.tmp_path();
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        log::debug!("Personal best written to {}", self.path.display());
        Ok(())
    }
}
