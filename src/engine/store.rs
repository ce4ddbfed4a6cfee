use super::EngineError;
use crate::domain::FeatureClass;
use std::path::{Path, PathBuf};

pub const STORE_DIR: &str = "temp.store";

/// The transient dataset container for one run. Every pipeline intermediate
/// lives here as a named dataset; the whole store is deleted and recreated
/// per run so nothing can leak between parcels.
#[derive(Debug)]
pub struct ScratchStore {
    root: PathBuf,
}

impl ScratchStore {
    /// Create a fresh empty store beneath `scratch_dir`, replacing whatever
    /// a prior (possibly crashed) run left behind.
    pub fn create(scratch_dir: &Path) -> Result<Self, EngineError> {
        let root = scratch_dir.join(STORE_DIR);
        if root.exists() {
            std::fs::remove_dir_all(&root)?;
        }
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    fn dataset_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.json"))
    }

    pub fn read(&self, name: &str) -> Result<FeatureClass, EngineError> {
        let path = self.dataset_path(name);
        if !path.exists() {
            return Err(EngineError::DatasetMissing(name.to_string()));
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Writes always overwrite; the same dataset names recur every run.
    pub fn write(&self, dataset: &FeatureClass) -> Result<(), EngineError> {
        let raw = serde_json::to_string(dataset)?;
        std::fs::write(self.dataset_path(&dataset.name), raw)?;
        Ok(())
    }

    pub fn delete(&self) -> std::io::Result<()> {
        if self.root.exists() {
            std::fs::remove_dir_all(&self.root)
        } else {
            Ok(())
        }
    }
}
