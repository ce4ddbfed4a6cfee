use crate::config::Config;
use crate::engine::store::ScratchStore;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirStatus {
    Created,
    AlreadyPresent,
}

/// Idempotent directory creation with an explicit outcome, instead of
/// catching an "already exists" error after the fact.
pub fn ensure_dir(path: &Path) -> std::io::Result<DirStatus> {
    if path.is_dir() {
        return Ok(DirStatus::AlreadyPresent);
    }
    std::fs::create_dir_all(path)?;
    Ok(DirStatus::Created)
}

/// Remove a directory tree, clearing read-only attributes and retrying once
/// when the first attempt is refused. The toolkit leaves read-only lock
/// files behind in the scratch store.
pub fn force_remove_dir_all(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        return Ok(());
    }
    match std::fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(_) => {
            clear_readonly(path)?;
            std::fs::remove_dir_all(path)
        }
    }
}

fn clear_readonly(path: &Path) -> std::io::Result<()> {
    let meta = std::fs::symlink_metadata(path)?;
    let mut perms = meta.permissions();
    if perms.readonly() {
        #[allow(clippy::permissions_set_readonly_false)]
        perms.set_readonly(false);
        std::fs::set_permissions(path, perms)?;
    }
    if meta.is_dir() {
        for entry in std::fs::read_dir(path)? {
            clear_readonly(&entry?.path())?;
        }
    }
    Ok(())
}

/// Exclusive owner of one run's scratch directory and dataset store.
/// Acquired at the start of a run, released at the end; dropping an
/// unreleased workspace still cleans up on a best-effort basis, so a failed
/// pipeline cannot leak scratch state.
#[derive(Debug)]
pub struct ScratchWorkspace {
    scratch_dir: PathBuf,
    store: ScratchStore,
    released: bool,
}

impl ScratchWorkspace {
    pub fn acquire(config: &Config) -> Result<Self> {
        match ensure_dir(&config.temp_root).context("create temp root")? {
            DirStatus::Created => info!("created temp root {}", config.temp_root.display()),
            DirStatus::AlreadyPresent => debug!("temp root already present"),
        }

        let scratch_dir = config.scratch_dir();
        if scratch_dir.exists() {
            info!("stale scratch directory found, cleaning up");
            force_remove_dir_all(&scratch_dir).context("remove stale scratch directory")?;
        }
        std::fs::create_dir_all(&scratch_dir).context("create scratch directory")?;

        let store = ScratchStore::create(&scratch_dir).context("create scratch store")?;
        debug!("scratch store at {}", store.path().display());

        Ok(Self {
            scratch_dir,
            store,
            released: false,
        })
    }

    pub fn store(&self) -> &ScratchStore {
        &self.store
    }

    pub fn release(mut self) -> Result<()> {
        self.released = true;
        self.store.delete().context("delete scratch store")?;
        force_remove_dir_all(&self.scratch_dir).context("remove scratch directory")
    }
}

impl Drop for ScratchWorkspace {
    fn drop(&mut self) {
        if !self.released {
            self.released = true;
            let _ = force_remove_dir_all(&self.scratch_dir);
        }
    }
}
