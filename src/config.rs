use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Explicit run configuration. Every component receives this (or a handle
/// derived from it) instead of relying on ambient process state such as the
/// working directory or a global overwrite switch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root temp directory; the per-run scratch dir lives beneath it.
    pub temp_root: PathBuf,
    /// Master parcel feature source (full assessor schema).
    pub parcel_source: PathBuf,
    /// Soil/tree-index feature source (carries Val_Per_Acre2016).
    pub soil_source: PathBuf,
    /// Pre-authored cartographic project file.
    pub project_file: PathBuf,
    /// Directory the finished PDFs are written into.
    pub output_dir: PathBuf,
    /// Failure log appended to by the top-level handlers.
    pub log_file: PathBuf,
    /// Planar buffer distance applied to the selected parcel.
    pub buffer_meters: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            temp_root: PathBuf::from("/tmp/dfreport"),
            parcel_source: PathBuf::from("/gisdata/assessor/parcels.json"),
            soil_source: PathBuf::from("/gisdata/soils/tree_soil_index.json"),
            project_file: PathBuf::from("/gisdata/projects/df_layout.json"),
            output_dir: PathBuf::from("/gisdata/reports/designated_forest"),
            log_file: PathBuf::from("/gisdata/logs/dfreport.log"),
            buffer_meters: 10.0,
        }
    }
}

impl Config {
    /// Load from a JSON file, or fall back to the built-in county paths.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => {
                let raw = std::fs::read_to_string(p)
                    .with_context(|| format!("read config {}", p.display()))?;
                let config: Config = serde_json::from_str(&raw)
                    .with_context(|| format!("parse config {}", p.display()))?;
                Ok(config)
            }
            None => Ok(Config::default()),
        }
    }

    /// The per-run scratch subdirectory beneath the temp root.
    pub fn scratch_dir(&self) -> PathBuf {
        self.temp_root.join("DFtemp")
    }
}
