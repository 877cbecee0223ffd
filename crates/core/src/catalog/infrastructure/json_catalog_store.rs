use std::fs;
use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::domain::catalog_store::CatalogStore;
use crate::catalog::domain::watch::Watch;

#[derive(Error, Debug)]
pub enum JsonCatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("catalog {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode catalog: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to write catalog {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Catalog store backed by a single JSON file.
///
/// The whole record array is rewritten on each save, via a temp file and
/// rename so a crash mid-write cannot corrupt the existing catalog. Ids
/// continue from the highest one already on disk.
pub struct JsonCatalogStore {
    path: PathBuf,
}

impl JsonCatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// All records currently on disk; a missing file is an empty catalog.
    pub fn all(&self) -> Result<Vec<Watch>, JsonCatalogError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&self.path).map_err(|e| JsonCatalogError::Read {
            path: self.path.clone(),
            source: e,
        })?;
        serde_json::from_str(&data).map_err(|e| JsonCatalogError::Parse {
            path: self.path.clone(),
            source: e,
        })
    }

    fn write_all(&self, records: &[Watch]) -> Result<(), JsonCatalogError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| JsonCatalogError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let json = serde_json::to_string_pretty(records).map_err(JsonCatalogError::Encode)?;
        let temp = self.path.with_extension("json.tmp");
        fs::write(&temp, json).map_err(|e| JsonCatalogError::Write {
            path: temp.clone(),
            source: e,
        })?;
        fs::rename(&temp, &self.path).map_err(|e| JsonCatalogError::Write {
            path: self.path.clone(),
            source: e,
        })
    }
}

impl CatalogStore for JsonCatalogStore {
    fn save(&self, mut watch: Watch) -> Result<Watch, Box<dyn std::error::Error>> {
        let mut records = self.all()?;
        let next_id = records.iter().filter_map(|w| w.id).max().unwrap_or(0) + 1;
        watch.id = Some(next_id);
        records.push(watch.clone());
        self.write_all(&records)?;
        Ok(watch)
    }
}
