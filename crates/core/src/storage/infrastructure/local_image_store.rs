use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::storage::domain::image_store::{ImageStore, UploadedImage};

/// File name used when an upload arrives without one.
const FALLBACK_NAME: &str = "uploaded";

#[derive(Error, Debug)]
pub enum LocalStoreError {
    #[error("failed to create upload directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Stores uploads as plain files under a single directory.
///
/// The directory is created on demand. Original file names are kept to
/// aid debugging; colliding names get a `_1`, `_2`, ... suffix before the
/// extension so existing content is never overwritten.
pub struct LocalImageStore {
    root: PathBuf,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn unique_target(&self, file_name: &str) -> PathBuf {
        let target = self.root.join(file_name);
        if !target.exists() {
            return target;
        }
        let (stem, ext) = split_name(file_name);
        let mut suffix = 1;
        loop {
            let candidate = self.root.join(format!("{stem}_{suffix}{ext}"));
            if !candidate.exists() {
                return candidate;
            }
            suffix += 1;
        }
    }
}

impl ImageStore for LocalImageStore {
    fn save(&self, uploads: &[UploadedImage]) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
        fs::create_dir_all(&self.root).map_err(|e| LocalStoreError::CreateDir {
            path: self.root.clone(),
            source: e,
        })?;

        let mut stored = Vec::with_capacity(uploads.len());
        for upload in uploads {
            let file_name = if upload.file_name.trim().is_empty() {
                FALLBACK_NAME
            } else {
                upload.file_name.as_str()
            };
            let target = self.unique_target(file_name);
            fs::write(&target, &upload.bytes).map_err(|e| LocalStoreError::Write {
                path: target.clone(),
                source: e,
            })?;
            stored.push(target);
        }
        Ok(stored)
    }
}

/// Splits `photo.jpg` into `("photo", ".jpg")`; names without an
/// extension (or starting with a dot) keep the whole name as the stem.
fn split_name(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => file_name.split_at(idx),
        _ => (file_name, ""),
    }
}
