use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::catalog::domain::catalog_store::CatalogStore;
use crate::catalog::domain::metadata_inferrer::MetadataInferrer;
use crate::catalog::domain::watch::Watch;
use crate::clustering::domain::clusterer::{Clusterer, NOISE_ID};
use crate::features::domain::feature_extractor::FeatureExtractor;
use crate::features::infrastructure::batch_extractor::extract_batch;
use crate::storage::domain::image_store::{ImageStore, UploadedImage};

/// Placeholder when metadata inference has no guess.
const UNKNOWN: &str = "Unknown";

/// Ingestion pipeline: store → extract → cluster → infer → persist.
///
/// Turns one batch of uploaded photos into catalog records, one record
/// per group of images that plausibly depict the same watch.
pub struct IngestImagesUseCase {
    store: Box<dyn ImageStore>,
    extractor: Box<dyn FeatureExtractor>,
    clusterer: Box<dyn Clusterer>,
    inferrer: Box<dyn MetadataInferrer>,
    catalog: Box<dyn CatalogStore>,
}

impl IngestImagesUseCase {
    pub fn new(
        store: Box<dyn ImageStore>,
        extractor: Box<dyn FeatureExtractor>,
        clusterer: Box<dyn Clusterer>,
        inferrer: Box<dyn MetadataInferrer>,
        catalog: Box<dyn CatalogStore>,
    ) -> Self {
        Self {
            store,
            extractor,
            clusterer,
            inferrer,
            catalog,
        }
    }

    /// Stores every upload, groups the stored images by visual
    /// similarity and persists one catalog record per group, with the
    /// group's stored paths attached.
    ///
    /// An undecodable image degrades to the zero feature vector and
    /// flows through as a normal group member; it never aborts the
    /// batch. An empty batch is not an error and creates nothing.
    pub fn execute(
        &self,
        uploads: Vec<UploadedImage>,
    ) -> Result<Vec<Watch>, Box<dyn std::error::Error>> {
        if uploads.is_empty() {
            return Ok(Vec::new());
        }

        let stored = self.store.save(&uploads)?;
        // The store keeps input order, so stored[i] holds uploads[i].
        let images: Vec<(PathBuf, Vec<u8>)> = stored
            .iter()
            .cloned()
            .zip(uploads.into_iter().map(|u| u.bytes))
            .collect();

        let features = extract_batch(self.extractor.as_ref(), &images);
        let assignments = self.clusterer.cluster(&features)?;
        let groups = build_groups(&stored, &assignments)?;
        log::info!(
            "clustered {} uploaded images into {} groups",
            stored.len(),
            groups.len()
        );

        let mut created = Vec::with_capacity(groups.len());
        for group in groups {
            let representative = file_name(&group[0]);
            let meta = self.inferrer.infer(&representative);
            let record = Watch {
                id: None,
                brand: meta.brand.unwrap_or_else(|| UNKNOWN.to_string()),
                model: meta.model.unwrap_or_else(|| UNKNOWN.to_string()),
                year: meta.year,
                image_paths: group.iter().map(|p| p.display().to_string()).collect(),
            };
            created.push(self.catalog.save(record)?);
        }
        Ok(created)
    }
}

/// Groups stored paths by cluster id: clusters in ascending id order,
/// then each noise image as its own singleton group, so no input is ever
/// dropped. Members keep their input order within a group.
fn build_groups(
    stored: &[PathBuf],
    assignments: &HashMap<PathBuf, i32>,
) -> Result<Vec<Vec<PathBuf>>, Box<dyn std::error::Error>> {
    let mut clusters: BTreeMap<i32, Vec<PathBuf>> = BTreeMap::new();
    let mut noise: Vec<Vec<PathBuf>> = Vec::new();
    for path in stored {
        let id = assignments
            .get(path)
            .copied()
            .ok_or_else(|| format!("no cluster assignment for {}", path.display()))?;
        if id == NOISE_ID {
            noise.push(vec![path.clone()]);
        } else {
            clusters.entry(id).or_default().push(path.clone());
        }
    }
    let mut groups: Vec<Vec<PathBuf>> = clusters.into_values().collect();
    groups.extend(noise);
    Ok(groups)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
