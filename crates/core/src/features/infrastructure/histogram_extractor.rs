/// Color-histogram feature extractor.
///
/// Represents an image by its coarse color distribution: the image is
/// resampled to a fixed 64x64 grid and each channel's intensities are
/// counted into a 256-bin histogram. The three histograms are concatenated
/// and normalized to unit length, so images of different resolutions
/// produce comparable vectors. No ML model required.
use image::imageops::FilterType;

use crate::features::domain::feature_extractor::FeatureExtractor;
use crate::shared::constants::{FEATURE_LEN, HISTOGRAM_BINS, RESAMPLE_HEIGHT, RESAMPLE_WIDTH};
use crate::shared::feature_vector::FeatureVector;

pub struct HistogramExtractor;

impl HistogramExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HistogramExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureExtractor for HistogramExtractor {
    fn extract(&self, bytes: &[u8]) -> FeatureVector {
        let img = match image::load_from_memory(bytes) {
            Ok(img) => img,
            Err(e) => {
                log::warn!("undecodable image ({e}); using zero feature vector");
                return FeatureVector::zero(FEATURE_LEN);
            }
        };

        let resampled = image::imageops::resize(
            &img.to_rgb8(),
            RESAMPLE_WIDTH,
            RESAMPLE_HEIGHT,
            FilterType::Triangle,
        );

        let mut counts = vec![0u32; FEATURE_LEN];
        for pixel in resampled.pixels() {
            let [r, g, b] = pixel.0;
            counts[r as usize] += 1;
            counts[HISTOGRAM_BINS + g as usize] += 1;
            counts[2 * HISTOGRAM_BINS + b as usize] += 1;
        }

        let mut vector = FeatureVector::new(counts.into_iter().map(|c| c as f32).collect());
        vector.normalize();
        vector
    }
}
