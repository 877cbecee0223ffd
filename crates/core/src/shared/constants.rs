/// Bins per color channel in the feature histogram.
pub const HISTOGRAM_BINS: usize = 256;

pub const COLOR_CHANNELS: usize = 3;

/// Length of a feature vector: one 256-bin histogram per RGB channel,
/// concatenated (red 0-255, green 256-511, blue 512-767).
pub const FEATURE_LEN: usize = HISTOGRAM_BINS * COLOR_CHANNELS;

/// Fixed resample target before histogramming, so histograms are
/// comparable across source resolutions.
pub const RESAMPLE_WIDTH: u32 = 64;
pub const RESAMPLE_HEIGHT: u32 = 64;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
