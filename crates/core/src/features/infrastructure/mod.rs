pub mod batch_extractor;
pub mod histogram_extractor;
