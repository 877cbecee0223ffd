use std::path::PathBuf;

/// An uploaded image before it has been persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct UploadedImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

/// Domain interface for durably storing uploaded images.
///
/// Returns one stored path per input, in input order: nothing may be
/// dropped or reordered, and name collisions must be resolved without
/// overwriting existing content.
pub trait ImageStore: Send {
    fn save(&self, uploads: &[UploadedImage]) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>>;
}
