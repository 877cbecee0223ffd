/// Best-effort watch metadata. Any or all fields may be unknown.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WatchMetadata {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<u32>,
}

/// Domain interface for guessing watch metadata from a group's
/// representative file name. Infallible: an implementation that cannot
/// tell anything returns the all-unknown value.
pub trait MetadataInferrer: Send {
    fn infer(&self, file_name: &str) -> WatchMetadata;
}
