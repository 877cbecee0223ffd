use serde::{Deserialize, Serialize};

/// A single watch in the catalog: one record per group of photos that
/// plausibly depict the same physical watch.
///
/// `id` is `None` until the record has been persisted; the catalog store
/// assigns it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Watch {
    pub id: Option<u64>,
    pub brand: String,
    pub model: String,
    pub year: Option<u32>,
    pub image_paths: Vec<String>,
}
