use std::collections::HashMap;
use std::path::PathBuf;

use crate::shared::feature_vector::FeatureVector;

/// Reserved cluster id for points with too few neighbors to seed or join
/// a cluster.
pub const NOISE_ID: i32 = -1;

/// Domain interface for partitioning stored images by feature similarity.
///
/// Every supplied handle appears exactly once in the returned mapping.
/// Cluster ids count up from 0 in discovery order; noise points get
/// [`NOISE_ID`]. Input order is significant: it determines which numeric
/// id each group receives.
pub trait Clusterer: Send {
    fn cluster(
        &self,
        items: &[(PathBuf, FeatureVector)],
    ) -> Result<HashMap<PathBuf, i32>, Box<dyn std::error::Error>>;
}
