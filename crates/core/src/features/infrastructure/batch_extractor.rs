use std::path::PathBuf;

use crate::features::domain::feature_extractor::FeatureExtractor;
use crate::shared::feature_vector::FeatureVector;

/// Extracts features for a whole batch concurrently.
///
/// Extraction itself has no ordering dependency, but downstream cluster-id
/// assignment does: results are tagged with their input index and sorted
/// back into the supplied sequence before being returned.
pub fn extract_batch(
    extractor: &dyn FeatureExtractor,
    images: &[(PathBuf, Vec<u8>)],
) -> Vec<(PathBuf, FeatureVector)> {
    if images.is_empty() {
        return Vec::new();
    }

    let workers = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(images.len());

    let (job_tx, job_rx) = crossbeam_channel::unbounded::<(usize, &[u8])>();
    let (result_tx, result_rx) = crossbeam_channel::unbounded::<(usize, FeatureVector)>();

    // Queue every job up front; the receiver is alive, so sends cannot fail.
    for (index, (_, bytes)) in images.iter().enumerate() {
        let _ = job_tx.send((index, bytes.as_slice()));
    }
    drop(job_tx);

    std::thread::scope(|scope| {
        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            scope.spawn(move || {
                for (index, bytes) in job_rx.iter() {
                    let _ = result_tx.send((index, extractor.extract(bytes)));
                }
            });
        }
    });
    drop(result_tx);

    let mut indexed: Vec<(usize, FeatureVector)> = result_rx.iter().collect();
    indexed.sort_by_key(|(index, _)| *index);
    debug_assert_eq!(indexed.len(), images.len(), "one vector per input image");

    images
        .iter()
        .zip(indexed)
        .map(|((path, _), (_, vector))| (path.clone(), vector))
        .collect()
}
