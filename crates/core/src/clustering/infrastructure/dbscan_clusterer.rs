/// Density-based image clusterer.
///
/// Groups feature vectors whose Euclidean distance is within an epsilon
/// radius, expanding clusters through density-connected neighbors. With
/// `min_pts = 1` every point is a core point and noise cannot occur;
/// raising `min_pts` demands more evidence before grouping and routes
/// isolated points to the noise id instead.
///
/// The scan is deliberately sequential: cluster ids are assigned in the
/// order seeds are encountered, so input order is part of the observable
/// contract. Region queries are linear, making a batch O(n^2) vector
/// comparisons, which is fine at upload-batch sizes.
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;

use thiserror::Error;

use crate::clustering::domain::clusterer::{Clusterer, NOISE_ID};
use crate::shared::feature_vector::FeatureVector;

pub const DEFAULT_EPS: f32 = 0.5;
pub const DEFAULT_MIN_PTS: usize = 1;

#[derive(Error, Debug)]
pub enum DbscanError {
    #[error("feature vector {index} has length {actual}, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },
}

pub struct DbscanClusterer {
    eps: f32,
    min_pts: usize,
}

impl DbscanClusterer {
    pub fn new(eps: f32, min_pts: usize) -> Self {
        Self { eps, min_pts }
    }

    /// Indices of all items within `eps` of `index`, itself included.
    fn region_query(&self, index: usize, items: &[(PathBuf, FeatureVector)]) -> Vec<usize> {
        let base = items[index].1.values();
        items
            .iter()
            .enumerate()
            .filter(|(_, (_, vector))| euclidean_distance(base, vector.values()) <= self.eps)
            .map(|(j, _)| j)
            .collect()
    }

    /// Grows a cluster from a seed's neighbor set via a FIFO worklist.
    ///
    /// Duplicate or already-visited entries are harmless: assignment only
    /// happens for handles without an id, so earlier labels (including
    /// noise) are never overwritten.
    fn expand_cluster(
        &self,
        seed: usize,
        neighbors: Vec<usize>,
        cluster_id: i32,
        assignments: &mut HashMap<PathBuf, i32>,
        visited: &mut [bool],
        items: &[(PathBuf, FeatureVector)],
    ) {
        assignments.insert(items[seed].0.clone(), cluster_id);
        let mut worklist: VecDeque<usize> = neighbors.into();
        while let Some(current) = worklist.pop_front() {
            if !visited[current] {
                visited[current] = true;
                let current_neighbors = self.region_query(current, items);
                if current_neighbors.len() >= self.min_pts {
                    worklist.extend(current_neighbors);
                }
            }
            let handle = &items[current].0;
            if !assignments.contains_key(handle) {
                assignments.insert(handle.clone(), cluster_id);
            }
        }
    }

    fn check_dimensions(items: &[(PathBuf, FeatureVector)]) -> Result<(), DbscanError> {
        let expected = items[0].1.len();
        for (index, (_, vector)) in items.iter().enumerate() {
            if vector.len() != expected {
                return Err(DbscanError::DimensionMismatch {
                    index,
                    expected,
                    actual: vector.len(),
                });
            }
        }
        Ok(())
    }
}

impl Default for DbscanClusterer {
    fn default() -> Self {
        Self::new(DEFAULT_EPS, DEFAULT_MIN_PTS)
    }
}

impl Clusterer for DbscanClusterer {
    fn cluster(
        &self,
        items: &[(PathBuf, FeatureVector)],
    ) -> Result<HashMap<PathBuf, i32>, Box<dyn std::error::Error>> {
        let mut assignments = HashMap::with_capacity(items.len());
        if items.is_empty() {
            return Ok(assignments);
        }
        Self::check_dimensions(items)?;

        let mut visited = vec![false; items.len()];
        let mut next_cluster_id = 0;
        for index in 0..items.len() {
            if visited[index] {
                continue;
            }
            visited[index] = true;
            let neighbors = self.region_query(index, items);
            if neighbors.len() < self.min_pts {
                assignments.insert(items[index].0.clone(), NOISE_ID);
            } else {
                self.expand_cluster(
                    index,
                    neighbors,
                    next_cluster_id,
                    &mut assignments,
                    &mut visited,
                    items,
                );
                next_cluster_id += 1;
            }
        }
        Ok(assignments)
    }
}

fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    let mut sum = 0.0;
    for (x, y) in a.iter().zip(b) {
        let diff = x - y;
        sum += diff * diff;
    }
    sum.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::BTreeSet;

    fn item(name: &str, values: Vec<f32>) -> (PathBuf, FeatureVector) {
        (PathBuf::from(name), FeatureVector::new(values))
    }

    /// One-hot 768-length vector, unit norm by construction.
    fn basis(bin: usize) -> Vec<f32> {
        let mut values = vec![0.0; 768];
        values[bin] = 1.0;
        values
    }

    /// The partition as a set of groups, ignoring numeric labels.
    fn partition(assignments: &HashMap<PathBuf, i32>) -> BTreeSet<BTreeSet<PathBuf>> {
        let mut groups: HashMap<i32, BTreeSet<PathBuf>> = HashMap::new();
        for (path, &id) in assignments {
            groups.entry(id).or_default().insert(path.clone());
        }
        groups.into_values().collect()
    }

    #[test]
    fn test_empty_input_yields_empty_mapping() {
        let assignments = DbscanClusterer::default().cluster(&[]).unwrap();
        assert!(assignments.is_empty());
    }

    #[test]
    fn test_identical_images_form_one_cluster() {
        let items = vec![
            item("a.jpg", basis(10)),
            item("b.jpg", basis(10)),
            item("c.jpg", basis(10)),
        ];
        let assignments = DbscanClusterer::default().cluster(&items).unwrap();
        assert_eq!(assignments.len(), 3);
        for (_, id) in &assignments {
            assert_eq!(*id, 0);
        }
    }

    #[test]
    fn test_distant_images_form_separate_singletons() {
        // Orthogonal unit vectors sit sqrt(2) apart, far beyond eps; each
        // is still its own neighbor, so neither is noise.
        let items = vec![item("a.jpg", basis(0)), item("b.jpg", basis(700))];
        let assignments = DbscanClusterer::default().cluster(&items).unwrap();
        assert_eq!(assignments[&PathBuf::from("a.jpg")], 0);
        assert_eq!(assignments[&PathBuf::from("b.jpg")], 1);
    }

    #[test]
    fn test_lone_zero_vector_is_a_cluster_not_noise() {
        // The degenerate all-zero vector of an undecodable image is its
        // own neighbor at distance 0 and satisfies min_pts = 1.
        let items = vec![item("broken.jpg", vec![0.0; 768])];
        let assignments = DbscanClusterer::default().cluster(&items).unwrap();
        assert_eq!(assignments[&PathBuf::from("broken.jpg")], 0);
    }

    #[test]
    fn test_isolated_point_is_noise_when_min_pts_is_two() {
        let items = vec![
            item("lone.jpg", basis(0)),
            item("pair_a.jpg", basis(400)),
            item("pair_b.jpg", basis(400)),
        ];
        let assignments = DbscanClusterer::new(DEFAULT_EPS, 2).cluster(&items).unwrap();
        assert_eq!(assignments[&PathBuf::from("lone.jpg")], NOISE_ID);
        assert_eq!(assignments[&PathBuf::from("pair_a.jpg")], 0);
        assert_eq!(assignments[&PathBuf::from("pair_b.jpg")], 0);
    }

    #[rstest]
    #[case(0.5, 0)] // exactly eps: still a neighbor
    #[case(0.51, 1)] // just past eps: separate cluster
    fn test_eps_boundary_is_inclusive(#[case] distance: f32, #[case] expected_id: i32) {
        let mut shifted = vec![0.0; 768];
        shifted[0] = distance;
        let items = vec![item("origin.jpg", vec![0.0; 768]), item("shifted.jpg", shifted)];
        let assignments = DbscanClusterer::default().cluster(&items).unwrap();
        assert_eq!(assignments[&PathBuf::from("shifted.jpg")], expected_id);
    }

    #[test]
    fn test_chain_of_neighbors_expands_into_one_cluster() {
        // 0.0 - 0.4 - 0.8: the ends are not neighbors of each other but
        // both neighbor the middle, so expansion links all three.
        let mut a = vec![0.0; 768];
        let mut b = vec![0.0; 768];
        let mut c = vec![0.0; 768];
        a[5] = 0.0;
        b[5] = 0.4;
        c[5] = 0.8;
        let items = vec![item("a.jpg", a), item("b.jpg", b), item("c.jpg", c)];
        let assignments = DbscanClusterer::default().cluster(&items).unwrap();
        assert_eq!(assignments[&PathBuf::from("a.jpg")], 0);
        assert_eq!(assignments[&PathBuf::from("b.jpg")], 0);
        assert_eq!(assignments[&PathBuf::from("c.jpg")], 0);
    }

    #[test]
    fn test_every_input_is_assigned_exactly_once() {
        let items: Vec<_> = (0..20)
            .map(|i| item(&format!("img_{i}.jpg"), basis((i * 37) % 768)))
            .collect();
        let assignments = DbscanClusterer::default().cluster(&items).unwrap();
        assert_eq!(assignments.len(), items.len());
        for (path, _) in &items {
            assert!(assignments.contains_key(path));
        }
    }

    #[test]
    fn test_clustering_is_deterministic() {
        let items = vec![
            item("a.jpg", basis(1)),
            item("b.jpg", basis(1)),
            item("c.jpg", basis(500)),
        ];
        let clusterer = DbscanClusterer::default();
        assert_eq!(
            clusterer.cluster(&items).unwrap(),
            clusterer.cluster(&items).unwrap()
        );
    }

    #[test]
    fn test_reversing_input_relabels_but_preserves_partition() {
        let items = vec![
            item("a.jpg", basis(1)),
            item("b.jpg", basis(1)),
            item("c.jpg", basis(300)),
            item("d.jpg", basis(300)),
        ];
        let mut reversed = items.clone();
        reversed.reverse();

        let clusterer = DbscanClusterer::default();
        let forward = clusterer.cluster(&items).unwrap();
        let backward = clusterer.cluster(&reversed).unwrap();

        // Labels swap with scan order...
        assert_eq!(forward[&PathBuf::from("a.jpg")], 0);
        assert_eq!(backward[&PathBuf::from("d.jpg")], 0);
        // ...but the groups themselves do not.
        assert_eq!(partition(&forward), partition(&backward));
    }

    #[test]
    fn test_cluster_ids_follow_scan_order() {
        let items = vec![
            item("late_group.jpg", basis(600)),
            item("early_group.jpg", basis(10)),
            item("late_group_2.jpg", basis(600)),
        ];
        let assignments = DbscanClusterer::default().cluster(&items).unwrap();
        assert_eq!(assignments[&PathBuf::from("late_group.jpg")], 0);
        assert_eq!(assignments[&PathBuf::from("late_group_2.jpg")], 0);
        assert_eq!(assignments[&PathBuf::from("early_group.jpg")], 1);
    }

    #[test]
    fn test_mismatched_vector_lengths_are_rejected() {
        let items = vec![item("a.jpg", vec![0.0; 768]), item("b.jpg", vec![0.0; 4])];
        let err = DbscanClusterer::default().cluster(&items).unwrap_err();
        let err = err.downcast::<DbscanError>().unwrap();
        match *err {
            DbscanError::DimensionMismatch {
                index,
                expected,
                actual,
            } => {
                assert_eq!(index, 1);
                assert_eq!(expected, 768);
                assert_eq!(actual, 4);
            }
        }
    }

    #[test]
    fn test_euclidean_distance() {
        assert_eq!(euclidean_distance(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
        assert_eq!(euclidean_distance(&[1.0, 1.0], &[1.0, 1.0]), 0.0);
    }
}
