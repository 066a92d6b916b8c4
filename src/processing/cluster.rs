//! Agglomerative clustering for article embeddings
//!
//! Average-linkage hierarchical clustering over a precomputed cosine
//! distance matrix, cut at `1 - similarity_threshold`. Undersized groups
//! are dropped; oversized groups are kept and flagged, never split.

use std::collections::BTreeMap;

use ndarray::Array2;

use super::similarity::{check_dimensions, cosine, cosine_similarity, distance_matrix, similarity_matrix};
use crate::core::{Cluster, ClusterParams, Embedded, Embedding, Result};
use crate::ui;

pub struct Clusterer {
	params: ClusterParams,
}

impl Default for Clusterer {
	fn default() -> Self {
		Self::new(ClusterParams::default())
	}
}

impl Clusterer {
	pub fn new(params: ClusterParams) -> Self {
		Self { params }
	}

	/// Group items into clusters of mutually similar embeddings.
	///
	/// Fewer than `min_cluster_size` items (or fewer than two) are
	/// returned as one group with id 0 without clustering. Otherwise
	/// groups smaller than `min_cluster_size` are dropped and the rest are
	/// returned largest first, with ids reassigned in that order.
	pub fn cluster<T: Embedded + Clone>(&self, items: &[T]) -> Result<Vec<Cluster<T>>> {
		let n = items.len();
		let embeddings: Vec<&Embedding> = items.iter().map(Embedded::embedding).collect();
		check_dimensions(&embeddings)?;

		if n < self.params.min_cluster_size || n < 2 {
			if n < self.params.min_cluster_size {
				ui::warn(&format!(
					"Not enough articles to cluster (need {}, got {})",
					self.params.min_cluster_size, n
				));
			}
			return Ok(vec![build_cluster(0, items.to_vec(), &self.params)?]);
		}

		ui::info(&format!("Clustering {} articles", n));

		let similarities = similarity_matrix(&embeddings)?;
		let distances = distance_matrix(&similarities);

		let labels = average_linkage(&distances, self.params.distance_threshold());
		let groups = group_by_label(items, &labels);
		let clusters = self.filter_clusters(groups)?;

		ui::debug(&format!("Created {} clusters", clusters.len()));
		Ok(clusters)
	}

	/// Drops undersized groups, flags oversized ones, sorts largest first
	fn filter_clusters<T: Embedded>(&self, groups: Vec<Vec<T>>) -> Result<Vec<Cluster<T>>> {
		let mut kept: Vec<Vec<T>> = Vec::with_capacity(groups.len());

		for (label, members) in groups.into_iter().enumerate() {
			let size = members.len();

			if size < self.params.min_cluster_size {
				ui::debug(&format!("Skipping cluster {} (too small: {} articles)", label, size));
				continue;
			}

			if size > self.params.max_cluster_size {
				ui::warn(&format!(
					"Large cluster {} ({} articles, max {})",
					label, size, self.params.max_cluster_size
				));
			}

			kept.push(members);
		}

		// Stable: equal sizes keep label order
		kept.sort_by(|a, b| b.len().cmp(&a.len()));

		kept.into_iter()
			.enumerate()
			.map(|(id, members)| build_cluster(id, members, &self.params))
			.collect()
	}
}

fn build_cluster<T: Embedded>(id: usize, members: Vec<T>, params: &ClusterParams) -> Result<Cluster<T>> {
	let size = members.len();
	let coherence = coherence(&members)?;
	let representative = find_representative(&members);

	Ok(Cluster {
		id,
		members,
		size,
		coherence,
		representative,
		oversized: size > params.max_cluster_size,
	})
}

/// Average-linkage agglomerative clustering over a distance matrix.
///
/// Repeatedly merges the closest pair of clusters while their average
/// pairwise distance is below `threshold`. Ties go to the lowest index
/// pair. Returns one label per row; labels are numbered by first
/// appearance.
pub fn average_linkage(distances: &Array2<f32>, threshold: f32) -> Vec<usize> {
	let n = distances.nrows();
	let mut dist = distances.mapv(f64::from);
	let mut sizes = vec![1usize; n];
	let mut active = vec![true; n];
	// Item i is currently owned by cluster `owner[i]`
	let mut owner: Vec<usize> = (0..n).collect();
	let threshold = f64::from(threshold);

	loop {
		let mut best: Option<(usize, usize, f64)> = None;

		for i in (0..n).filter(|&i| active[i]) {
			for j in ((i + 1)..n).filter(|&j| active[j]) {
				let d = dist[[i, j]];
				if best.map_or(true, |(_, _, bd)| d < bd) {
					best = Some((i, j, d));
				}
			}
		}

		let Some((a, b, d)) = best else { break };
		if d >= threshold {
			break;
		}

		// Lance-Williams update for average linkage: merge b into a
		let (size_a, size_b) = (sizes[a] as f64, sizes[b] as f64);
		for k in (0..n).filter(|&k| active[k] && k != a && k != b) {
			let merged = (size_a * dist[[a, k]] + size_b * dist[[b, k]]) / (size_a + size_b);
			dist[[a, k]] = merged;
			dist[[k, a]] = merged;
		}

		sizes[a] += sizes[b];
		active[b] = false;
		for o in owner.iter_mut().filter(|o| **o == b) {
			*o = a;
		}
	}

	let mut relabel: BTreeMap<usize, usize> = BTreeMap::new();
	owner
		.iter()
		.map(|&root| {
			let next = relabel.len();
			*relabel.entry(root).or_insert(next)
		})
		.collect()
}

/// Groups items by label, one group per label in label order
fn group_by_label<T: Clone>(items: &[T], labels: &[usize]) -> Vec<Vec<T>> {
	let count = labels.iter().max().map_or(0, |&m| m + 1);
	let mut groups: Vec<Vec<T>> = vec![Vec::new(); count];

	for (item, &label) in items.iter().zip(labels) {
		groups[label].push(item.clone());
	}

	groups
}

/// Mean similarity over all pairs of distinct members.
///
/// Equals `(sum(S) - N) / (N * (N - 1))` for the N×N similarity matrix S
/// with unit diagonal. Groups of zero or one member score 1.0. Members of
/// different dimensions are a `DimensionMismatch`.
pub fn coherence<T: Embedded>(members: &[T]) -> Result<f32> {
	let n = members.len();
	if n < 2 {
		return Ok(1.0);
	}

	let mut total = 0.0f64;
	for i in 0..n {
		for j in (i + 1)..n {
			total += f64::from(cosine_similarity(members[i].embedding(), members[j].embedding())?);
		}
	}

	let pairs = (n * (n - 1) / 2) as f64;
	Ok((total / pairs) as f32)
}

/// Index of the member closest to the cluster centroid. Members share one
/// dimension by the time this runs.
fn find_representative<T: Embedded>(members: &[T]) -> usize {
	let Some(centroid) = Embedding::mean(members.iter().map(Embedded::embedding)) else {
		return 0;
	};

	members
		.iter()
		.enumerate()
		.map(|(i, m)| (i, cosine(centroid.as_slice(), m.embedding().as_slice())))
		.fold((0, f32::NEG_INFINITY), |best, (i, sim)| if sim > best.1 { (i, sim) } else { best })
		.0
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::core::CoreError;

	fn emb(v: &[f32]) -> Embedding {
		Embedding::new(v.to_vec())
	}

	/// Unit vector in the plane spanned by axes `x` and `y`
	fn planar(dim: usize, x: usize, y: usize, cos: f32) -> Embedding {
		let mut v = vec![0.0; dim];
		v[x] = cos;
		v[y] = (1.0 - cos * cos).sqrt();
		Embedding::new(v)
	}

	#[test]
	fn test_below_min_size_is_single_group() {
		let items = vec![emb(&[1.0, 0.0]), emb(&[0.0, 1.0])];
		let clusters = Clusterer::default().cluster(&items).unwrap();

		assert_eq!(clusters.len(), 1);
		assert_eq!(clusters[0].id, 0);
		assert_eq!(clusters[0].size, 2);
		assert_eq!(clusters[0].members, items);
	}

	#[test]
	fn test_empty_input_is_degenerate_group() {
		let clusters = Clusterer::default().cluster::<Embedding>(&[]).unwrap();
		assert_eq!(clusters.len(), 1);
		assert_eq!(clusters[0].size, 0);
		assert_eq!(clusters[0].coherence, 1.0);
	}

	#[test]
	fn test_single_item_with_min_size_one() {
		let params = ClusterParams { min_cluster_size: 1, ..Default::default() };
		let clusters = Clusterer::new(params).cluster(&[emb(&[1.0, 2.0])]).unwrap();
		assert_eq!(clusters.len(), 1);
		assert_eq!(clusters[0].size, 1);
	}

	#[test]
	fn test_all_similar_is_one_cluster() {
		let items: Vec<Embedding> = (0..6).map(|i| planar(3, 0, 1, 0.95 + i as f32 * 0.005)).collect();
		let clusters = Clusterer::default().cluster(&items).unwrap();

		assert_eq!(clusters.len(), 1);
		assert_eq!(clusters[0].size, 6);
		assert!(!clusters[0].oversized);
	}

	#[test]
	fn test_all_dissimilar_is_empty() {
		// Orthogonal basis vectors: every pairwise similarity is 0
		let items: Vec<Embedding> = (0..5)
			.map(|i| {
				let mut v = vec![0.0; 5];
				v[i] = 1.0;
				Embedding::new(v)
			})
			.collect();

		let clusters = Clusterer::default().cluster(&items).unwrap();
		assert!(clusters.is_empty());
	}

	#[test]
	fn test_two_groups_small_one_dropped() {
		// Group A around axis 0, group B around axis 2
		let items = vec![
			planar(4, 0, 1, 0.95),
			planar(4, 0, 1, 0.97),
			planar(4, 0, 1, 0.99),
			planar(4, 2, 3, 0.95),
			planar(4, 2, 3, 0.99),
		];

		let clusters = Clusterer::default().cluster(&items).unwrap();
		assert_eq!(clusters.len(), 1);
		assert_eq!(clusters[0].size, 3);
		assert_eq!(clusters[0].id, 0);
		assert!(clusters[0].members.iter().all(|m| m.0[0] > 0.9));
	}

	#[test]
	fn test_oversized_kept_and_flagged() {
		let params = ClusterParams {
			max_cluster_size: 3,
			..Default::default()
		};
		let items: Vec<Embedding> = (0..5).map(|_| emb(&[1.0, 0.1])).collect();

		let clusters = Clusterer::new(params).cluster(&items).unwrap();
		assert_eq!(clusters.len(), 1);
		assert_eq!(clusters[0].size, 5);
		assert!(clusters[0].oversized);
	}

	#[test]
	fn test_clusters_sorted_by_size() {
		let params = ClusterParams {
			min_cluster_size: 2,
			..Default::default()
		};
		let items = vec![
			planar(4, 2, 3, 0.98),
			planar(4, 2, 3, 0.99),
			planar(4, 0, 1, 0.97),
			planar(4, 0, 1, 0.98),
			planar(4, 0, 1, 0.99),
		];

		let clusters = Clusterer::new(params).cluster(&items).unwrap();
		assert_eq!(clusters.len(), 2);
		assert_eq!((clusters[0].id, clusters[0].size), (0, 3));
		assert_eq!((clusters[1].id, clusters[1].size), (1, 2));
	}

	#[test]
	fn test_dimension_mismatch() {
		let items = vec![emb(&[1.0, 0.0]), emb(&[1.0, 0.0]), emb(&[1.0, 0.0, 0.0])];
		let result = Clusterer::default().cluster(&items);
		assert!(matches!(result, Err(CoreError::DimensionMismatch { .. })));
	}

	#[test]
	fn test_dimension_mismatch_below_min_size() {
		let items = vec![emb(&[1.0, 0.0]), emb(&[1.0, 0.0, 0.0])];
		let result = Clusterer::default().cluster(&items);
		assert!(matches!(result, Err(CoreError::DimensionMismatch { expected: 2, actual: 3 })));
	}

	#[test]
	fn test_average_linkage_uses_mean_distance() {
		// 0-1 close (0.1); 2 is 0.3 from 0 and 0.7 from 1: average 0.5
		let d = Array2::from_shape_vec((3, 3), vec![0.0, 0.1, 0.3, 0.1, 0.0, 0.7, 0.3, 0.7, 0.0]).unwrap();

		assert_eq!(average_linkage(&d, 0.45), vec![0, 0, 1]);
		assert_eq!(average_linkage(&d, 0.55), vec![0, 0, 0]);
		// Cut is strict: a merge at exactly the threshold does not happen
		assert_eq!(average_linkage(&d, 0.1), vec![0, 1, 2]);
	}

	#[test]
	fn test_average_linkage_labels_by_first_appearance() {
		let d = Array2::from_shape_vec((3, 3), vec![0.0, 0.9, 0.1, 0.9, 0.0, 0.9, 0.1, 0.9, 0.0]).unwrap();
		assert_eq!(average_linkage(&d, 0.5), vec![0, 1, 0]);
	}

	#[test]
	fn test_coherence_single_member() {
		assert_eq!(coherence(&[emb(&[0.2, 0.4])]).unwrap(), 1.0);
	}

	#[test]
	fn test_coherence_identical_members() {
		let members = vec![emb(&[0.3, 0.4]); 4];
		assert!((coherence(&members).unwrap() - 1.0).abs() < 1e-6);
	}

	#[test]
	fn test_coherence_matches_matrix_formula() {
		let members = vec![emb(&[1.0, 0.0]), emb(&[0.6, 0.8]), emb(&[0.0, 1.0])];
		let refs: Vec<&Embedding> = members.iter().collect();
		let s = similarity_matrix(&refs).unwrap();
		let n = members.len() as f32;
		let expected = (s.sum() - n) / (n * (n - 1.0));

		assert!((coherence(&members).unwrap() - expected).abs() < 1e-6);
	}

	#[test]
	fn test_coherence_order_invariant() {
		let a = vec![emb(&[1.0, 0.0]), emb(&[0.6, 0.8]), emb(&[0.0, 1.0])];
		let b = vec![a[2].clone(), a[0].clone(), a[1].clone()];
		assert!((coherence(&a).unwrap() - coherence(&b).unwrap()).abs() < 1e-6);
	}

	#[test]
	fn test_coherence_dimension_mismatch() {
		let members = vec![emb(&[1.0, 0.0]), emb(&[0.6, 0.8]), emb(&[0.0, 1.0, 0.0])];
		assert!(matches!(
			coherence(&members),
			Err(CoreError::DimensionMismatch { expected: 2, actual: 3 })
		));
	}

	#[test]
	fn test_representative_is_central() {
		let members = vec![emb(&[1.0, 0.0]), emb(&[0.7071, 0.7071]), emb(&[0.0, 1.0])];
		assert_eq!(find_representative(&members), 1);
	}
}
