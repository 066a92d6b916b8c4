//! Cluster data structures for agglomerative clustering

use serde::{Deserialize, Serialize};

use super::embedding::Embedding;
use crate::config::{DEFAULT_MAX_CLUSTER_SIZE, DEFAULT_MIN_CLUSTER_SIZE, DEFAULT_SIMILARITY_THRESHOLD};

/// Anything carrying a precomputed embedding
pub trait Embedded {
	fn embedding(&self) -> &Embedding;
}

impl Embedded for Embedding {
	fn embedding(&self) -> &Embedding {
		self
	}
}

impl<T: Embedded> Embedded for &T {
	fn embedding(&self) -> &Embedding {
		(*self).embedding()
	}
}

/// A group of semantically similar items
#[derive(Debug, Clone, Serialize)]
pub struct Cluster<T> {
	/// Cluster ID (assigned after sorting by size)
	pub id: usize,
	pub members: Vec<T>,
	pub size: usize,
	/// Mean pairwise similarity between distinct members
	pub coherence: f32,
	/// Index into `members` of the item closest to the centroid
	pub representative: usize,
	/// Larger than `max_cluster_size`; kept, never split
	pub oversized: bool,
}

impl<T> Cluster<T> {
	pub fn representative(&self) -> Option<&T> {
		self.members.get(self.representative)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterParams {
	/// Minimum similarity for two items to end up in the same cluster
	pub similarity_threshold: f32,
	pub min_cluster_size: usize,
	pub max_cluster_size: usize,
}

impl Default for ClusterParams {
	fn default() -> Self {
		Self {
			similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
			min_cluster_size: DEFAULT_MIN_CLUSTER_SIZE,
			max_cluster_size: DEFAULT_MAX_CLUSTER_SIZE,
		}
	}
}

impl ClusterParams {
	/// Dendrogram cut height in cosine distance
	pub fn distance_threshold(&self) -> f32 {
		1.0 - self.similarity_threshold
	}
}

/// Aggregate numbers for a clustering run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSummary {
	pub total_items: usize,
	pub clusters: usize,
	pub clustered: usize,
	pub average_coherence: f32,
}

impl ClusterSummary {
	pub fn from_clusters<T>(total_items: usize, clusters: &[Cluster<T>]) -> Self {
		let clustered = clusters.iter().map(|c| c.size).sum();
		let average_coherence = if clusters.is_empty() {
			0.0
		} else {
			clusters.iter().map(|c| c.coherence).sum::<f32>() / clusters.len() as f32
		};

		Self {
			total_items,
			clusters: clusters.len(),
			clustered,
			average_coherence,
		}
	}

	pub fn unclustered(&self) -> usize {
		self.total_items.saturating_sub(self.clustered)
	}

	pub fn unclustered_percent(&self) -> f32 {
		if self.total_items == 0 {
			0.0
		} else {
			(self.unclustered() as f32 / self.total_items as f32) * 100.0
		}
	}
}
