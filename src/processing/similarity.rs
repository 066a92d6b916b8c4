//! Cosine similarity calculations

use ndarray::{Array2, ArrayView1};
use rayon::prelude::*;

use crate::core::{CoreError, Embedding, Result};

/// Cosine similarity between two embeddings, in [-1, 1].
///
/// Formula: cos(θ) = (A · B) / (||A|| ||B||). A zero vector on either
/// side gives 0.0.
pub fn cosine_similarity(a: &Embedding, b: &Embedding) -> Result<f32> {
	a.check_dim(b)?;
	Ok(cosine(a.as_slice(), b.as_slice()))
}

/// Scores `a` against each of `many`, in the order of `many`
pub fn cosine_similarity_batch(a: &Embedding, many: &[Embedding]) -> Result<Vec<f32>> {
	many.iter().map(|b| cosine_similarity(a, b)).collect()
}

/// Unchecked cosine over equally sized slices
pub(crate) fn cosine(a: &[f32], b: &[f32]) -> f32 {
	let a_view = ArrayView1::from(a);
	let b_view = ArrayView1::from(b);

	let dot = a_view.dot(&b_view);
	let norm_a = a_view.dot(&a_view).sqrt();
	let norm_b = b_view.dot(&b_view).sqrt();

	if norm_a == 0.0 || norm_b == 0.0 {
		return 0.0;
	}

	(dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Every embedding must share the first one's dimension
pub(crate) fn check_dimensions(embeddings: &[&Embedding]) -> Result<()> {
	let Some(first) = embeddings.first() else {
		return Ok(());
	};
	for emb in &embeddings[1..] {
		if emb.dim() != first.dim() {
			return Err(CoreError::DimensionMismatch {
				expected: first.dim(),
				actual: emb.dim(),
			});
		}
	}
	Ok(())
}

/// Full N×N similarity matrix: symmetric with a unit diagonal.
///
/// All embeddings must share the first one's dimension.
pub fn similarity_matrix(embeddings: &[&Embedding]) -> Result<Array2<f32>> {
	let n = embeddings.len();
	check_dimensions(embeddings)?;

	let rows: Vec<Vec<f32>> = (0..n)
		.into_par_iter()
		.map(|i| {
			(0..n)
				.map(|j| {
					if i == j {
						1.0
					} else {
						cosine(embeddings[i].as_slice(), embeddings[j].as_slice())
					}
				})
				.collect()
		})
		.collect();

	let mut matrix = Array2::<f32>::zeros((n, n));
	for (i, row) in rows.into_iter().enumerate() {
		for (j, v) in row.into_iter().enumerate() {
			matrix[[i, j]] = v;
		}
	}
	Ok(matrix)
}

/// Cosine distance matrix (`1 - similarity`), clamped into [0, 2]
pub fn distance_matrix(similarities: &Array2<f32>) -> Array2<f32> {
	similarities.mapv(|s| (1.0 - s).clamp(0.0, 2.0))
}
