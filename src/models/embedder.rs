//! Embedder abstraction shared by matching and clustering
//!
//! The model handle is constructed once and passed around as
//! `Arc<dyn Embedder>`. Everything downstream of it works on
//! precomputed `Embedding`s.

use rayon::prelude::*;

use crate::config::INFERENCE_BATCH_SIZE;
use crate::core::{CoreError, Embedding, Result};

/// Stand-in for blank entries inside a batch
const BLANK_PLACEHOLDER: &str = " ";

pub trait Embedder: Send + Sync {
	/// Length of every vector this embedder produces
	fn dimension(&self) -> usize;

	/// Model name/identifier
	fn name(&self) -> &str;

	/// Encode texts in one model call, one vector per input in order.
	///
	/// Callers never pass an empty slice.
	fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>>;

	/// Embed a single text. Blank text yields the zero vector without
	/// touching the model.
	fn embed(&self, text: &str) -> Result<Embedding> {
		if text.trim().is_empty() {
			return Ok(Embedding::zeros(self.dimension()));
		}

		let mut out = self.encode_batch(&[text])?;
		let embedding = out
			.pop()
			.ok_or_else(|| CoreError::inference("model returned no embedding"))?;
		check_dimension(&embedding, self.dimension())?;
		Ok(embedding)
	}

	/// Embed many texts, preserving order and length.
	///
	/// Blank entries are replaced by a single space so every input still
	/// gets a vector. Chunks run in parallel; any failure fails the call.
	fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
		if texts.is_empty() {
			return Ok(Vec::new());
		}

		let prepared: Vec<&str> = texts
			.iter()
			.map(|t| if t.trim().is_empty() { BLANK_PLACEHOLDER } else { *t })
			.collect();

		let chunks: Vec<Vec<Embedding>> = prepared
			.par_chunks(INFERENCE_BATCH_SIZE)
			.map(|chunk| {
				let out = self.encode_batch(chunk)?;
				if out.len() != chunk.len() {
					return Err(CoreError::inference(format!(
						"model returned {} embeddings for {} texts",
						out.len(),
						chunk.len()
					)));
				}
				Ok(out)
			})
			.collect::<Result<_>>()?;

		let embeddings: Vec<Embedding> = chunks.into_iter().flatten().collect();
		for embedding in &embeddings {
			check_dimension(embedding, self.dimension())?;
		}
		Ok(embeddings)
	}
}

fn check_dimension(embedding: &Embedding, expected: usize) -> Result<()> {
	if embedding.dim() == expected {
		Ok(())
	} else {
		Err(CoreError::DimensionMismatch {
			expected,
			actual: embedding.dim(),
		})
	}
}
