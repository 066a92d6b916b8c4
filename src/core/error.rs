//! Error types for embedding, scoring and clustering

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
	/// Model or tokenizer could not be loaded. Fatal at construction.
	#[error("Embedding model unavailable: {0}")]
	ModelUnavailable(String),

	#[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
	DimensionMismatch { expected: usize, actual: usize },

	/// Tokenization or model execution failed for a batch
	#[error("Inference failed: {0}")]
	InferenceFailure(String),
}

impl CoreError {
	pub fn model(msg: impl std::fmt::Display) -> Self {
		Self::ModelUnavailable(msg.to_string())
	}

	pub fn inference(msg: impl std::fmt::Display) -> Self {
		Self::InferenceFailure(msg.to_string())
	}
}
