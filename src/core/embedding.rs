//! Fixed-length embedding vectors

use serde::{Deserialize, Serialize};

use super::error::{CoreError, Result};

/// Dense vector produced by an embedder.
///
/// Values are stored as the model returned them. Similarity is always
/// computed as a full cosine, so unnormalized and zero vectors are valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Embedding(pub Vec<f32>);

impl Embedding {
	pub fn new(data: Vec<f32>) -> Self {
		Self(data)
	}

	/// All-zero vector, the embedding of blank text
	pub fn zeros(dim: usize) -> Self {
		Self(vec![0.0; dim])
	}

	pub fn as_slice(&self) -> &[f32] {
		&self.0
	}

	pub fn dim(&self) -> usize {
		self.0.len()
	}

	pub fn norm(&self) -> f32 {
		self.0.iter().map(|x| x * x).sum::<f32>().sqrt()
	}

	pub fn is_zero(&self) -> bool {
		self.0.iter().all(|&x| x == 0.0)
	}

	/// Unit-length copy; zero vectors are returned unchanged
	pub fn normalized(&self) -> Self {
		let norm = self.norm();
		if norm > 0.0 {
			Self(self.0.iter().map(|x| x / norm).collect())
		} else {
			self.clone()
		}
	}

	/// Fails with `DimensionMismatch` unless `other` has the same length
	pub fn check_dim(&self, other: &Self) -> Result<()> {
		if self.dim() == other.dim() {
			Ok(())
		} else {
			Err(CoreError::DimensionMismatch {
				expected: self.dim(),
				actual: other.dim(),
			})
		}
	}

	/// Component-wise mean of equally sized embeddings
	pub fn mean<'a>(embeddings: impl IntoIterator<Item = &'a Embedding>) -> Option<Self> {
		let mut iter = embeddings.into_iter();
		let first = iter.next()?;
		let mut sum = first.0.clone();
		let mut count = 1usize;

		for emb in iter {
			for (acc, &v) in sum.iter_mut().zip(emb.0.iter()) {
				*acc += v;
			}
			count += 1;
		}

		let n = count as f32;
		sum.iter_mut().for_each(|v| *v /= n);
		Some(Self(sum))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_zeros() {
		let z = Embedding::zeros(384);
		assert_eq!(z.dim(), 384);
		assert!(z.is_zero());
		assert_eq!(z.norm(), 0.0);
	}

	#[test]
	fn test_normalized() {
		let e = Embedding::new(vec![3.0, 4.0]);
		let n = e.normalized();
		assert!((n.norm() - 1.0).abs() < 1e-6);
		assert!((n.0[0] - 0.6).abs() < 1e-6);

		let z = Embedding::zeros(3).normalized();
		assert!(z.is_zero());
	}

	#[test]
	fn test_check_dim() {
		let a = Embedding::zeros(3);
		let b = Embedding::zeros(4);
		assert!(a.check_dim(&a.clone()).is_ok());
		match a.check_dim(&b) {
			Err(CoreError::DimensionMismatch { expected, actual }) => {
				assert_eq!(expected, 3);
				assert_eq!(actual, 4);
			}
			other => panic!("expected dimension mismatch, got {:?}", other),
		}
	}

	#[test]
	fn test_mean() {
		let a = Embedding::new(vec![1.0, 0.0]);
		let b = Embedding::new(vec![0.0, 1.0]);
		let m = Embedding::mean([&a, &b]).unwrap();
		assert_eq!(m.0, vec![0.5, 0.5]);
		assert!(Embedding::mean(std::iter::empty()).is_none());
	}
}
