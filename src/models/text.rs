//! Sentence-transformer text model (all-MiniLM-L6-v2) on ONNX Runtime

use std::path::Path;
use std::sync::Mutex;

use ndarray::{Array2, ArrayView3, Axis};
use ort::session::Session;
use ort::value::Value;
use tokenizers::{PaddingParams, PaddingStrategy, Tokenizer, TruncationParams};

use super::embedder::Embedder;
use crate::config::{EMBEDDING_DIM, MAX_SEQUENCE_LENGTH, MODEL_NAME};
use crate::core::{CoreError, Embedding, Result};

pub struct TextModel {
	session: Mutex<Session>,
	tokenizer: Tokenizer,
	dimension: usize,
}

impl TextModel {
	/// Load model and tokenizer. Any failure is `ModelUnavailable`.
	pub fn load(model_path: &Path, tokenizer_path: &Path) -> Result<Self> {
		if !model_path.exists() {
			return Err(CoreError::model(format!(
				"model file does not exist: {}",
				model_path.display()
			)));
		}
		if !tokenizer_path.exists() {
			return Err(CoreError::model(format!(
				"tokenizer file does not exist: {}",
				tokenizer_path.display()
			)));
		}

		crate::ui::debug(&format!("Loading text model: {}", model_path.display()));

		let session = crate::runtime::create_session(model_path)
			.map_err(|e| CoreError::model(format!("failed to load text model: {:#}", e)))?;

		let mut tokenizer = Tokenizer::from_file(tokenizer_path)
			.map_err(|e| CoreError::model(format!("failed to load tokenizer: {}", e)))?;

		tokenizer.with_padding(Some(PaddingParams {
			strategy: PaddingStrategy::BatchLongest,
			..Default::default()
		}));
		tokenizer
			.with_truncation(Some(TruncationParams {
				max_length: MAX_SEQUENCE_LENGTH,
				..Default::default()
			}))
			.map_err(|e| CoreError::model(format!("failed to configure truncation: {}", e)))?;

		Ok(Self {
			session: Mutex::new(session),
			tokenizer,
			dimension: EMBEDDING_DIM,
		})
	}

	/// Load from the configured models directory
	pub fn from_config() -> Result<Self> {
		let model_path = crate::config::get_text_model_path().ok_or_else(|| {
			CoreError::model(format!(
				"models directory not found; set --model-dir or {}",
				crate::config::MODELS_DIR_ENV
			))
		})?;
		let tokenizer_path = crate::config::get_tokenizer_path()
			.ok_or_else(|| CoreError::model("models directory not found"))?;

		Self::load(&model_path, &tokenizer_path)
	}

	fn tokenize(&self, texts: &[&str]) -> Result<(Array2<i64>, Array2<i64>)> {
		let encodings = self
			.tokenizer
			.encode_batch(texts.to_vec(), true)
			.map_err(|e| CoreError::inference(format!("tokenization failed: {}", e)))?;

		let batch = encodings.len();
		let seq_len = encodings.iter().map(|e| e.get_ids().len()).max().unwrap_or(0);

		let mut ids = Array2::<i64>::zeros((batch, seq_len));
		let mut mask = Array2::<i64>::zeros((batch, seq_len));

		for (row, encoding) in encodings.iter().enumerate() {
			for (col, (&id, &m)) in encoding
				.get_ids()
				.iter()
				.zip(encoding.get_attention_mask())
				.enumerate()
			{
				ids[[row, col]] = id as i64;
				mask[[row, col]] = m as i64;
			}
		}

		Ok((ids, mask))
	}
}

impl Embedder for TextModel {
	fn dimension(&self) -> usize {
		self.dimension
	}

	fn name(&self) -> &str {
		MODEL_NAME
	}

	fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
		let (ids, mask) = self.tokenize(texts)?;
		let (batch, seq_len) = ids.dim();

		let shape = vec![batch, seq_len];
		let input_ids = Value::from_array((shape.clone(), ids.iter().copied().collect::<Vec<i64>>()))
			.map_err(CoreError::inference)?;
		let attention_mask = Value::from_array((shape.clone(), mask.iter().copied().collect::<Vec<i64>>()))
			.map_err(CoreError::inference)?;
		let token_type_ids = Value::from_array((shape, vec![0i64; batch * seq_len]))
			.map_err(CoreError::inference)?;

		let mut session = self
			.session
			.lock()
			.map_err(|e| CoreError::inference(format!("session lock: {}", e)))?;

		let outputs = session
			.run(ort::inputs![
				"input_ids" => input_ids,
				"attention_mask" => attention_mask,
				"token_type_ids" => token_type_ids,
			])
			.map_err(CoreError::inference)?;

		let output = outputs
			.get("last_hidden_state")
			.or_else(|| outputs.get("sentence_embedding"))
			.ok_or_else(|| CoreError::inference("model output not found"))?;

		let (shape, data) = output.try_extract_tensor::<f32>().map_err(CoreError::inference)?;
		let dims: Vec<usize> = shape.iter().map(|&x| x as usize).collect();

		let pooled: Vec<Vec<f32>> = match dims.as_slice() {
			// [batch, seq_len, hidden] - mean pooling over real tokens
			[b, s, h] => {
				let hidden = ArrayView3::from_shape((*b, *s, *h), data).map_err(CoreError::inference)?;
				mean_pool(hidden, &mask)
			}
			// [batch, hidden] - already pooled
			[_, h] if *h > 0 => data.chunks(*h).map(<[f32]>::to_vec).collect(),
			_ => {
				return Err(CoreError::inference(format!("unexpected output shape: {:?}", dims)));
			}
		};

		Ok(pooled
			.into_iter()
			.map(|v| Embedding::new(v).normalized())
			.collect())
	}
}

/// Mean pooling with attention mask
fn mean_pool(hidden: ArrayView3<f32>, mask: &Array2<i64>) -> Vec<Vec<f32>> {
	hidden
		.axis_iter(Axis(0))
		.zip(mask.axis_iter(Axis(0)))
		.map(|(tokens, row_mask)| {
			let hidden_size = tokens.ncols();
			let mut sum = vec![0.0f32; hidden_size];
			let mut count = 0.0f32;

			for (token, &m) in tokens.axis_iter(Axis(0)).zip(row_mask.iter()) {
				if m == 1 {
					for (acc, &v) in sum.iter_mut().zip(token.iter()) {
						*acc += v;
					}
					count += 1.0;
				}
			}

			if count > 0.0 {
				sum.iter_mut().for_each(|x| *x /= count);
			}
			sum
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use ndarray::Array3;

	#[test]
	fn test_mean_pool_respects_mask() {
		// batch 1, 3 tokens, hidden 2; last token is padding
		let hidden = Array3::from_shape_vec((1, 3, 2), vec![1.0, 2.0, 3.0, 4.0, 100.0, 100.0]).unwrap();
		let mask = Array2::from_shape_vec((1, 3), vec![1, 1, 0]).unwrap();

		let pooled = mean_pool(hidden.view(), &mask);
		assert_eq!(pooled, vec![vec![2.0, 3.0]]);
	}

	#[test]
	fn test_mean_pool_all_masked() {
		let hidden = Array3::from_shape_vec((1, 2, 2), vec![5.0; 4]).unwrap();
		let mask = Array2::from_shape_vec((1, 2), vec![0, 0]).unwrap();
		assert_eq!(mean_pool(hidden.view(), &mask), vec![vec![0.0, 0.0]]);
	}

	#[test]
	fn test_missing_model_is_unavailable() {
		let result = TextModel::load(Path::new("/nonexistent/model.onnx"), Path::new("/nonexistent/tokenizer.json"));
		assert!(matches!(result, Err(CoreError::ModelUnavailable(_))));
	}

	#[test]
	#[ignore] // Requires model files in COGNOS_MODELS_DIR
	fn test_text_model_basic() {
		let model = TextModel::from_config().unwrap();

		let emb = model.embed("Electric vehicle battery breakthrough").unwrap();
		assert_eq!(emb.dim(), EMBEDDING_DIM);

		let batch = model
			.embed_batch(&["EV batteries get cheaper", "Central bank raises rates", ""])
			.unwrap();
		assert_eq!(batch.len(), 3);
		assert!(batch.iter().all(|e| e.dim() == EMBEDDING_DIM));
	}
}
