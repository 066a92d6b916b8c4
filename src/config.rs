//! Application configuration and constants

use std::path::PathBuf;
use std::sync::OnceLock;

static CUSTOM_MODEL_DIR: OnceLock<PathBuf> = OnceLock::new();

// === Model Files ===
pub const MODEL_NAME: &str = "all-MiniLM-L6-v2";
pub const TEXT_MODEL: &str = "model.onnx";
pub const TOKENIZER: &str = "tokenizer.json";
pub const MODELS_DIR_ENV: &str = "COGNOS_MODELS_DIR";

// === Model Parameters ===
pub const EMBEDDING_DIM: usize = 384;
pub const MAX_SEQUENCE_LENGTH: usize = 256;
pub const INFERENCE_BATCH_SIZE: usize = 32;

// === Text ===
/// Body characters kept when building article text
pub const CONTENT_PREVIEW_CHARS: usize = 500;

// === Matching Defaults ===
pub const DEFAULT_MATCH_THRESHOLD: f32 = 0.3;
pub const DEFAULT_MATCH_LIMIT: usize = 5;

// === Clustering Defaults ===
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.5;
pub const DEFAULT_MIN_CLUSTER_SIZE: usize = 3;
pub const DEFAULT_MAX_CLUSTER_SIZE: usize = 25;

// === Storage ===
pub const CACHE_DIR: &str = ".cognos";
pub const CACHE_FILE: &str = "embeddings.msgpack";

pub fn set_model_dir(path: PathBuf) {
	let _ = CUSTOM_MODEL_DIR.set(path);
}

/// Get models directory (--model-dir, COGNOS_MODELS_DIR, or next to the executable)
pub fn models_dir() -> Option<PathBuf> {
	if let Some(custom) = CUSTOM_MODEL_DIR.get() {
		crate::ui::debug(&format!("Using custom model dir: {}", custom.display()));
		return Some(custom.clone());
	}

	if let Ok(env_path) = std::env::var(MODELS_DIR_ENV) {
		let path = PathBuf::from(&env_path);
		if path.is_dir() {
			crate::ui::debug(&format!("Using {}: {}", MODELS_DIR_ENV, env_path));
			return Some(path);
		}
	}

	if let Ok(exe) = std::env::current_exe() {
		if let Some(dir) = exe.parent() {
			let models = dir.join("models");
			if models.is_dir() {
				crate::ui::debug(&format!("Found models at: {}", models.display()));
				return Some(models);
			}
		}
	}

	None
}

pub fn get_text_model_path() -> Option<PathBuf> {
	models_dir().map(|d| d.join(MODEL_NAME).join(TEXT_MODEL))
}

pub fn get_tokenizer_path() -> Option<PathBuf> {
	models_dir().map(|d| d.join(MODEL_NAME).join(TOKENIZER))
}

/// Embedding cache location, relative to the working directory
pub fn cache_path() -> PathBuf {
	PathBuf::from(CACHE_DIR).join(CACHE_FILE)
}
