//! Persistent embedding cache
//!
//! Wraps any embedder and remembers vectors by content hash, so re-running
//! a command over the same articles skips inference. The file is tied to
//! one model and crate version.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, RwLock};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::core::{self, Embedding};
use crate::models::Embedder;
use crate::ui;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheFile {
	version: String,
	model: String,
	dimension: usize,
	entries: HashMap<String, Vec<f32>>,
}

pub struct CachedEmbedder {
	inner: Arc<dyn Embedder>,
	entries: RwLock<HashMap<String, Vec<f32>>>,
}

impl CachedEmbedder {
	pub fn new(inner: Arc<dyn Embedder>) -> Self {
		Self {
			inner,
			entries: RwLock::new(HashMap::new()),
		}
	}

	/// Load cached vectors from disk.
	///
	/// A missing file, or one written by another version or model, starts
	/// an empty cache.
	pub fn load(inner: Arc<dyn Embedder>, path: &Path) -> Result<Self> {
		let cache = Self::new(inner);
		if !path.exists() {
			return Ok(cache);
		}

		let bytes = fs::read(path).context("Failed to read embedding cache")?;
		let file: CacheFile = match rmp_serde::from_slice(&bytes) {
			Ok(file) => file,
			Err(e) => {
				ui::warn(&format!("Ignoring unreadable embedding cache: {}", e));
				return Ok(cache);
			}
		};

		if file.version != VERSION || file.model != cache.inner.name() || file.dimension != cache.inner.dimension() {
			ui::debug(&format!(
				"Discarding embedding cache from v{} ({})",
				file.version, file.model
			));
			return Ok(cache);
		}

		ui::debug(&format!("Loaded {} cached embeddings", file.entries.len()));
		*cache.write_entries()? = file.entries;
		Ok(cache)
	}

	pub fn save(&self, path: &Path) -> Result<()> {
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent).context("Failed to create cache directory")?;
		}

		let entries = self
			.entries
			.read()
			.map_err(|e| anyhow::anyhow!("Cache lock: {}", e))?;

		let file = CacheFile {
			version: VERSION.to_string(),
			model: self.inner.name().to_string(),
			dimension: self.inner.dimension(),
			entries: entries.clone(),
		};

		let bytes = rmp_serde::to_vec(&file).context("Failed to serialize embedding cache")?;
		fs::write(path, bytes).context("Failed to write embedding cache")?;

		ui::debug(&format!("Saved {} embeddings to {}", file.entries.len(), path.display()));
		Ok(())
	}

	pub fn len(&self) -> usize {
		self.entries.read().map(|e| e.len()).unwrap_or(0)
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn key(&self, text: &str) -> String {
		format!("{:016x}", xxh3_64(text.as_bytes()))
	}

	fn write_entries(&self) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<String, Vec<f32>>>> {
		self.entries
			.write()
			.map_err(|e| anyhow::anyhow!("Cache lock: {}", e))
	}
}

impl Embedder for CachedEmbedder {
	fn dimension(&self) -> usize {
		self.inner.dimension()
	}

	fn name(&self) -> &str {
		self.inner.name()
	}

	fn encode_batch(&self, texts: &[&str]) -> core::Result<Vec<Embedding>> {
		let keys: Vec<String> = texts.iter().map(|t| self.key(t)).collect();

		let mut found: Vec<Option<Embedding>> = {
			let entries = self
				.entries
				.read()
				.map_err(|e| core::CoreError::inference(format!("cache lock: {}", e)))?;
			keys.iter()
				.map(|k| entries.get(k).map(|v| Embedding::new(v.clone())))
				.collect()
		};

		let missing: Vec<usize> = (0..texts.len()).filter(|&i| found[i].is_none()).collect();
		if !missing.is_empty() {
			let misses: Vec<&str> = missing.iter().map(|&i| texts[i]).collect();
			let computed = self.inner.encode_batch(&misses)?;
			if computed.len() != misses.len() {
				return Err(core::CoreError::inference(format!(
					"model returned {} embeddings for {} texts",
					computed.len(),
					misses.len()
				)));
			}

			let mut entries = self
				.entries
				.write()
				.map_err(|e| core::CoreError::inference(format!("cache lock: {}", e)))?;
			for (&i, embedding) in missing.iter().zip(computed) {
				entries.insert(keys[i].clone(), embedding.0.clone());
				found[i] = Some(embedding);
			}
		}

		Ok(found.into_iter().flatten().collect())
	}
}
