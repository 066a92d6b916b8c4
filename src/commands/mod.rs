//! # Command Implementations
//!
//! Each submodule handles one CLI command (match, cluster, compare).

pub mod cluster;
pub mod compare;
pub mod matching;

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};

use crate::config;
use crate::models::{Embedder, TextModel};
use crate::storage::CachedEmbedder;
use crate::ui;

/// The loaded model, optionally behind the on-disk embedding cache
pub struct Engine {
	embedder: Arc<dyn Embedder>,
	cache: Option<Arc<CachedEmbedder>>,
}

impl Engine {
	/// Load the text model once for the whole command
	pub fn load(use_cache: bool) -> Result<Self> {
		let start = Instant::now();
		let model = TextModel::from_config().context("Failed to load text model")?;
		ui::debug(&format!(
			"Loaded {} ({}D) in {:.2}s",
			model.name(),
			model.dimension(),
			start.elapsed().as_secs_f32()
		));

		Self::with_embedder(Arc::new(model), use_cache)
	}

	/// Wrap an already constructed embedder
	pub fn with_embedder(model: Arc<dyn Embedder>, use_cache: bool) -> Result<Self> {
		if !use_cache {
			return Ok(Self { embedder: model, cache: None });
		}

		let cache = Arc::new(CachedEmbedder::load(model, &config::cache_path())?);
		Ok(Self {
			embedder: cache.clone(),
			cache: Some(cache),
		})
	}

	pub fn embedder(&self) -> Arc<dyn Embedder> {
		self.embedder.clone()
	}

	/// Persist newly computed embeddings. Failures only warn.
	pub fn finish(&self) {
		if let Some(cache) = &self.cache {
			if let Err(e) = cache.save(&config::cache_path()) {
				ui::warn(&format!("Could not save embedding cache: {:#}", e));
			}
		}
	}
}
