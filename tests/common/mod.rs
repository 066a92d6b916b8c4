// Shared fakes for pipeline tests

use std::sync::atomic::{AtomicUsize, Ordering};

use cognos::core::{Embedding, Result};
use cognos::models::Embedder;

/// Maps text onto one axis per topic keyword, so related texts land on the
/// same direction and unrelated ones are orthogonal.
pub struct TopicEmbedder {
	pub calls: AtomicUsize,
}

impl TopicEmbedder {
	pub fn new() -> Self {
		Self { calls: AtomicUsize::new(0) }
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}

const TOPICS: [&str; 3] = ["election", "football", "battery"];

impl Embedder for TopicEmbedder {
	fn dimension(&self) -> usize {
		TOPICS.len() + 1
	}

	fn name(&self) -> &str {
		"topic-test"
	}

	fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
		self.calls.fetch_add(texts.len(), Ordering::SeqCst);
		Ok(texts
			.iter()
			.map(|text| {
				let lower = text.to_lowercase();
				let mut v: Vec<f32> = TOPICS
					.iter()
					.map(|t| if lower.contains(t) { 1.0 } else { 0.0 })
					.collect();
				// Off-topic text still gets a direction
				v.push(if v.iter().all(|&x| x == 0.0) { 1.0 } else { 0.0 });
				Embedding::new(v)
			})
			.collect())
	}
}
