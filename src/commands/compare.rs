//! Compare command - similarity of two texts

use anyhow::Result;
use colored::*;

use super::Engine;
use crate::core;
use crate::models::Embedder;
use crate::processing::cosine_similarity;
use crate::ui;

pub fn run(first: &str, second: &str, use_cache: bool) -> Result<()> {
	let engine = Engine::load(use_cache)?;
	let embedder = engine.embedder();
	let score = similarity(embedder.as_ref(), first, second)?;
	engine.finish();

	ui::debug(&format!("Raw cosine similarity: {:.6}", score));

	eprintln!("  {} {}", "A".dimmed(), ui::truncate(first, 70));
	eprintln!("  {} {}", "B".dimmed(), ui::truncate(second, 70));
	ui::success(&format!("Similarity: {}", ui::percent(score).as_str().bright_cyan()));
	println!("{:.4}", score);

	Ok(())
}

/// Blank text embeds to the zero vector, so it scores 0.0 against anything
fn similarity(embedder: &dyn Embedder, first: &str, second: &str) -> core::Result<f32> {
	let a = embedder.embed(first)?;
	let b = embedder.embed(second)?;
	cosine_similarity(&a, &b)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::core::Embedding;

	/// Every non-blank text maps to the same direction
	struct ConstantEmbedder;

	impl Embedder for ConstantEmbedder {
		fn dimension(&self) -> usize {
			2
		}

		fn name(&self) -> &str {
			"constant-2"
		}

		fn encode_batch(&self, texts: &[&str]) -> core::Result<Vec<Embedding>> {
			Ok(texts.iter().map(|_| Embedding::new(vec![0.6, 0.8])).collect())
		}
	}

	#[test]
	fn test_blank_text_scores_zero() {
		assert_eq!(similarity(&ConstantEmbedder, "", "rates rise").unwrap(), 0.0);
		assert_eq!(similarity(&ConstantEmbedder, "   ", "").unwrap(), 0.0);
	}

	#[test]
	fn test_same_direction_scores_one() {
		let score = similarity(&ConstantEmbedder, "rates rise", "bank hikes rates").unwrap();
		assert!((score - 1.0).abs() < 1e-6);
	}
}
