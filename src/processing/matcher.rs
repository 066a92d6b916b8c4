//! Tag matching by semantic similarity
//!
//! Scores one text against a list of candidate texts (usually an article
//! against the user's tags, or a tag against fetched articles) and keeps
//! the candidates above a threshold, best first.

use std::cmp::Ordering;
use std::sync::Arc;

use serde::Serialize;

use super::similarity::cosine_similarity_batch;
use crate::config::DEFAULT_MATCH_THRESHOLD;
use crate::core::{Embedding, Result};
use crate::models::Embedder;

/// A candidate that scored at or above the threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Match {
	/// Position of the candidate in the input list
	pub index: usize,
	pub score: f32,
}

pub struct Matcher {
	embedder: Arc<dyn Embedder>,
	threshold: f32,
}

impl Matcher {
	pub fn new(embedder: Arc<dyn Embedder>) -> Self {
		Self {
			embedder,
			threshold: DEFAULT_MATCH_THRESHOLD,
		}
	}

	/// Set the default similarity threshold
	pub fn with_threshold(mut self, threshold: f32) -> Self {
		self.threshold = threshold;
		self
	}

	pub fn threshold(&self) -> f32 {
		self.threshold
	}

	pub fn embedder(&self) -> &Arc<dyn Embedder> {
		&self.embedder
	}

	/// Match `text` against `candidates` using the default threshold
	pub fn match_text(&self, text: &str, candidates: &[&str]) -> Result<Vec<Match>> {
		self.match_text_with_threshold(text, candidates, self.threshold)
	}

	/// Embeds `text` once and all candidates in one batch, then ranks.
	pub fn match_text_with_threshold(&self, text: &str, candidates: &[&str], threshold: f32) -> Result<Vec<Match>> {
		if candidates.is_empty() {
			return Ok(Vec::new());
		}

		let query = self.embedder.embed(text)?;
		let candidate_embeddings = self.embedder.embed_batch(candidates)?;

		let matches = rank_matches(&query, &candidate_embeddings, threshold)?;
		crate::ui::debug(&format!(
			"{} of {} candidates at or above {:.2}",
			matches.len(),
			candidates.len(),
			threshold
		));
		Ok(matches)
	}

	/// One ranked match list per article. Tags and articles are each
	/// embedded in one batch.
	pub fn match_articles(&self, article_texts: &[&str], tag_texts: &[&str], threshold: f32) -> Result<Vec<Vec<Match>>> {
		if tag_texts.is_empty() {
			return Ok(vec![Vec::new(); article_texts.len()]);
		}

		let tag_embeddings = self.embedder.embed_batch(tag_texts)?;
		let article_embeddings = self.embedder.embed_batch(article_texts)?;
		let zero = Embedding::zeros(self.embedder.dimension());

		article_texts
			.iter()
			.zip(&article_embeddings)
			.map(|(text, article)| {
				// Blank articles score like a blank `match_text` query
				let query = if text.trim().is_empty() { &zero } else { article };
				rank_matches(query, &tag_embeddings, threshold)
			})
			.collect()
	}
}

/// Scores `query` against each candidate embedding, keeps scores at or
/// above `threshold`, sorted by score descending.
pub fn rank_matches(query: &Embedding, candidates: &[Embedding], threshold: f32) -> Result<Vec<Match>> {
	let scores = cosine_similarity_batch(query, candidates)?;

	let mut matches: Vec<Match> = scores
		.into_iter()
		.enumerate()
		.filter(|(_, score)| *score >= threshold)
		.map(|(index, score)| Match { index, score })
		.collect();

	// Stable sort: equal scores keep input order
	matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

	Ok(matches)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::core::CoreError;
	use std::collections::HashMap;

	/// Returns fixed vectors for known texts
	struct FixedEmbedder {
		vectors: HashMap<String, Vec<f32>>,
	}

	impl Embedder for FixedEmbedder {
		fn dimension(&self) -> usize {
			2
		}

		fn name(&self) -> &str {
			"fixed-2"
		}

		fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
			texts
				.iter()
				.map(|t| {
					self.vectors
						.get(*t)
						.map(|v| Embedding::new(v.clone()))
						.ok_or_else(|| CoreError::inference(format!("unknown text: {}", t)))
				})
				.collect()
		}
	}

	/// Unit vector at the angle whose cosine with [1, 0] is `sim`
	fn at_similarity(sim: f32) -> Vec<f32> {
		vec![sim, (1.0 - sim * sim).sqrt()]
	}

	fn matcher() -> Matcher {
		let vectors = [
			("electric vehicles battery", vec![1.0, 0.0]),
			("article one", at_similarity(0.6)),
			("article two", at_similarity(0.2)),
			("article three", at_similarity(0.45)),
			(" ", vec![0.0, 1.0]),
		]
		.into_iter()
		.map(|(k, v)| (k.to_string(), v))
		.collect();
		Matcher::new(Arc::new(FixedEmbedder { vectors }))
	}

	#[test]
	fn test_empty_candidates() {
		let m = matcher();
		assert!(m.match_text("electric vehicles battery", &[]).unwrap().is_empty());
	}

	#[test]
	fn test_ranked_and_thresholded() {
		let m = matcher();
		let matches = m
			.match_text_with_threshold(
				"electric vehicles battery",
				&["article one", "article two", "article three"],
				0.3,
			)
			.unwrap();

		assert_eq!(matches.len(), 2);
		assert_eq!(matches[0].index, 0);
		assert!((matches[0].score - 0.6).abs() < 1e-5);
		assert_eq!(matches[1].index, 2);
		assert!((matches[1].score - 0.45).abs() < 1e-5);
	}

	#[test]
	fn test_default_threshold() {
		let m = matcher();
		assert_eq!(m.threshold(), DEFAULT_MATCH_THRESHOLD);

		let strict = matcher().with_threshold(0.5);
		let matches = strict
			.match_text("electric vehicles battery", &["article one", "article two", "article three"])
			.unwrap();
		assert_eq!(matches.len(), 1);
	}

	#[test]
	fn test_idempotent() {
		let m = matcher();
		let candidates = ["article three", "article one", "article two"];
		let first = m.match_text("electric vehicles battery", &candidates).unwrap();
		let second = m.match_text("electric vehicles battery", &candidates).unwrap();
		assert_eq!(first, second);
	}

	#[test]
	fn test_threshold_is_inclusive() {
		let query = Embedding::new(vec![1.0, 0.0]);
		let candidates = vec![Embedding::new(vec![1.0, 0.0])];
		assert_eq!(rank_matches(&query, &candidates, 1.0).unwrap().len(), 1);
	}

	#[test]
	fn test_match_articles() {
		let m = matcher();
		let results = m
			.match_articles(&["article one", "article two"], &["electric vehicles battery"], 0.3)
			.unwrap();
		assert_eq!(results.len(), 2);
		assert_eq!(results[0].len(), 1);
		assert!(results[1].is_empty());

		let none = m.match_articles(&["article one"], &[], 0.3).unwrap();
		assert_eq!(none, vec![Vec::<Match>::new()]);

		let blank = m.match_articles(&["  "], &["electric vehicles battery"], -1.0).unwrap();
		assert_eq!(blank[0].len(), 1);
		assert_eq!(blank[0][0].score, 0.0);
	}

	#[test]
	fn test_inference_failure_propagates() {
		let m = matcher();
		let result = m.match_text("electric vehicles battery", &["article one", "never seen"]);
		assert!(matches!(result, Err(CoreError::InferenceFailure(_))));
	}
}
