//! Article records as supplied by the fetch/preprocess stage

use serde::{Deserialize, Serialize};

use super::cluster::Embedded;
use super::embedding::Embedding;
use crate::processing::normalize::article_text;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
	/// Stable external identity, passed through untouched
	pub url: String,
	pub title: String,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub content: Option<String>,
	#[serde(default)]
	pub full_text: Option<String>,
	#[serde(default)]
	pub source: Option<String>,
}

impl Article {
	pub fn new(url: impl Into<String>, title: impl Into<String>, description: impl Into<String>) -> Self {
		Self {
			url: url.into(),
			title: title.into(),
			description: description.into(),
			content: None,
			full_text: None,
			source: None,
		}
	}

	pub fn with_content(mut self, content: impl Into<String>) -> Self {
		self.content = Some(content.into());
		self
	}

	/// Body text; `content` wins over a scraped `full_text`
	pub fn body(&self) -> &str {
		self.content
			.as_deref()
			.or(self.full_text.as_deref())
			.unwrap_or("")
	}

	/// Canonical text fed to the embedder
	pub fn text(&self) -> String {
		article_text(&self.title, &self.description, self.body())
	}
}

/// Article with its embedding attached
#[derive(Debug, Clone, Serialize)]
pub struct EmbeddedArticle {
	pub article: Article,
	#[serde(skip)]
	pub embedding: Embedding,
}

impl EmbeddedArticle {
	pub fn new(article: Article, embedding: Embedding) -> Self {
		Self { article, embedding }
	}
}

impl Embedded for EmbeddedArticle {
	fn embedding(&self) -> &Embedding {
		&self.embedding
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_body_precedence() {
		let mut a = Article::new("u", "t", "d");
		assert_eq!(a.body(), "");

		a.full_text = Some("scraped".into());
		assert_eq!(a.body(), "scraped");

		a.content = Some("api content".into());
		assert_eq!(a.body(), "api content");
	}

	#[test]
	fn test_deserialize_full_text() {
		let json = r#"{"url":"https://x","title":"T","full_text":"Body"}"#;
		let a: Article = serde_json::from_str(json).unwrap();
		assert_eq!(a.description, "");
		assert_eq!(a.text(), "T Body");
	}
}
