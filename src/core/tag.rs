//! User-defined topic tags

use serde::{Deserialize, Serialize};

use crate::processing::normalize::tag_text;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
	#[serde(default)]
	pub id: Option<u64>,
	#[serde(alias = "tag_name")]
	pub name: String,
	#[serde(default)]
	pub keywords: Vec<String>,
	#[serde(default)]
	pub category: Option<String>,
}

impl Tag {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			id: None,
			name: name.into(),
			keywords: Vec::new(),
			category: None,
		}
	}

	pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.keywords = keywords.into_iter().map(Into::into).collect();
		self
	}

	pub fn with_category(mut self, category: impl Into<String>) -> Self {
		self.category = Some(category.into());
		self
	}

	/// Canonical text fed to the embedder
	pub fn text(&self) -> String {
		tag_text(&self.name, &self.keywords, self.category.as_deref().unwrap_or(""))
	}

	/// External identifier, or the position in the input list
	pub fn identifier(&self, index: usize) -> String {
		match self.id {
			Some(id) => id.to_string(),
			None => index.to_string(),
		}
	}
}
