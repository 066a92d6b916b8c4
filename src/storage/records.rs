//! Loading article and tag records from JSON

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use crate::core::{Article, Tag};

/// Read a JSON array of records; `-` reads stdin
fn load_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<Vec<T>> {
	let text = if path.as_os_str() == "-" {
		std::io::read_to_string(std::io::stdin()).with_context(|| format!("Failed to read {} from stdin", what))?
	} else {
		fs::read_to_string(path).with_context(|| format!("Failed to read {} file: {}", what, path.display()))?
	};

	serde_json::from_str(&text).with_context(|| format!("Invalid {} JSON in {}", what, path.display()))
}

pub fn load_articles(path: &Path) -> Result<Vec<Article>> {
	load_json(path, "articles")
}

pub fn load_tags(path: &Path) -> Result<Vec<Tag>> {
	let tags: Vec<Tag> = load_json(path, "tags")?;
	if let Some(pos) = tags.iter().position(|t| t.name.trim().is_empty()) {
		anyhow::bail!("Tag #{} in {} has an empty name", pos, path.display());
	}
	Ok(tags)
}

/// Write pretty JSON to a file, or stdout for `-`
pub fn write_json<T: serde::Serialize>(value: &T, path: &Path) -> Result<()> {
	let json = serde_json::to_string_pretty(value)?;

	if path.as_os_str() == "-" || path.as_os_str().is_empty() {
		println!("{}", json);
	} else {
		fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
		crate::ui::success(&format!("Exported to {}", path.display()));
	}

	Ok(())
}
