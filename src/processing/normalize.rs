//! Canonical text for articles and tags

use crate::config::CONTENT_PREVIEW_CHARS;

/// Title, description and the first 500 characters of the body, joined
/// by single spaces. Empty parts are skipped.
pub fn article_text(title: &str, description: &str, content: &str) -> String {
	let preview: String = content.chars().take(CONTENT_PREVIEW_CHARS).collect();
	join_non_empty([title, description, preview.as_str()])
}

/// Name, space-joined keywords, then category. Empty parts are skipped.
pub fn tag_text<S: AsRef<str>>(name: &str, keywords: &[S], category: &str) -> String {
	let keywords = keywords
		.iter()
		.map(AsRef::as_ref)
		.filter(|k| !k.is_empty())
		.collect::<Vec<_>>()
		.join(" ");
	join_non_empty([name, keywords.as_str(), category])
}

fn join_non_empty<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
	parts
		.into_iter()
		.filter(|p| !p.is_empty())
		.collect::<Vec<_>>()
		.join(" ")
}
