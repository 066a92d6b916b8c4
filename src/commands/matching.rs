//! Match command - rank tags for articles, or articles for tags

use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use colored::*;
use serde::Serialize;

use super::Engine;
use crate::core::{Article, Tag};
use crate::processing::{rank_matches, Match, Matcher};
use crate::storage::{load_articles, load_tags, write_json};
use crate::ui;

#[derive(Debug, Serialize)]
struct TagHit {
	tag: String,
	id: String,
	score: f32,
}

#[derive(Debug, Serialize)]
struct ArticleMatches {
	url: String,
	title: String,
	tags: Vec<TagHit>,
}

#[derive(Debug, Serialize)]
struct ArticleHit {
	url: String,
	title: String,
	score: f32,
}

#[derive(Debug, Serialize)]
struct TagMatches {
	tag: String,
	id: String,
	articles: Vec<ArticleHit>,
}

pub fn run(
	articles_path: &Path,
	tags_path: &Path,
	threshold: f32,
	limit: usize,
	by_tag: bool,
	export: Option<&Path>,
	use_cache: bool,
) -> Result<()> {
	let articles = load_articles(articles_path)?;
	let tags = load_tags(tags_path)?;
	ui::info(&format!("Loaded {} articles and {} tags", articles.len(), tags.len()));

	if articles.is_empty() || tags.is_empty() {
		ui::warn("Nothing to match");
		return Ok(());
	}

	let engine = Engine::load(use_cache)?;
	let matcher = Matcher::new(engine.embedder()).with_threshold(threshold);
	let start = Instant::now();

	let article_texts: Vec<String> = articles.iter().map(Article::text).collect();
	let tag_texts: Vec<String> = tags.iter().map(Tag::text).collect();
	let article_refs: Vec<&str> = article_texts.iter().map(String::as_str).collect();
	let tag_refs: Vec<&str> = tag_texts.iter().map(String::as_str).collect();

	let result = if by_tag {
		// Articles are embedded once and ranked against each tag
		let embedder = matcher.embedder();
		let article_embeddings = embedder.embed_batch(&article_refs)?;
		let per_tag = tag_refs
			.iter()
			.map(|tag| rank_matches(&embedder.embed(tag)?, &article_embeddings, threshold))
			.collect::<crate::core::Result<Vec<_>>>()?;
		engine.finish();
		report_by_tag(&articles, &tags, per_tag, limit, export)
	} else {
		let per_article = matcher.match_articles(&article_refs, &tag_refs, threshold)?;
		engine.finish();
		report_by_article(&articles, &tags, per_article, limit, export)
	};

	ui::debug(&format!("Matched in {:.2}s", start.elapsed().as_secs_f32()));
	result
}

fn report_by_article(
	articles: &[Article],
	tags: &[Tag],
	per_article: Vec<Vec<Match>>,
	limit: usize,
	export: Option<&Path>,
) -> Result<()> {
	let results: Vec<ArticleMatches> = articles
		.iter()
		.zip(per_article)
		.map(|(article, matches)| ArticleMatches {
			url: article.url.clone(),
			title: article.title.clone(),
			tags: matches
				.into_iter()
				.take(limit)
				.map(|m| TagHit {
					tag: tags[m.index].name.clone(),
					id: tags[m.index].identifier(m.index),
					score: m.score,
				})
				.collect(),
		})
		.collect();

	if let Some(path) = export {
		return write_json(&results, path);
	}

	let matched = results.iter().filter(|r| !r.tags.is_empty()).count();
	ui::success(&format!("{} of {} articles matched at least one tag", matched, results.len()));
	ui::header("Tags per article");

	for result in &results {
		eprintln!("\n{}", ui::truncate(&result.title, 70).bright_white());
		eprintln!("  {}", result.url.dimmed());
		if result.tags.is_empty() {
			eprintln!("  {}", "no matching tags".dimmed());
		}
		for (i, hit) in result.tags.iter().enumerate() {
			eprintln!(
				"  {} {} {}",
				format!("[{}]", i + 1).dimmed(),
				hit.tag.bright_cyan(),
				format!("({})", ui::percent(hit.score)).dimmed()
			);
		}
	}

	Ok(())
}

fn report_by_tag(
	articles: &[Article],
	tags: &[Tag],
	per_tag: Vec<Vec<Match>>,
	limit: usize,
	export: Option<&Path>,
) -> Result<()> {
	let results: Vec<TagMatches> = tags
		.iter()
		.enumerate()
		.zip(per_tag)
		.map(|((index, tag), matches)| TagMatches {
			tag: tag.name.clone(),
			id: tag.identifier(index),
			articles: matches
				.into_iter()
				.take(limit)
				.map(|m| ArticleHit {
					url: articles[m.index].url.clone(),
					title: articles[m.index].title.clone(),
					score: m.score,
				})
				.collect(),
		})
		.collect();

	if let Some(path) = export {
		return write_json(&results, path);
	}

	ui::header("Articles per tag");
	for result in &results {
		eprintln!(
			"\n{} {}",
			"Tag".bright_white(),
			result.tag.bright_cyan()
		);
		if result.articles.is_empty() {
			eprintln!("  {}", "no matching articles".dimmed());
		}
		for (i, hit) in result.articles.iter().enumerate() {
			eprintln!(
				"  {} {} {}",
				format!("[{}]", i + 1).dimmed(),
				ui::truncate(&hit.title, 60),
				format!("({})", ui::percent(hit.score)).dimmed()
			);
		}
	}

	Ok(())
}
