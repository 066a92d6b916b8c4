//! Cluster command - group articles into stories

use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use colored::*;
use serde::Serialize;

use super::Engine;
use crate::core::{Article, Cluster, ClusterParams, ClusterSummary, EmbeddedArticle};
use crate::processing::Clusterer;
use crate::storage::{load_articles, write_json};
use crate::ui;

#[derive(Debug, Serialize)]
struct ClusterExport {
	timestamp: String,
	params: ClusterParams,
	summary: ClusterSummary,
	clusters: Vec<ClusterInfo>,
}

#[derive(Debug, Serialize)]
struct ClusterInfo {
	id: usize,
	size: usize,
	coherence: f32,
	oversized: bool,
	representative: String,
	articles: Vec<Article>,
}

pub fn run(articles_path: &Path, params: ClusterParams, preview_count: usize, export: Option<&Path>, use_cache: bool) -> Result<()> {
	let start = Instant::now();

	ui::debug(&format!(
		"Starting clustering: threshold={}, min_size={}, max_size={}",
		params.similarity_threshold, params.min_cluster_size, params.max_cluster_size
	));

	let articles = load_articles(articles_path)?;
	if articles.is_empty() {
		ui::warn("No articles to cluster");
		return Ok(());
	}
	ui::success(&format!("Loaded {} articles", articles.len()));

	let engine = Engine::load(use_cache)?;
	let texts: Vec<String> = articles.iter().map(Article::text).collect();
	let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
	let embeddings = engine.embedder().embed_batch(&refs)?;
	engine.finish();

	if let Some(first) = embeddings.first() {
		ui::debug(&format!("Embedding dimension: {}D", first.dim()));
	}

	let items: Vec<EmbeddedArticle> = articles
		.into_iter()
		.zip(embeddings)
		.map(|(article, embedding)| EmbeddedArticle::new(article, embedding))
		.collect();

	let clusters = Clusterer::new(params).cluster(&items)?;
	let summary = ClusterSummary::from_clusters(items.len(), &clusters);

	if !clusters.is_empty() {
		let sizes: Vec<usize> = clusters.iter().map(|c| c.size).collect();
		ui::debug(&format!(
			"Cluster sizes: min={}, max={}",
			sizes.iter().min().unwrap_or(&0),
			sizes.iter().max().unwrap_or(&0)
		));
	}

	if let Some(export_path) = export {
		return export_clusters(&clusters, params, summary, export_path);
	}

	print_clusters(&clusters, &summary, preview_count);
	eprintln!(
		"\n{}",
		format!("Completed in {:.1}s", start.elapsed().as_secs_f32()).dimmed()
	);

	Ok(())
}

fn print_clusters(clusters: &[Cluster<EmbeddedArticle>], summary: &ClusterSummary, preview_count: usize) {
	ui::success(&format!(
		"{} clusters, {} articles, {} unclustered ({:.1}%)",
		summary.clusters,
		summary.total_items,
		summary.unclustered(),
		summary.unclustered_percent()
	));
	if summary.clusters > 0 {
		ui::info(&format!("Average coherence: {}", ui::percent(summary.average_coherence)));
	}

	for cluster in clusters {
		let marker = if cluster.oversized {
			format!(" {}", "oversized".bright_yellow())
		} else {
			String::new()
		};
		eprintln!(
			"\n{} {} ({} articles, {:.1}% coherence){}",
			"Cluster".bright_white(),
			cluster.id.to_string().bright_cyan(),
			cluster.size,
			cluster.coherence * 100.0,
			marker
		);

		if let Some(repr) = cluster.representative() {
			eprintln!(
				"  {}: {}",
				"Representative".dimmed(),
				ui::truncate(&repr.article.title, 70).bright_white()
			);
		}

		for (i, member) in cluster.members.iter().take(preview_count).enumerate() {
			let source = member
				.article
				.source
				.as_deref()
				.map(|s| format!(" [{}]", s))
				.unwrap_or_default();
			eprintln!(
				"  {} {}{}",
				format!("[{}]", i + 1).dimmed(),
				ui::truncate(&member.article.title, 60),
				source.dimmed()
			);
		}

		if cluster.size > preview_count {
			eprintln!(
				"  {}",
				format!("... and {} more", cluster.size - preview_count).dimmed()
			);
		}
	}
}

fn export_clusters(
	clusters: &[Cluster<EmbeddedArticle>],
	params: ClusterParams,
	summary: ClusterSummary,
	export_path: &Path,
) -> Result<()> {
	let clusters = clusters
		.iter()
		.map(|cluster| ClusterInfo {
			id: cluster.id,
			size: cluster.size,
			coherence: cluster.coherence,
			oversized: cluster.oversized,
			representative: cluster
				.representative()
				.map(|r| r.article.url.clone())
				.unwrap_or_default(),
			articles: cluster.members.iter().map(|m| m.article.clone()).collect(),
		})
		.collect();

	let export = ClusterExport {
		timestamp: chrono::Utc::now().to_rfc3339(),
		params,
		summary,
		clusters,
	};

	write_json(&export, export_path)
}
