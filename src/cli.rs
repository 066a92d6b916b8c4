use clap::{builder::Styles, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::{
	DEFAULT_MATCH_LIMIT, DEFAULT_MATCH_THRESHOLD, DEFAULT_MAX_CLUSTER_SIZE, DEFAULT_MIN_CLUSTER_SIZE,
	DEFAULT_SIMILARITY_THRESHOLD,
};

/// Execution provider for ONNX Runtime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Provider {
	/// Auto-detect best available (TensorRT → CUDA → CoreML → XNNPACK → CPU)
	#[default]
	Auto,
	/// CPU only
	Cpu,
	/// NVIDIA CUDA GPU
	Cuda,
	/// NVIDIA TensorRT (optimized inference)
	Tensorrt,
	/// Apple CoreML (macOS only)
	Coreml,
	/// XNNPACK (optimized CPU kernels)
	Xnnpack,
}

/// Similarity thresholds live in the cosine range
pub fn parse_threshold(s: &str) -> Result<f32, String> {
	let val: f32 = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
	if (-1.0..=1.0).contains(&val) {
		Ok(val)
	} else {
		Err(format!("threshold must be between -1.0 and 1.0, got {}", val))
	}
}

fn styles() -> Styles {
	Styles::styled()
		.header(anstyle::Style::new().bold().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Blue))))
		.usage(anstyle::Style::new().bold().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Blue))))
		.literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Blue))))
		.placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))))
		.valid(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Blue))))
		.invalid(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))))
}

#[derive(Parser, Debug)]
#[command(
	name = "cognos",
	author,
	version,
	about = "Semantic tag matching and story clustering for news articles",
	styles = styles(),
	disable_help_subcommand = true,
	after_help = format!(
		"{title}
  {cognos} {matching}    {match_args}   {match_desc}
  {cognos} {matching}    {by_tag_args}   {by_tag_desc}
  {cognos} {cluster}  {cluster_args}       {cluster_desc}
  {cognos} {compare}  {compare_args}    {compare_desc}",
		title = "Examples:".bright_blue().bold(),
		cognos = "cognos".bright_blue(),
		matching = "match".yellow(),
		match_args = "-a articles.json -t tags.json",
		match_desc = "Rank tags for each article".dimmed(),
		by_tag_args = "-a articles.json -t tags.json --by-tag",
		by_tag_desc = "Rank articles for each tag".dimmed(),
		cluster = "cluster".yellow(),
		cluster_args = "-a articles.json -s 0.4",
		cluster_desc = "Group articles into stories".dimmed(),
		compare = "compare".yellow(),
		compare_args = "\"text one\" \"text two\"",
		compare_desc = "Similarity of two texts".dimmed(),
	),
)]
pub struct Cli {
	/// Enable verbose debug output
	#[arg(short = 'v', long = "verbose", global = true)]
	pub verbose: bool,

	/// Execution provider: auto, cpu, cuda, tensorrt, coreml, xnnpack
	#[arg(short = 'p', long = "provider", global = true, default_value = "auto")]
	pub provider: Provider,

	/// Directory containing the all-MiniLM-L6-v2 model folder
	#[arg(long = "model-dir", global = true, value_name = "DIR")]
	pub model_dir: Option<PathBuf>,

	/// Do not read or write the embedding cache
	#[arg(long = "no-cache", global = true)]
	pub no_cache: bool,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Match articles against tags by semantic similarity
	Match {
		/// JSON array of articles ("-" for stdin)
		#[arg(short = 'a', long = "articles", value_name = "PATH")]
		articles: PathBuf,

		/// JSON array of tags
		#[arg(short = 't', long = "tags", value_name = "PATH")]
		tags: PathBuf,

		/// Minimum similarity score (-1.0 to 1.0)
		#[arg(short = 's', long = "threshold", default_value_t = DEFAULT_MATCH_THRESHOLD, value_parser = parse_threshold)]
		threshold: f32,

		/// Matches shown per article (or per tag)
		#[arg(short = 'n', long = "limit", default_value_t = DEFAULT_MATCH_LIMIT)]
		limit: usize,

		/// Rank articles for each tag instead of tags for each article
		#[arg(long = "by-tag")]
		by_tag: bool,

		/// Write matches as JSON ("-" for stdout)
		#[arg(short = 'e', long = "export", value_name = "PATH")]
		export: Option<PathBuf>,
	},

	/// Group articles into clusters of related stories
	Cluster {
		/// JSON array of articles ("-" for stdin)
		#[arg(short = 'a', long = "articles", value_name = "PATH")]
		articles: PathBuf,

		/// Minimum similarity for articles to share a cluster
		#[arg(short = 's', long = "threshold", default_value_t = DEFAULT_SIMILARITY_THRESHOLD, value_parser = parse_threshold)]
		threshold: f32,

		/// Smaller clusters are dropped
		#[arg(long = "min-size", default_value_t = DEFAULT_MIN_CLUSTER_SIZE)]
		min_size: usize,

		/// Larger clusters are kept but flagged
		#[arg(long = "max-size", default_value_t = DEFAULT_MAX_CLUSTER_SIZE)]
		max_size: usize,

		/// Articles listed per cluster
		#[arg(long = "preview", default_value_t = 5)]
		preview: usize,

		/// Write clusters as JSON ("-" for stdout)
		#[arg(short = 'e', long = "export", value_name = "PATH")]
		export: Option<PathBuf>,
	},

	/// Cosine similarity between two texts
	Compare {
		first: String,
		second: String,
	},

	/// Show help for a subcommand
	Help {
		/// Subcommand name
		subcommand: Option<String>,
	},
}
