//! Unified logging system

use colored::*;
use std::sync::atomic::{AtomicBool, Ordering};

static VERBOSE: AtomicBool = AtomicBool::new(false);

pub struct Log;

impl Log {
	pub fn set_verbose(enabled: bool) {
		VERBOSE.store(enabled, Ordering::Relaxed);
	}

	pub fn is_verbose() -> bool {
		VERBOSE.load(Ordering::Relaxed)
	}
}

pub fn info(msg: &str) {
	eprintln!("{} {}", "ℹ".bright_blue().bold(), msg.bright_white());
}

pub fn success(msg: &str) {
	eprintln!("{} {}", "✓".bright_green().bold(), msg.bright_white());
}

pub fn warn(msg: &str) {
	eprintln!("{} {}", "⚠".bright_yellow().bold(), msg.bright_white());
}

pub fn error(msg: &str) {
	eprintln!("{} {}", "✗".bright_red().bold(), msg.bright_white());
}

pub fn debug(msg: &str) {
	if Log::is_verbose() {
		eprintln!("{} {}", "⚙".bright_black().bold(), msg.dimmed());
	}
}

pub fn header(text: &str) {
	eprintln!("\n{}", text.bright_blue().bold());
}

/// Version banner shown before each command
pub fn banner() {
	eprintln!();
	eprintln!(
		"{}",
		format!("─── Cognos v{} ───", env!("CARGO_PKG_VERSION"))
			.bright_blue()
			.bold()
	);
}

/// Shortens text to `max_chars`, appending an ellipsis when cut
pub fn truncate(text: &str, max_chars: usize) -> String {
	if text.chars().count() <= max_chars {
		return text.to_string();
	}
	let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
	format!("{}...", cut)
}

/// Similarity score as a percentage string
pub fn percent(score: f32) -> String {
	format!("{:.0}%", score * 100.0)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_truncate() {
		assert_eq!(truncate("short", 10), "short");
		assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
		assert_eq!(truncate("ééééé", 5), "ééééé");
	}

	#[test]
	fn test_percent() {
		assert_eq!(percent(0.456), "46%");
	}
}
