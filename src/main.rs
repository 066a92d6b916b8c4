//! Cognos - semantic tag matching and story clustering
//!
//! Embeds news articles and user tags with a sentence-transformer model,
//! then ranks tags per article or groups articles into stories.

use anyhow::Result;
use clap::{CommandFactory, Parser};

use cognos::cli::{Cli, Command};
use cognos::commands;
use cognos::config;
use cognos::core::ClusterParams;
use cognos::runtime::set_provider;
use cognos::ui::{self, Log};

fn main() {
	if let Err(e) = run() {
		ui::error(&format!("{:#}", e));
		std::process::exit(1);
	}
}

fn run() -> Result<()> {
	let cli = Cli::parse();

	Log::set_verbose(cli.verbose);
	set_provider(cli.provider);
	if let Some(dir) = cli.model_dir {
		config::set_model_dir(dir);
	}
	let use_cache = !cli.no_cache;

	match cli.command {
		Command::Match {
			articles,
			tags,
			threshold,
			limit,
			by_tag,
			export,
		} => {
			ui::banner();
			commands::matching::run(&articles, &tags, threshold, limit, by_tag, export.as_deref(), use_cache)
		}

		Command::Cluster {
			articles,
			threshold,
			min_size,
			max_size,
			preview,
			export,
		} => {
			ui::banner();
			let params = ClusterParams {
				similarity_threshold: threshold,
				min_cluster_size: min_size,
				max_cluster_size: max_size,
			};
			commands::cluster::run(&articles, params, preview, export.as_deref(), use_cache)
		}

		Command::Compare { first, second } => commands::compare::run(&first, &second, use_cache),

		Command::Help { subcommand } => {
			let mut cmd = Cli::command();
			if let Some(sub) = subcommand {
				if let Some(sub_cmd) = cmd.find_subcommand_mut(&sub) {
					sub_cmd.print_help()?;
				} else {
					ui::warn(&format!("Unknown subcommand: {}", sub));
					cmd.print_help()?;
				}
			} else {
				cmd.print_help()?;
			}
			Ok(())
		}
	}
}
