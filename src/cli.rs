//! Command-line argument parsing for the composer tool
//!
//! Supports:
//! - Emoji search and frequently used listing
//! - Trigger detection on a line of text
//! - Markdown import/export round-trips

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use feed_composer::ComposerConfig;

/// Feed composer rich-text tooling
#[derive(Parser, Debug)]
#[command(name = "composer", version, about = "Feed composer rich-text tooling")]
pub struct CliArgs {
    /// Emoji dataset JSON (overrides the configured dataset)
    #[arg(long, value_name = "FILE", global = true)]
    pub data: Option<PathBuf>,

    /// Custom emoji pack JSON, may be repeated
    #[arg(long = "custom", value_name = "FILE", global = true)]
    pub custom: Vec<PathBuf>,

    /// Log debug output to the console
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Search emoji by name, keyword or emoticon
    Search {
        query: String,
        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Report the @mention or :emoji: trigger at the caret
    Detect {
        text: String,
        /// Caret character offset, defaults to the end of the text
        #[arg(long)]
        caret: Option<usize>,
    },
    /// List frequently used emoji
    Frequent,
    /// Record a use of an emoji
    Record {
        id: String,
        /// Also set the preferred skin tone (1-6)
        #[arg(long)]
        skin: Option<u8>,
    },
    /// Import Markdown and print its nodes and re-exported form
    Convert {
        /// Markdown input file, reads stdin when omitted
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,
    },
}

/// Settings after merging CLI arguments over the config file
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub composer: ComposerConfig,
    pub command: Command,
}

impl CliArgs {
    /// Merge parsed CLI args over the loaded configuration
    pub fn into_config(self, mut composer: ComposerConfig) -> Result<RunConfig, String> {
        if let Some(data) = self.data {
            composer.dataset = Some(data);
        }
        composer.custom_packs.extend(self.custom);

        match &self.command {
            Command::Search { limit: Some(0), .. } => {
                return Err("--limit must be at least 1".to_string());
            }
            Command::Search {
                limit: Some(limit), ..
            } => composer.max_results = *limit,
            Command::Record {
                skin: Some(skin), ..
            } if !(1..=6).contains(skin) => {
                return Err(format!("Skin tone must be between 1 and 6, got {}", skin));
            }
            _ => {}
        }

        Ok(RunConfig {
            composer,
            command: self.command,
        })
    }
}
