//! CLI module for Kapitler.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Kapitler - Video Chapter Generation
///
/// A CLI tool that turns a video's transcript into a timestamped chapter list.
/// The name "Kapitler" comes from the Norwegian word for "chapters."
#[derive(Parser, Debug)]
#[command(name = "kapitler")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a chapter list for a video
    Generate {
        /// YouTube video URL (falls back to a built-in sample video)
        video_url: Option<String>,

        /// Ask for exactly this many chapters
        #[arg(short = 'n', long)]
        chapters: Option<u32>,

        /// Sampling temperature, 0.0-1.0
        #[arg(long)]
        temperature: Option<f32>,

        /// Maximum tokens in the reply
        #[arg(long)]
        max_tokens: Option<u32>,

        /// Minimum seconds between consecutive chapters
        #[arg(long)]
        min_gap: Option<u64>,

        /// Chaptering policy (open-ended, self-review, fixed-count)
        #[arg(long)]
        policy: Option<String>,

        /// Drop malformed response lines instead of failing the run
        #[arg(long)]
        lenient: bool,

        /// Print the model's reply without validating it
        #[arg(long)]
        raw: bool,

        /// Write the compiled prompt to a side file for debugging
        #[arg(long)]
        dump_prompt: bool,

        /// Gemini model to use
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Check system requirements and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "gemini.model")
        key: String,
        /// Configuration value
        value: String,
    },

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
