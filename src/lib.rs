//! Kapitler - Video Chapter Generation
//!
//! A CLI tool that turns a video's transcript into a timestamped chapter list.
//!
//! The name "Kapitler" comes from the Norwegian word for "chapters."
//!
//! # Overview
//!
//! Kapitler allows you to:
//! - Resolve a YouTube URL to its video ID and fetch the caption track
//! - Encode the transcript into a timestamped prompt for an LLM
//! - Generate chapter candidates with Gemini
//! - Validate the reply against the promised output grammar before trusting it
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `transcript_source` - Transcript source abstraction (YouTube)
//! - `chapters` - Transcript encoding, prompt compilation, response validation
//! - `llm` - Text generation abstraction (Gemini)
//! - `pipeline` - Pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use kapitler::config::Settings;
//! use kapitler::pipeline::{ChapterOutcome, ChapterPipeline};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let pipeline = ChapterPipeline::new(settings)?;
//!
//!     let outcome = pipeline.run("https://www.youtube.com/watch?v=dQw4w9WgXcQ").await?;
//!     if let ChapterOutcome::Chapters(list) = outcome {
//!         println!("Generated {} chapters", list.chapters.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod chapters;
pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod transcript_source;

pub use error::{KapitlerError, Result};
