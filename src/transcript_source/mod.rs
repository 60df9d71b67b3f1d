//! Transcript source abstraction.
//!
//! Provides a trait-based interface for fetching a video's timestamped
//! transcript. Whatever goes wrong inside a source (video missing, captions
//! disabled, network failure) surfaces as a single
//! [`TranscriptUnavailable`](crate::KapitlerError::TranscriptUnavailable)
//! error kind at this boundary.

mod youtube;

pub use youtube::{resolve_video_id, YoutubeTranscripts};

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One unit of recognized speech with its start offset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranscriptSegment {
    /// Start time in seconds.
    pub start_seconds: f64,
    /// The spoken text.
    pub text: String,
}

/// Trait for transcript providers.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Fetch the ordered transcript segments for a video ID.
    async fn fetch_transcript(&self, video_id: &str) -> Result<Vec<TranscriptSegment>>;
}
