//! YouTube transcript source.
//!
//! Caption tracks are fetched with yt-dlp in json3 format, the same
//! timedtext JSON the YouTube player consumes.

use super::{TranscriptSegment, TranscriptSource};
use crate::error::{KapitlerError, Result};
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;
use tracing::debug;

/// Extract the video ID from a YouTube URL.
///
/// Recognizes the query-parameter form (`watch?v=ID`) and the short-link
/// form (`youtu.be/ID`); the ID is everything between the delimiter and the
/// next `&`, `?`, or the end of the string. Anything else is rejected.
pub fn resolve_video_id(url: &str) -> Result<String> {
    static VIDEO_ID_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = VIDEO_ID_REGEX
        .get_or_init(|| Regex::new(r"(?:v=|youtu\.be/)([^&?]+)").expect("Invalid regex"));

    regex
        .captures(url.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| KapitlerError::InvalidUrl(url.to_string()))
}

/// YouTube caption track fetcher backed by yt-dlp.
pub struct YoutubeTranscripts {
    /// Subtitle languages passed to yt-dlp, in preference order.
    languages: String,
}

impl YoutubeTranscripts {
    pub fn new() -> Self {
        Self {
            languages: "en.*,en".to_string(),
        }
    }

    /// Use a different subtitle language preference (yt-dlp `--sub-langs` syntax).
    pub fn with_languages(languages: &str) -> Self {
        Self {
            languages: languages.to_string(),
        }
    }

    async fn download_caption_track(&self, video_id: &str) -> Result<String> {
        let url = format!("https://www.youtube.com/watch?v={}", video_id);
        let dir = tempfile::tempdir()?;
        let template = format!("{}/captions.%(ext)s", dir.path().display());

        let output = tokio::process::Command::new("yt-dlp")
            .args([
                "--skip-download",
                "--write-subs",
                "--write-auto-subs",
                "--sub-langs",
                &self.languages,
                "--sub-format",
                "json3",
                "--no-warnings",
                "--output",
                &template,
                &url,
            ])
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    KapitlerError::ToolNotFound("yt-dlp".to_string())
                } else {
                    KapitlerError::TranscriptUnavailable(format!("Failed to run yt-dlp: {}", e))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(KapitlerError::TranscriptUnavailable(format!(
                "Video {} not found or unavailable: {}",
                video_id,
                stderr.trim()
            )));
        }

        // yt-dlp writes captions.<lang>.json3; take the first track it chose.
        let track_path = std::fs::read_dir(dir.path())?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .find(|path| path.extension().is_some_and(|ext| ext == "json3"))
            .ok_or_else(|| {
                KapitlerError::TranscriptUnavailable(format!(
                    "Video {} has no caption track (transcripts may be disabled)",
                    video_id
                ))
            })?;

        debug!("Reading caption track from {}", track_path.display());
        Ok(std::fs::read_to_string(&track_path)?)
    }
}

impl Default for YoutubeTranscripts {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranscriptSource for YoutubeTranscripts {
    async fn fetch_transcript(&self, video_id: &str) -> Result<Vec<TranscriptSegment>> {
        let content = self.download_caption_track(video_id).await?;
        let segments = parse_json3(&content)?;

        if segments.is_empty() {
            return Err(KapitlerError::TranscriptUnavailable(format!(
                "Caption track for video {} contained no speech segments",
                video_id
            )));
        }

        Ok(segments)
    }
}

#[derive(Debug, Deserialize)]
struct Json3Track {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
struct Json3Event {
    #[serde(rename = "tStartMs", default)]
    t_start_ms: u64,
    segs: Option<Vec<Json3Seg>>,
}

#[derive(Debug, Deserialize)]
struct Json3Seg {
    #[serde(default)]
    utf8: String,
}

/// Parse a json3 caption track into transcript segments.
///
/// Events without text segments (window styling, cue boundaries) are
/// skipped, as are segments that only carry line breaks.
fn parse_json3(content: &str) -> Result<Vec<TranscriptSegment>> {
    let track: Json3Track = serde_json::from_str(content).map_err(|e| {
        KapitlerError::TranscriptUnavailable(format!("Malformed caption track: {}", e))
    })?;

    let mut segments = Vec::new();
    for event in track.events {
        let Some(segs) = event.segs else { continue };

        let text = segs
            .iter()
            .map(|seg| seg.utf8.as_str())
            .collect::<String>()
            .trim()
            .to_string();

        if text.is_empty() {
            continue;
        }

        segments.push(TranscriptSegment {
            start_seconds: event.t_start_ms as f64 / 1000.0,
            text,
        });
    }

    Ok(segments)
}
