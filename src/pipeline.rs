//! Chapter generation pipeline.
//!
//! Coordinates the entire process from URL resolution to validated chapters:
//! resolve -> fetch transcript -> encode -> compile prompt -> generate ->
//! validate. Each step blocks on the previous one; there are no internal
//! retries, and a failed step fails the invocation.

use crate::chapters::{
    compile_prompt, encode_transcript, validate_response, ChapterList, PromptOptions,
    ValidationRules,
};
use crate::config::Settings;
use crate::error::Result;
use crate::llm::{GeminiClient, TextGenerator};
use crate::transcript_source::{resolve_video_id, TranscriptSource, YoutubeTranscripts};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Relative path the compiled prompt is dumped to when enabled.
pub const PROMPT_DUMP_PATH: &str = "kapitler_prompt.txt";

/// Result of one pipeline invocation.
#[derive(Debug, Clone)]
pub enum ChapterOutcome {
    /// The validated chapter list.
    Chapters(ChapterList),
    /// The model's reply as-is, when validation was explicitly bypassed.
    Raw(String),
}

/// The main pipeline for chapter generation.
///
/// Stateless across invocations; concurrent runs must each construct their
/// own pipeline.
pub struct ChapterPipeline {
    settings: Settings,
    source: Arc<dyn TranscriptSource>,
    generator: Arc<dyn TextGenerator>,
    raw_passthrough: bool,
}

impl ChapterPipeline {
    /// Create a pipeline with the default YouTube source and Gemini client.
    pub fn new(settings: Settings) -> Result<Self> {
        settings.validate()?;

        let source = Arc::new(YoutubeTranscripts::new());
        let generator = Arc::new(GeminiClient::new(&settings.gemini)?);

        Ok(Self {
            settings,
            source,
            generator,
            raw_passthrough: false,
        })
    }

    /// Create a pipeline with custom adapters (used by tests and embedders).
    pub fn with_components(
        settings: Settings,
        source: Arc<dyn TranscriptSource>,
        generator: Arc<dyn TextGenerator>,
    ) -> Result<Self> {
        settings.validate()?;

        Ok(Self {
            settings,
            source,
            generator,
            raw_passthrough: false,
        })
    }

    /// Skip validation and return the model's reply untouched.
    ///
    /// Off by default: the prompt's ordering and spacing rules are
    /// aspirational until the validator has checked them.
    pub fn with_raw_passthrough(mut self, raw: bool) -> Self {
        self.raw_passthrough = raw;
        self
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run the pipeline for one video URL.
    #[instrument(skip(self), fields(video_url = %video_url))]
    pub async fn run(&self, video_url: &str) -> Result<ChapterOutcome> {
        let video_id = resolve_video_id(video_url)?;
        info!("Resolved video ID {}", video_id);

        let segments = self.source.fetch_transcript(&video_id).await?;
        info!("Fetched {} transcript segments", segments.len());

        let encoded = encode_transcript(&segments);

        let prompt_options = PromptOptions {
            policy: self.settings.chaptering.policy,
            target_chapter_count: self.settings.chaptering.target_chapter_count,
            min_gap_seconds: self.settings.chaptering.min_gap_seconds,
        };
        let prompt = compile_prompt(&encoded, &prompt_options);

        if self.settings.chaptering.dump_prompt {
            // Best effort: a failed dump must not abort the run.
            match std::fs::write(PROMPT_DUMP_PATH, &prompt) {
                Ok(()) => info!("Wrote compiled prompt to {}", PROMPT_DUMP_PATH),
                Err(e) => warn!("Failed to write {}: {}", PROMPT_DUMP_PATH, e),
            }
        }

        let response = self.generator.generate(&prompt).await?;
        info!("Received {} response bytes", response.len());

        if self.raw_passthrough {
            return Ok(ChapterOutcome::Raw(response));
        }

        let rules = ValidationRules {
            min_gap_seconds: self.settings.chaptering.min_gap_seconds,
            strictness: self.settings.chaptering.strictness,
        };
        let list = validate_response(&response, &rules)?;

        if list.dropped_lines > 0 {
            warn!(
                "Dropped {} unparsable response lines in lenient mode",
                list.dropped_lines
            );
        }
        info!("Validated {} chapters", list.chapters.len());

        Ok(ChapterOutcome::Chapters(list))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chapters::{Strictness, ValidationError};
    use crate::error::KapitlerError;
    use crate::transcript_source::TranscriptSegment;
    use async_trait::async_trait;

    struct FixedSource(Vec<TranscriptSegment>);

    #[async_trait]
    impl TranscriptSource for FixedSource {
        async fn fetch_transcript(&self, _video_id: &str) -> Result<Vec<TranscriptSegment>> {
            Ok(self.0.clone())
        }
    }

    struct FixedGenerator(String);

    #[async_trait]
    impl TextGenerator for FixedGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    fn sample_segments() -> Vec<TranscriptSegment> {
        vec![
            TranscriptSegment {
                start_seconds: 0.0,
                text: "welcome everyone".to_string(),
            },
            TranscriptSegment {
                start_seconds: 42.0,
                text: "let's talk about parsing".to_string(),
            },
        ]
    }

    fn pipeline_with(response: &str, settings: Settings) -> ChapterPipeline {
        ChapterPipeline::with_components(
            settings,
            Arc::new(FixedSource(sample_segments())),
            Arc::new(FixedGenerator(response.to_string())),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_run_returns_validated_chapters() {
        let pipeline = pipeline_with("00:00 Welcome\n00:42 Parsing", Settings::default());

        let outcome = pipeline.run("https://youtu.be/dQw4w9WgXcQ").await.unwrap();
        let ChapterOutcome::Chapters(list) = outcome else {
            panic!("expected chapters");
        };
        assert_eq!(list.chapters.len(), 2);
        assert_eq!(list.chapters[1].start_seconds, 42);
    }

    #[tokio::test]
    async fn test_run_rejects_contract_violations() {
        let pipeline = pipeline_with("00:10 Late Start\n00:42 Parsing", Settings::default());

        let err = pipeline.run("https://youtu.be/dQw4w9WgXcQ").await.unwrap_err();
        assert!(matches!(
            err,
            KapitlerError::Validation(ValidationError::MissingLeadingChapter { .. })
        ));
    }

    #[tokio::test]
    async fn test_raw_passthrough_skips_validation() {
        let pipeline = pipeline_with("anything goes here", Settings::default())
            .with_raw_passthrough(true);

        let outcome = pipeline.run("https://youtu.be/dQw4w9WgXcQ").await.unwrap();
        let ChapterOutcome::Raw(text) = outcome else {
            panic!("expected raw outcome");
        };
        assert_eq!(text, "anything goes here");
    }

    #[tokio::test]
    async fn test_lenient_mode_flows_through() {
        let mut settings = Settings::default();
        settings.chaptering.strictness = Strictness::Lenient;
        let pipeline = pipeline_with("Sure! Here you go:\n00:00 Welcome\n00:42 Parsing", settings);

        let outcome = pipeline.run("https://youtu.be/dQw4w9WgXcQ").await.unwrap();
        let ChapterOutcome::Chapters(list) = outcome else {
            panic!("expected chapters");
        };
        assert_eq!(list.chapters.len(), 2);
        assert_eq!(list.dropped_lines, 1);
    }

    #[tokio::test]
    async fn test_empty_transcript_does_not_crash() {
        let pipeline = ChapterPipeline::with_components(
            Settings::default(),
            Arc::new(FixedSource(Vec::new())),
            Arc::new(FixedGenerator("00:00 Whole Video".to_string())),
        )
        .unwrap();

        let outcome = pipeline.run("https://youtu.be/dQw4w9WgXcQ").await.unwrap();
        let ChapterOutcome::Chapters(list) = outcome else {
            panic!("expected chapters");
        };
        assert_eq!(list.chapters.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_url_fails_before_any_network_step() {
        let pipeline = pipeline_with("00:00 Unused", Settings::default());
        let err = pipeline.run("https://example.com/video").await.unwrap_err();
        assert!(matches!(err, KapitlerError::InvalidUrl(_)));
    }
}
