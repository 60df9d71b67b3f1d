//! Generate command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{Settings, DEFAULT_VIDEO_URL};
use crate::pipeline::{ChapterOutcome, ChapterPipeline};
use anyhow::Result;

/// Command-line overrides for one generate invocation.
#[derive(Debug, Default)]
pub struct GenerateArgs {
    pub video_url: Option<String>,
    pub chapters: Option<u32>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub min_gap: Option<u64>,
    pub policy: Option<String>,
    pub lenient: bool,
    pub raw: bool,
    pub dump_prompt: bool,
    pub model: Option<String>,
}

/// Run the generate command.
pub async fn run_generate(args: GenerateArgs, mut settings: Settings) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Generate) {
        Output::error(&format!("{}", e));
        Output::info("Run 'kapitler doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    // Fold CLI overrides into the settings for this invocation.
    if let Some(chapters) = args.chapters {
        settings.chaptering.target_chapter_count = Some(chapters);
    }
    if let Some(temperature) = args.temperature {
        settings.gemini.temperature = temperature;
    }
    if let Some(max_tokens) = args.max_tokens {
        settings.gemini.max_output_tokens = max_tokens;
    }
    if let Some(min_gap) = args.min_gap {
        settings.chaptering.min_gap_seconds = min_gap;
    }
    if let Some(policy) = &args.policy {
        settings.chaptering.policy = policy
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))?;
    }
    if args.lenient {
        settings.chaptering.strictness = crate::chapters::Strictness::Lenient;
    }
    if args.dump_prompt {
        settings.chaptering.dump_prompt = true;
    }
    if let Some(model) = args.model {
        settings.gemini.model = model;
    }

    let video_url = args
        .video_url
        .as_deref()
        .unwrap_or(DEFAULT_VIDEO_URL)
        .to_string();
    if args.video_url.is_none() {
        Output::info(&format!("No URL given, using sample video {}", video_url));
    }

    let pipeline = ChapterPipeline::new(settings)?.with_raw_passthrough(args.raw);

    let spinner = Output::spinner("Generating chapters...");

    match pipeline.run(&video_url).await {
        Ok(ChapterOutcome::Chapters(list)) => {
            spinner.finish_and_clear();

            Output::header("Generated Chapters");
            println!();
            for chapter in &list.chapters {
                Output::chapter(chapter);
            }
            println!();

            if list.dropped_lines > 0 {
                Output::warning(&format!(
                    "Dropped {} unparsable line(s) from the model's reply.",
                    list.dropped_lines
                ));
            }
            Output::success(&format!("{} chapters generated.", list.chapters.len()));
        }
        Ok(ChapterOutcome::Raw(text)) => {
            spinner.finish_and_clear();

            Output::header("Raw Model Reply (validation bypassed)");
            println!("\n{}\n", text);
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to generate chapters: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
