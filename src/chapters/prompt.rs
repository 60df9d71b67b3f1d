//! Prompt compilation for chapter generation.
//!
//! The compiled prompt is the only enforcement mechanism the pipeline has
//! over the model, so its wording is treated as a contract: the output
//! grammar and the timing rules stated here are exactly what
//! [`validate_response`](super::validate::validate_response) checks.

use super::DEFAULT_MIN_GAP_SECONDS;
use serde::{Deserialize, Serialize};

/// Worked example in the exact output grammar, shown to the model verbatim.
pub const EXAMPLE_CHAPTERS: &str = "00:00 Introduction\n01:30 Core Concepts\n05:45 Closing Thoughts";

/// How the model is asked to choose chapter boundaries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ChapteringPolicy {
    /// Mark every topic shift, count determined by content.
    OpenEnded,
    /// Mark topic shifts, then self-review and drop weak boundaries (default).
    #[default]
    SelfReview,
    /// Produce exactly the configured number of chapters.
    FixedCount,
}

impl std::str::FromStr for ChapteringPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open-ended" | "open" => Ok(ChapteringPolicy::OpenEnded),
            "self-review" | "review" => Ok(ChapteringPolicy::SelfReview),
            "fixed-count" | "fixed" => Ok(ChapteringPolicy::FixedCount),
            _ => Err(format!("Unknown chaptering policy: {}", s)),
        }
    }
}

impl std::fmt::Display for ChapteringPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChapteringPolicy::OpenEnded => write!(f, "open-ended"),
            ChapteringPolicy::SelfReview => write!(f, "self-review"),
            ChapteringPolicy::FixedCount => write!(f, "fixed-count"),
        }
    }
}

/// Options controlling prompt compilation.
#[derive(Debug, Clone)]
pub struct PromptOptions {
    pub policy: ChapteringPolicy,
    /// Exact chapter count to request; `None` leaves it to the content.
    pub target_chapter_count: Option<u32>,
    /// Minimum spacing between consecutive chapters, stated in the rules.
    pub min_gap_seconds: u64,
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self {
            policy: ChapteringPolicy::default(),
            target_chapter_count: None,
            min_gap_seconds: DEFAULT_MIN_GAP_SECONDS,
        }
    }
}

/// Compile the encoded transcript into a single chapter-generation prompt.
///
/// The sections appear in fixed order: instructions, cardinality, timing
/// rules, worked example, transcript body, terminal cue. Identical inputs
/// produce byte-identical prompts.
pub fn compile_prompt(encoded_transcript: &str, opts: &PromptOptions) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "Based on the following transcript, generate a chapter list following these instructions:\n",
    );
    prompt.push_str(
        "1. Identify key topic shifts and assign each a starting timestamp in MM:SS format \
         (or HH:MM:SS if the transcript runs past one hour).\n",
    );
    prompt.push_str(
        "2. Format each chapter as '<timestamp> <chapter title>' (e.g., '00:00 Introduction').\n",
    );

    let mut step = 3;
    if opts.policy == ChapteringPolicy::SelfReview {
        prompt.push_str(&format!(
            "{}. Then, review the chapter list and if any chapter boundary seems misaligned \
             (i.e., if two adjacent chapters do not clearly reflect a topic change), adjust or \
             remove that boundary.\n",
            step
        ));
        step += 1;
    }

    match opts.target_chapter_count {
        Some(count) => {
            prompt.push_str(&format!(
                "{}. Produce exactly {} chapters covering the whole transcript.\n",
                step, count
            ));
        }
        None => {
            prompt.push_str(&format!(
                "{}. Let the content determine how many chapters there are.\n",
                step
            ));
        }
    }

    prompt.push_str("\nThe chapter list must satisfy all of these rules:\n");
    prompt.push_str("- The first chapter starts at exactly 00:00.\n");
    prompt.push_str("- Timestamps are strictly ascending.\n");
    prompt.push_str(&format!(
        "- Consecutive chapters are at least {} seconds apart.\n",
        opts.min_gap_seconds
    ));
    prompt.push_str("- No timestamp and no chapter title appears twice.\n");

    prompt.push_str("\nExample output:\n");
    prompt.push_str(EXAMPLE_CHAPTERS);
    prompt.push('\n');

    prompt.push_str(
        "\nOnly output the final chapter list without any extra commentary.\n\n",
    );

    prompt.push_str("### Transcript:\n");
    prompt.push_str(encoded_transcript);
    prompt.push_str("\nChapters:");

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_sections_in_order() {
        let prompt = compile_prompt("00:00 hello\n", &PromptOptions::default());

        let instructions = prompt.find("topic shifts").unwrap();
        let rules = prompt.find("strictly ascending").unwrap();
        let example = prompt.find(EXAMPLE_CHAPTERS).unwrap();
        let transcript = prompt.find("### Transcript:").unwrap();

        assert!(instructions < rules);
        assert!(rules < example);
        assert!(example < transcript);
        assert!(prompt.ends_with("Chapters:"));
        assert!(prompt.contains("00:00 hello\n"));
    }

    #[test]
    fn test_self_review_step_is_policy_gated() {
        let mut opts = PromptOptions::default();
        assert!(compile_prompt("", &opts).contains("review the chapter list"));

        opts.policy = ChapteringPolicy::OpenEnded;
        assert!(!compile_prompt("", &opts).contains("review the chapter list"));
    }

    #[test]
    fn test_fixed_count_names_the_exact_count() {
        let opts = PromptOptions {
            policy: ChapteringPolicy::FixedCount,
            target_chapter_count: Some(7),
            ..Default::default()
        };
        assert!(compile_prompt("", &opts).contains("exactly 7 chapters"));
    }

    #[test]
    fn test_missing_count_falls_back_to_open_cardinality() {
        let opts = PromptOptions {
            policy: ChapteringPolicy::FixedCount,
            target_chapter_count: None,
            ..Default::default()
        };
        let prompt = compile_prompt("", &opts);
        assert!(prompt.contains("Let the content determine"));
        assert!(!prompt.contains("exactly"));
    }

    #[test]
    fn test_min_gap_is_configurable() {
        let opts = PromptOptions {
            min_gap_seconds: 30,
            ..Default::default()
        };
        assert!(compile_prompt("", &opts).contains("at least 30 seconds apart"));
    }

    #[test]
    fn test_empty_transcript_still_compiles() {
        let prompt = compile_prompt("", &PromptOptions::default());
        assert!(prompt.contains("### Transcript:\n\nChapters:"));
        assert!(!prompt.is_empty());
    }

    #[test]
    fn test_compilation_is_deterministic() {
        let opts = PromptOptions::default();
        assert_eq!(
            compile_prompt("00:00 a\n", &opts),
            compile_prompt("00:00 a\n", &opts)
        );
    }

    #[test]
    fn test_policy_parses_from_cli_spellings() {
        assert_eq!(
            "self-review".parse::<ChapteringPolicy>().unwrap(),
            ChapteringPolicy::SelfReview
        );
        assert_eq!(
            "fixed".parse::<ChapteringPolicy>().unwrap(),
            ChapteringPolicy::FixedCount
        );
        assert!("chaotic".parse::<ChapteringPolicy>().is_err());
    }
}
