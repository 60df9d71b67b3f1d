//! Chapter generation core: transcript encoding, prompt compilation, and
//! response validation.
//!
//! The three pieces share one timecode grammar and one set of timing
//! constants, so what the prompt promises the model and what the validator
//! enforces are versioned together.

mod encode;
mod prompt;
mod timecode;
mod validate;

pub use encode::encode_transcript;
pub use prompt::{compile_prompt, ChapteringPolicy, PromptOptions, EXAMPLE_CHAPTERS};
pub use timecode::{display_timecode, format_timecode, parse_timecode};
pub use validate::{validate_response, Strictness, ValidationError, ValidationRules};

use serde::{Deserialize, Serialize};

/// Minimum spacing between consecutive chapters, in seconds.
pub const DEFAULT_MIN_GAP_SECONDS: u64 = 10;

/// A named point in the video where the subject matter changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chapter {
    /// Start offset in whole seconds.
    pub start_seconds: u64,
    /// Chapter title, non-empty.
    pub title: String,
}

impl std::fmt::Display for Chapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", display_timecode(self.start_seconds), self.title)
    }
}

/// An ordered, validated chapter list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChapterList {
    pub chapters: Vec<Chapter>,
    /// Lines the lenient parser discarded; always zero in strict mode.
    pub dropped_lines: usize,
}

impl ChapterList {
    /// Render the list back into the `<timecode> <title>` grammar.
    pub fn to_text(&self) -> String {
        let mut output = String::new();
        for chapter in &self.chapters {
            output.push_str(&chapter.to_string());
            output.push('\n');
        }
        output
    }
}
