//! Validation of the model's chapter list reply.
//!
//! The model is an untrusted text generator: the prompt states an output
//! grammar and timing rules, and nothing downstream may assume they were
//! followed. This module re-checks every rule the prompt promised and only
//! then hands out a [`ChapterList`].

use super::timecode::{display_timecode, parse_timecode};
use super::{Chapter, ChapterList, DEFAULT_MIN_GAP_SECONDS};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// How malformed response lines are handled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Any malformed line fails the whole response (default). Silent
    /// dropping can mask systematic formatting drift.
    #[default]
    Strict,
    /// Malformed lines are dropped but counted, so conversational chatter
    /// around the list does not abort the run.
    Lenient,
}

impl std::str::FromStr for Strictness {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(Strictness::Strict),
            "lenient" => Ok(Strictness::Lenient),
            _ => Err(format!("Unknown strictness mode: {}", s)),
        }
    }
}

impl std::fmt::Display for Strictness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strictness::Strict => write!(f, "strict"),
            Strictness::Lenient => write!(f, "lenient"),
        }
    }
}

/// Rules a chapter list must satisfy, mirroring what the prompt states.
#[derive(Debug, Clone)]
pub struct ValidationRules {
    /// Minimum seconds between consecutive chapters.
    pub min_gap_seconds: u64,
    pub strictness: Strictness,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            min_gap_seconds: DEFAULT_MIN_GAP_SECONDS,
            strictness: Strictness::default(),
        }
    }
}

/// A violation of the chapter list contract.
///
/// Every variant names the offending line or timestamp pair so the failure
/// can be reported verbatim to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Response line {line_number} is not a chapter: {line:?}")]
    UnparsableResponse { line_number: usize, line: String },

    #[error("First chapter must start at 00:00, but starts at {found}")]
    MissingLeadingChapter { found: String },

    #[error("Chapter timestamps must be strictly ascending, but {current} follows {previous}")]
    NonMonotonicTimestamps { previous: String, current: String },

    #[error("Chapters at {previous} and {current} are only {gap}s apart (minimum {minimum}s)")]
    GapTooSmall {
        previous: String,
        current: String,
        gap: u64,
        minimum: u64,
    },

    #[error("Duplicate chapter title: {title:?}")]
    DuplicateTitle { title: String },
}

/// Parse one response line into a chapter.
///
/// Accepts `<timecode> <title>` with an optional leading bullet marker and
/// an optional `-` or `:` between timecode and title. Returns `None` when
/// the line does not fit the grammar.
fn parse_chapter_line(line: &str) -> Option<Chapter> {
    let line = line.trim();
    let line = line
        .strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .unwrap_or(line);

    let (token, rest) = line.split_once(char::is_whitespace)?;
    let start_seconds = parse_timecode(token.trim_end_matches([':', '-']))?;

    let title = rest
        .trim_start()
        .trim_start_matches(['-', ':'])
        .trim();
    if title.is_empty() {
        return None;
    }

    Some(Chapter {
        start_seconds,
        title: title.to_string(),
    })
}

/// Validate the raw model response against the chapter list contract.
///
/// Pure and synchronous: no I/O, no retries. A failed validation returns an
/// error describing the first violation; it never returns a partially fixed
/// list. Retrying with a corrective prompt is the caller's decision.
pub fn validate_response(
    text: &str,
    rules: &ValidationRules,
) -> std::result::Result<ChapterList, ValidationError> {
    let mut chapters = Vec::new();
    let mut dropped_lines = 0usize;

    for (index, raw_line) in text.lines().enumerate() {
        if raw_line.trim().is_empty() {
            continue;
        }

        match parse_chapter_line(raw_line) {
            Some(chapter) => chapters.push(chapter),
            None => match rules.strictness {
                Strictness::Strict => {
                    return Err(ValidationError::UnparsableResponse {
                        line_number: index + 1,
                        line: raw_line.trim().to_string(),
                    });
                }
                Strictness::Lenient => dropped_lines += 1,
            },
        }
    }

    if chapters.is_empty() {
        return Err(ValidationError::UnparsableResponse {
            line_number: 0,
            line: "response contained no chapter lines".to_string(),
        });
    }

    let first = &chapters[0];
    if first.start_seconds != 0 {
        return Err(ValidationError::MissingLeadingChapter {
            found: display_timecode(first.start_seconds),
        });
    }

    for pair in chapters.windows(2) {
        let (previous, current) = (&pair[0], &pair[1]);

        if current.start_seconds <= previous.start_seconds {
            return Err(ValidationError::NonMonotonicTimestamps {
                previous: display_timecode(previous.start_seconds),
                current: display_timecode(current.start_seconds),
            });
        }

        let gap = current.start_seconds - previous.start_seconds;
        if gap < rules.min_gap_seconds {
            return Err(ValidationError::GapTooSmall {
                previous: display_timecode(previous.start_seconds),
                current: display_timecode(current.start_seconds),
                gap,
                minimum: rules.min_gap_seconds,
            });
        }
    }

    let mut seen_titles = HashSet::new();
    for chapter in &chapters {
        let normalized = chapter.title.trim().to_lowercase();
        if !seen_titles.insert(normalized) {
            return Err(ValidationError::DuplicateTitle {
                title: chapter.title.clone(),
            });
        }
    }

    Ok(ChapterList {
        chapters,
        dropped_lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strict() -> ValidationRules {
        ValidationRules::default()
    }

    fn lenient() -> ValidationRules {
        ValidationRules {
            strictness: Strictness::Lenient,
            ..Default::default()
        }
    }

    #[test]
    fn test_accepts_well_formed_list() {
        let list = validate_response("00:00 Intro\n00:15 Topic A\n00:40 Topic B", &strict())
            .expect("valid response");

        assert_eq!(list.chapters.len(), 3);
        assert_eq!(list.chapters[0].start_seconds, 0);
        assert_eq!(list.chapters[1].title, "Topic A");
        assert_eq!(list.chapters[2].start_seconds, 40);
        assert_eq!(list.dropped_lines, 0);
    }

    #[test]
    fn test_rejects_late_first_chapter() {
        let err = validate_response("00:05 Intro\n00:15 Topic A", &strict()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingLeadingChapter {
                found: "00:05".to_string()
            }
        );
    }

    #[test]
    fn test_rejects_small_gap() {
        let err = validate_response("00:00 Intro\n00:03 Topic A", &strict()).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::GapTooSmall {
                gap: 3,
                minimum: 10,
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_equal_timestamps() {
        let err = validate_response("00:00 Intro\n00:00 Topic A", &strict()).unwrap_err();
        assert!(matches!(err, ValidationError::NonMonotonicTimestamps { .. }));
    }

    #[test]
    fn test_rejects_backwards_timestamps() {
        let err = validate_response("00:00 Intro\n01:00 Mid\n00:30 Early", &strict()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NonMonotonicTimestamps {
                previous: "01:00".to_string(),
                current: "00:30".to_string(),
            }
        );
    }

    #[test]
    fn test_rejects_case_folded_duplicate_titles() {
        let err =
            validate_response("00:00 Intro\n00:30 Setup\n01:00 INTRO ", &strict()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::DuplicateTitle {
                title: "INTRO".to_string()
            }
        );
    }

    #[test]
    fn test_strict_mode_fails_on_chatter() {
        let text = "Here are your chapters:\n00:00 Intro\n00:30 Topic A";
        let err = validate_response(text, &strict()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnparsableResponse {
                line_number: 1,
                line: "Here are your chapters:".to_string(),
            }
        );
    }

    #[test]
    fn test_lenient_mode_counts_dropped_lines() {
        let text = "Here are your chapters:\n00:00 Intro\n00:30 Topic A\nHope that helps!";
        let list = validate_response(text, &lenient()).expect("lenient parse");
        assert_eq!(list.chapters.len(), 2);
        assert_eq!(list.dropped_lines, 2);
    }

    #[test]
    fn test_empty_response_fails_in_both_modes() {
        assert!(validate_response("", &strict()).is_err());
        assert!(validate_response("\n  \n", &lenient()).is_err());
    }

    #[test]
    fn test_tolerates_bullets_and_separators() {
        let list = validate_response("- 00:00 Intro\n* 00:30 - Topic A\n01:00: Topic B", &strict())
            .expect("normalized parse");
        assert_eq!(list.chapters[1].title, "Topic A");
        assert_eq!(list.chapters[2].title, "Topic B");
    }

    #[test]
    fn test_hour_long_chapters_parse() {
        let list =
            validate_response("00:00 Intro\n59:50 Almost\n01:10:00 Over an hour", &strict())
                .expect("long video");
        assert_eq!(list.chapters[2].start_seconds, 4200);
    }

    #[test]
    fn test_blank_title_is_malformed() {
        assert!(matches!(
            validate_response("00:00 Intro\n00:30  ", &strict()).unwrap_err(),
            ValidationError::UnparsableResponse { line_number: 2, .. }
        ));
    }

    #[test]
    fn test_custom_min_gap() {
        let rules = ValidationRules {
            min_gap_seconds: 60,
            ..Default::default()
        };
        assert!(matches!(
            validate_response("00:00 Intro\n00:30 Too close", &rules).unwrap_err(),
            ValidationError::GapTooSmall { minimum: 60, .. }
        ));
    }
}
