//! Transcript encoding for the chapter prompt.

use super::timecode::format_timecode;
use crate::transcript_source::TranscriptSegment;

/// Encode transcript segments as one timestamped line per segment.
///
/// Each line is `"<timecode> <text>\n"` in input order. The timecode format
/// is fixed for the whole transcript: `HH:MM:SS` if any segment starts at or
/// past one hour, `MM:SS` otherwise. An empty transcript encodes to an empty
/// string so prompt compilation still succeeds downstream.
pub fn encode_transcript(segments: &[TranscriptSegment]) -> String {
    let hours_field = segments.iter().any(|s| s.start_seconds >= 3600.0);

    let mut output = String::new();
    for segment in segments {
        let seconds = segment.start_seconds.max(0.0) as u64;
        output.push_str(&format_timecode(seconds, hours_field));
        output.push(' ');
        // Caption tracks sometimes carry line breaks inside a segment;
        // the prompt grammar is one segment per line.
        output.push_str(&segment.text.replace('\n', " "));
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(start_seconds: f64, text: &str) -> TranscriptSegment {
        TranscriptSegment {
            start_seconds,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_encode_single_segment_at_zero() {
        let encoded = encode_transcript(&[segment(0.0, "welcome to the video")]);
        assert_eq!(encoded, "00:00 welcome to the video\n");
    }

    #[test]
    fn test_encode_past_one_hour() {
        let encoded = encode_transcript(&[segment(3661.0, "one hour in")]);
        assert_eq!(encoded, "01:01:01 one hour in\n");
    }

    #[test]
    fn test_format_is_fixed_per_transcript() {
        let encoded = encode_transcript(&[
            segment(12.0, "early"),
            segment(4000.0, "late"),
        ]);
        assert_eq!(encoded, "00:00:12 early\n01:06:40 late\n");
    }

    #[test]
    fn test_encode_empty_transcript() {
        assert_eq!(encode_transcript(&[]), "");
    }

    #[test]
    fn test_encode_preserves_order_and_truncates_subseconds() {
        let encoded = encode_transcript(&[
            segment(0.9, "first"),
            segment(65.4, "second"),
        ]);
        assert_eq!(encoded, "00:00 first\n01:05 second\n");
    }

    #[test]
    fn test_encode_flattens_line_breaks() {
        let encoded = encode_transcript(&[segment(5.0, "two\nlines")]);
        assert_eq!(encoded, "00:05 two lines\n");
    }

    #[test]
    fn test_encode_is_deterministic() {
        let segments = vec![segment(0.0, "a"), segment(30.0, "b")];
        assert_eq!(encode_transcript(&segments), encode_transcript(&segments));
    }
}
