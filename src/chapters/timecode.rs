//! Timecode parsing and formatting.
//!
//! This is the single home of the `MM:SS` / `HH:MM:SS` grammar. The
//! transcript encoder, the prompt compiler's worked example, and the
//! response validator all go through these functions, so the format the
//! prompt promises and the format the validator accepts cannot drift apart.

/// Format whole seconds as a timecode.
///
/// When `hours_field` is set the `HH:MM:SS` form is used even below one
/// hour, so a single transcript or chapter list never mixes both forms.
pub fn format_timecode(total_seconds: u64, hours_field: bool) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours_field || hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// Format whole seconds for display, switching to `HH:MM:SS` past one hour.
pub fn display_timecode(total_seconds: u64) -> String {
    format_timecode(total_seconds, total_seconds >= 3600)
}

/// Parse a `MM:SS` or `HH:MM:SS` token into whole seconds.
///
/// Returns `None` for anything outside the grammar: wrong field count,
/// non-digit characters, one-digit trailing fields, or out-of-range
/// minutes/seconds.
pub fn parse_timecode(token: &str) -> Option<u64> {
    let parts: Vec<&str> = token.split(':').collect();

    let (hours, minutes, seconds) = match parts.as_slice() {
        [m, s] => (None, *m, *s),
        [h, m, s] => (Some(*h), *m, *s),
        _ => return None,
    };

    // Trailing fields are always zero-padded to two digits; the leading
    // field may be one or two digits ("0:45" and "00:45" both appear in
    // the wild).
    let leading = hours.unwrap_or(minutes);
    if leading.is_empty() || leading.len() > 2 || !leading.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let parse_field = |field: &str| -> Option<u64> {
        if field.len() == 2 && field.chars().all(|c| c.is_ascii_digit()) {
            field.parse().ok()
        } else {
            None
        }
    };

    match hours {
        Some(h) => {
            let h: u64 = h.parse().ok()?;
            let m = parse_field(minutes)?;
            let s = parse_field(seconds)?;
            if m >= 60 || s >= 60 {
                return None;
            }
            Some(h * 3600 + m * 60 + s)
        }
        None => {
            let m: u64 = minutes.parse().ok()?;
            let s = parse_field(seconds)?;
            if s >= 60 {
                return None;
            }
            Some(m * 60 + s)
        }
    }
}
