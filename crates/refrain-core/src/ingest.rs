//! Markdown ingestion
//!
//! Turns loosely formatted text (pasted lyrics, a markdown list of
//! affirmations) into the ordered lines of a collection.
//!
//! Each input line is trimmed and classified:
//! - blank lines and `#` headers are dropped
//! - a leading `-`, `*` or `+` bullet is removed
//! - a leading `1.`-style list number is removed
//! - whatever is left must be longer than [`MIN_LINE_CHARS`] characters
//!
//! Inline markup is kept verbatim. Duplicates are kept.

/// Lines of this many characters or fewer are treated as noise
pub const MIN_LINE_CHARS: usize = 10;

/// Kind tag used when none is given
pub const DEFAULT_KIND: &str = "affirmations";

/// Bullet markers stripped from the start of a line
const BULLETS: [char; 3] = ['-', '*', '+'];

/// A list number's `.` must appear within this many leading characters
const NUMBER_MARKER_WINDOW: usize = 5;

/// Extract collection lines from markdown text
pub fn parse_markdown(text: &str) -> Vec<String> {
    text.trim()
        .split('\n')
        .filter_map(classify_line)
        .collect()
}

/// Description stored on collections created by ingestion
pub fn markdown_description(kind: &str) -> String {
    format!("Added via markdown - {}", kind)
}

fn classify_line(raw: &str) -> Option<String> {
    let line = raw.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let content = strip_list_marker(line);
    if content.chars().count() > MIN_LINE_CHARS {
        Some(content.to_string())
    } else {
        None
    }
}

fn strip_list_marker(line: &str) -> &str {
    if let Some(rest) = line.strip_prefix(BULLETS) {
        return rest.trim();
    }

    let starts_with_digit = line.chars().next().is_some_and(|c| c.is_ascii_digit());
    let has_number_dot = line.chars().take(NUMBER_MARKER_WINDOW).any(|c| c == '.');
    if starts_with_digit && has_number_dot {
        if let Some((_, rest)) = line.split_once('.') {
            return rest.trim();
        }
    }

    line
}
