//! Final text clean-up applied to whatever strategy won.

use once_cell::sync::Lazy;
use regex::Regex;

static INLINE_WHITESPACE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[ \t\f\v\r\xa0\u{2000}-\u{200b}\u{2028}\u{2029}\u{3000}]+")
        .expect("Inline whitespace regex pattern is valid and should compile")
});

/// Collapse whitespace runs inside each line to one space, trim lines, and
/// drop the blank ones. Line order is preserved.
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    text.lines()
        .map(|line| INLINE_WHITESPACE.replace_all(line, " "))
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
