//! De-obfuscation of written-out address forms.
//!
//! `john [at] gmail [dot] com`, `john(at)gmail(dot)com` and
//! `john at gmail dot com` all rewrite to `john@gmail.com`. Substitutions run
//! in a fixed order: bracketed markers first, bare words after them, so that a
//! half-bracketed marker is consumed by its bracketed rule before the word rule
//! can see it.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

macro_rules! marker {
    ($pattern:expr) => {
        Lazy::new(|| Regex::new($pattern).expect("Obfuscation marker regex pattern is valid and should compile"))
    };
}

static AT_BRACKET: Lazy<Regex> = marker!(r"(?i)\s*\[\s*at\s*\]\s*");
static AT_PAREN: Lazy<Regex> = marker!(r"(?i)\s*\(\s*at\s*\)\s*");
static AT_BRACE: Lazy<Regex> = marker!(r"(?i)\s*\{\s*at\s*\}\s*");
static AT_ANGLE: Lazy<Regex> = marker!(r"(?i)\s*<\s*at\s*>\s*");
static AT_WORD: Lazy<Regex> = marker!(r"(?i)\s+at\s+");
static AT_SPACED: Lazy<Regex> = marker!(r"\s*@\s*");

static DOT_BRACKET: Lazy<Regex> = marker!(r"(?i)\s*\[\s*dot\s*\]\s*");
static DOT_PAREN: Lazy<Regex> = marker!(r"(?i)\s*\(\s*dot\s*\)\s*");
static DOT_BRACE: Lazy<Regex> = marker!(r"(?i)\s*\{\s*dot\s*\}\s*");
static DOT_ANGLE: Lazy<Regex> = marker!(r"(?i)\s*<\s*dot\s*>\s*");
static DOT_WORD: Lazy<Regex> = marker!(r"(?i)\s+dot\s+");

static UNDERSCORE_BRACKET: Lazy<Regex> = marker!(r"(?i)\s*\[\s*underscore\s*\]\s*");
static UNDERSCORE_PAREN: Lazy<Regex> = marker!(r"(?i)\s*\(\s*underscore\s*\)\s*");

static DASH_BRACKET: Lazy<Regex> = marker!(r"(?i)\s*\[\s*dash\s*\]\s*");
static DASH_PAREN: Lazy<Regex> = marker!(r"(?i)\s*\(\s*dash\s*\)\s*");

#[inline]
fn chain_replacements<'a>(mut text: Cow<'a, str>, replacements: &[(&Regex, &str)]) -> Cow<'a, str> {
    for (pattern, replacement) in replacements {
        if pattern.is_match(&text) {
            text = Cow::Owned(pattern.replace_all(&text, *replacement).into_owned());
        }
    }
    text
}

/// Stateless rewriter for obfuscated addresses.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Rewrite every supported marker to its literal character.
    ///
    /// Pure: the same input always yields the same output, and a second pass
    /// over the output changes nothing.
    pub fn normalize<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let replacements: [(&Regex, &str); 15] = [
            (&AT_BRACKET, "@"),
            (&AT_PAREN, "@"),
            (&AT_BRACE, "@"),
            (&AT_ANGLE, "@"),
            (&AT_WORD, "@"),
            (&AT_SPACED, "@"),
            (&DOT_BRACKET, "."),
            (&DOT_PAREN, "."),
            (&DOT_BRACE, "."),
            (&DOT_ANGLE, "."),
            (&DOT_WORD, "."),
            (&UNDERSCORE_BRACKET, "_"),
            (&UNDERSCORE_PAREN, "_"),
            (&DASH_BRACKET, "-"),
            (&DASH_PAREN, "-"),
        ];

        chain_replacements(Cow::Borrowed(text), &replacements)
    }
}

/// Convenience wrapper over [`Normalizer::normalize`].
pub fn normalize(text: &str) -> Cow<'_, str> {
    Normalizer.normalize(text)
}
