//! Name sanitization
//!
//! Turns untrusted, user-authored strings (note titles, folder names) into
//! safe filesystem path segments. Sanitization is pure and deterministic,
//! and `sanitize(sanitize(x)) == sanitize(x)` for every rule set.

use unic_emoji_char::{is_emoji, is_emoji_presentation};
use unicode_segmentation::UnicodeSegmentation;

/// Characters no supported filesystem accepts in a path segment
pub const FILESYSTEM_ILLEGAL: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Characters that wiki-style markup treats as link or heading syntax
pub const MARKUP_SYNTAX: &[char] = &['[', ']', '#', '^'];

/// Default cap on a sanitized name, in bytes
pub const DEFAULT_MAX_NAME_BYTES: usize = 200;

/// Rule set applied by [`sanitize`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizeRules {
    /// Characters stripped on top of [`FILESYSTEM_ILLEGAL`]
    pub extra_illegal: Vec<char>,

    /// Drop emoji grapheme clusters
    pub strip_emoji: bool,

    /// Maximum length of the result in bytes
    pub max_bytes: usize,
}

impl SanitizeRules {
    /// Add characters to the blacklist
    pub fn with_extra_illegal(mut self, chars: &[char]) -> Self {
        for c in chars {
            if !self.extra_illegal.contains(c) {
                self.extra_illegal.push(*c);
            }
        }
        self
    }

    /// Enable or disable emoji stripping
    pub fn with_strip_emoji(mut self, strip_emoji: bool) -> Self {
        self.strip_emoji = strip_emoji;
        self
    }

    /// Set the byte cap
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    fn is_illegal(&self, c: char) -> bool {
        FILESYSTEM_ILLEGAL.contains(&c)
            || self.extra_illegal.contains(&c)
            || c.is_control()
            || matches!(c, '\u{2028}' | '\u{2029}')
    }
}

impl Default for SanitizeRules {
    fn default() -> Self {
        Self {
            extra_illegal: Vec::new(),
            strip_emoji: true,
            max_bytes: DEFAULT_MAX_NAME_BYTES,
        }
    }
}

/// Sanitize `raw` into a single path segment
///
/// Strips filesystem-illegal characters, control and line-break
/// characters, the rule set's extra blacklist and (optionally) emoji.
/// Surrounding whitespace and dots are trimmed, so `.` and `..` come out
/// empty. The result may be empty; callers substitute a fallback name.
///
/// # Examples
///
/// ```
/// use folio::core::sanitize::{sanitize, SanitizeRules};
///
/// let rules = SanitizeRules::default();
/// assert_eq!(sanitize("Recipe/Cake?", &rules), "RecipeCake");
/// assert_eq!(sanitize("..", &rules), "");
/// ```
pub fn sanitize(raw: &str, rules: &SanitizeRules) -> String {
    let mut out = String::with_capacity(raw.len());

    for grapheme in raw.graphemes(true) {
        if rules.strip_emoji && is_emoji_grapheme(grapheme) {
            continue;
        }
        out.extend(grapheme.chars().filter(|c| !rules.is_illegal(*c)));
    }

    let trimmed = trim_segment(&out);
    if trimmed.len() <= rules.max_bytes {
        return trimmed.to_string();
    }

    let mut truncated = String::with_capacity(rules.max_bytes);
    for grapheme in trimmed.graphemes(true) {
        if truncated.len() + grapheme.len() > rules.max_bytes {
            break;
        }
        truncated.push_str(grapheme);
    }
    trim_segment(&truncated).to_string()
}

/// Sanitize `raw`, substituting `fallback` when nothing survives
///
/// The fallback goes through the same rules; if it too sanitizes to
/// nothing, `"untitled"` is used.
pub fn sanitize_or(raw: &str, fallback: &str, rules: &SanitizeRules) -> String {
    let name = sanitize(raw, rules);
    if !name.is_empty() {
        return name;
    }
    let fallback = sanitize(fallback, rules);
    if fallback.is_empty() {
        "untitled".to_string()
    } else {
        fallback
    }
}

fn is_emoji_grapheme(grapheme: &str) -> bool {
    grapheme
        .chars()
        .next()
        .map(|base| is_emoji(base) && is_emoji_presentation(base))
        .unwrap_or(false)
}

fn trim_segment(s: &str) -> &str {
    s.trim_matches(|c: char| c == '.' || c.is_whitespace())
}
