use std::collections::HashSet;

use crate::geometry::{NativeBounds, Rect};

/// A single rendered glyph in pixel space.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharItem {
    /// The glyph text, usually one character. May be blank.
    pub text: String,
    /// Bounding box on the rendered page.
    pub bounds: Rect,
}

impl CharItem {
    pub fn new(text: impl Into<String>, bounds: Rect) -> Self {
        Self {
            text: text.into(),
            bounds,
        }
    }

    /// Vertical center of the glyph box.
    pub fn center_y(&self) -> f64 {
        self.bounds.y + self.bounds.height / 2.0
    }

    /// Whether the glyph renders as whitespace.
    pub fn is_blank(&self) -> bool {
        !self.text.is_empty() && self.text.chars().all(char::is_whitespace)
    }
}

/// A glyph as reported by the document backend, in native units.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NativeChar {
    pub text: String,
    pub bounds: NativeBounds,
}

impl NativeChar {
    pub fn new(text: impl Into<String>, bounds: NativeBounds) -> Self {
        Self {
            text: text.into(),
            bounds,
        }
    }
}

/// Collapse every whitespace run to a single space and trim both ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keep at most `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

/// Lowercase ASCII alphanumeric words of three or more characters.
///
/// Anything outside `[a-z0-9]` after lowercasing acts as a separator.
pub fn score_tokens(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                ' '
            }
        })
        .collect();
    cleaned
        .split_whitespace()
        .filter(|token| token.len() >= 3)
        .map(str::to_string)
        .collect()
}

/// Distinct [`score_tokens`] of `text`.
pub fn unique_score_tokens(text: &str) -> HashSet<String> {
    score_tokens(text).into_iter().collect()
}
