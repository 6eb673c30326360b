//! Reconstruct text lines from unordered glyph boxes.
//!
//! Glyphs are swept top-to-bottom, left-to-right and attached to the open
//! line whose running vertical center is closest, within a tolerance
//! derived from the page's median glyph height.

use std::cmp::Ordering;

use crate::geometry::Rect;
use crate::text::{CharItem, normalize_whitespace};

/// Glyph height assumed when a page has no glyph with positive height.
const DEFAULT_CHAR_HEIGHT: f64 = 12.0;
/// Line tolerance as a fraction of the median glyph height.
const LINE_GAP_FACTOR: f64 = 0.9;
const MIN_LINE_GAP: f64 = 6.0;
const MAX_LINE_GAP: f64 = 20.0;
/// Word gap as a fraction of the smaller neighbouring glyph height.
const SPACE_GAP_FACTOR: f64 = 0.35;
const MIN_SPACE_GAP: f64 = 1.5;

/// A reconstructed row of text on a page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextLine {
    /// Whitespace-normalized line text. Never empty.
    pub text: String,
    /// Union of the member glyph boxes, truncated to whole pixels.
    pub bounds: Rect,
}

/// Glyphs collected for one line during the sweep.
///
/// The center is a running mean, so it drifts as glyphs join and later
/// glyphs are matched against the drifted value.
struct LineAccumulator<'a> {
    members: Vec<&'a CharItem>,
    sum_center_y: f64,
}

impl<'a> LineAccumulator<'a> {
    fn new(first: &'a CharItem) -> Self {
        Self {
            members: vec![first],
            sum_center_y: first.center_y(),
        }
    }

    fn center_y(&self) -> f64 {
        self.sum_center_y / self.members.len() as f64
    }

    fn push(&mut self, ch: &'a CharItem) {
        self.sum_center_y += ch.center_y();
        self.members.push(ch);
    }

    fn finish(mut self) -> Option<TextLine> {
        self.members
            .sort_by(|a, b| a.bounds.x.total_cmp(&b.bounds.x));

        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        let mut raw = String::new();
        let mut previous: Option<&CharItem> = None;

        for &ch in &self.members {
            min_x = min_x.min(ch.bounds.x);
            min_y = min_y.min(ch.bounds.y);
            max_x = max_x.max(ch.bounds.right());
            max_y = max_y.max(ch.bounds.bottom());

            if let Some(prev) = previous {
                if needs_space(prev, ch) {
                    raw.push(' ');
                }
            }
            raw.push_str(&ch.text);
            previous = Some(ch);
        }

        let text = normalize_whitespace(&raw);
        if text.is_empty() {
            return None;
        }

        Some(TextLine {
            text,
            bounds: Rect::new(
                min_x.trunc(),
                min_y.trunc(),
                (max_x - min_x).trunc(),
                (max_y - min_y).trunc(),
            ),
        })
    }
}

/// Whether a word break belongs between two horizontally adjacent glyphs.
fn needs_space(prev: &CharItem, next: &CharItem) -> bool {
    let gap = next.bounds.x - prev.bounds.right();
    let threshold = MIN_SPACE_GAP.max(prev.bounds.height.min(next.bounds.height) * SPACE_GAP_FACTOR);
    gap > threshold && !prev.is_blank() && !next.is_blank()
}

/// Vertical tolerance for putting two glyphs on the same line.
///
/// `round(median_height * 0.9)` clamped to `[6, 20]`, where the median is
/// the upper median of positive glyph heights.
pub fn line_gap(chars: &[CharItem]) -> f64 {
    let mut heights: Vec<f64> = chars
        .iter()
        .map(|c| c.bounds.height)
        .filter(|h| *h > 0.0)
        .collect();
    heights.sort_by(f64::total_cmp);
    let median = heights
        .get(heights.len() / 2)
        .copied()
        .unwrap_or(DEFAULT_CHAR_HEIGHT);
    (median * LINE_GAP_FACTOR)
        .round_ties_even()
        .clamp(MIN_LINE_GAP, MAX_LINE_GAP)
}

/// Scan order: top, then left, then size and text so that the result does
/// not depend on the order glyphs were reported in.
fn scan_order(a: &CharItem, b: &CharItem) -> Ordering {
    a.bounds
        .y
        .total_cmp(&b.bounds.y)
        .then(a.bounds.x.total_cmp(&b.bounds.x))
        .then(a.bounds.height.total_cmp(&b.bounds.height))
        .then(a.bounds.width.total_cmp(&b.bounds.width))
        .then_with(|| a.text.cmp(&b.text))
}

/// Group glyphs into text lines.
///
/// Lines come back in the order they were opened during the sweep, which
/// is roughly top-to-bottom. Lines whose text is blank are dropped.
///
/// A glyph equally close to two open lines joins the one opened first.
pub fn build_text_lines(chars: &[CharItem]) -> Vec<TextLine> {
    if chars.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<&CharItem> = chars.iter().collect();
    sorted.sort_by(|a, b| scan_order(a, b));
    let gap = line_gap(chars);

    let mut lines: Vec<LineAccumulator<'_>> = Vec::new();
    for ch in sorted {
        let center_y = ch.center_y();

        let mut best: Option<(usize, f64)> = None;
        for (idx, line) in lines.iter().enumerate() {
            let delta = (line.center_y() - center_y).abs();
            if delta <= gap && best.is_none_or(|(_, best_delta)| delta < best_delta) {
                best = Some((idx, delta));
            }
        }

        match best {
            Some((idx, _)) => lines[idx].push(ch),
            None => lines.push(LineAccumulator::new(ch)),
        }
    }

    let built: Vec<TextLine> = lines
        .into_iter()
        .filter_map(LineAccumulator::finish)
        .collect();
    tracing::trace!(chars = chars.len(), lines = built.len(), gap, "built text lines");
    built
}
