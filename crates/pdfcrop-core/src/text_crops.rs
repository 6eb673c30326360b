//! Multi-line text block candidates.
//!
//! Every run of consecutive lines (up to `max_text_lines_per_block`) is a
//! potential block. Blocks are scored by lexical diversity and a capped
//! length bonus, then de-duplicated by IoU. A page with text but no usable
//! block falls back to its longest single line.

use std::collections::HashSet;

use crate::geometry::{PageSize, Rect, clamp_bounds, ensure_minimum_size};
use crate::lines::TextLine;
use crate::options::CropOptions;
use crate::suppress::suppress_overlaps;
use crate::text::{normalize_whitespace, score_tokens, truncate_chars};

/// Points per distinct scoring token.
const TOKEN_WEIGHT: f64 = 2.0;
/// Points per character of combined text, up to `LENGTH_BONUS_CAP` characters.
const LENGTH_WEIGHT: f64 = 0.07;
const LENGTH_BONUS_CAP: usize = 200;
/// Smallest fallback crop height in pixels.
const FALLBACK_MIN_HEIGHT: f64 = 56.0;
/// Fallback crop height as a fraction of `min_text_block_height`.
const FALLBACK_HEIGHT_FACTOR: f64 = 0.7;
/// Fallback score per character of the chosen line.
const FALLBACK_LENGTH_WEIGHT: f64 = 0.2;

/// A text region worth cropping.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextCropCandidate {
    /// Padded, clamped block bounds.
    pub bounds: Rect,
    /// Block text, capped at `max_context_length` characters.
    pub context_text: String,
    /// Relevance heuristic; higher is better.
    pub score: f64,
}

/// Score a block from its distinct tokens and combined text length.
pub fn block_score(unique_tokens: usize, char_len: usize) -> f64 {
    unique_tokens as f64 * TOKEN_WEIGHT + char_len.min(LENGTH_BONUS_CAP) as f64 * LENGTH_WEIGHT
}

/// Every line window passing the size, length and area filters, in sweep
/// order (start index ascending, then window length ascending).
fn raw_candidates(lines: &[TextLine], page: PageSize, options: &CropOptions) -> Vec<TextCropCandidate> {
    let page_area = page.area();
    let min_area = page_area * options.min_text_block_area_ratio;
    let max_area = page_area * options.max_text_block_area_ratio;
    let mut candidates = Vec::new();

    for start in 0..lines.len() {
        let end = lines.len().min(start + options.max_text_lines_per_block);
        let mut combined = String::new();
        let mut tokens: HashSet<String> = HashSet::new();
        let mut union: Option<Rect> = None;

        for (offset, line) in lines[start..end].iter().enumerate() {
            combined = normalize_whitespace(&format!("{combined} {}", line.text));
            tokens.extend(score_tokens(&line.text));
            let block = union.map_or(line.bounds, |u| u.union(&line.bounds));
            union = Some(block);

            let line_count = offset + 1;
            let char_len = combined.chars().count();
            if line_count < options.min_text_lines_per_block
                || char_len < options.min_text_block_chars
            {
                continue;
            }

            let expanded = clamp_bounds(&block.expand(options.text_block_padding), page);
            let area = expanded.area();
            if expanded.width < options.min_crop_edge
                || expanded.height < options.min_text_block_height
                || area < min_area
                || area > max_area
            {
                continue;
            }

            candidates.push(TextCropCandidate {
                bounds: expanded,
                context_text: truncate_chars(&combined, options.max_context_length),
                score: block_score(tokens.len(), char_len),
            });
        }
    }

    candidates
}

/// The longest line grown into a crop of at least the minimum block size.
fn single_line_fallback(
    lines: &[TextLine],
    page: PageSize,
    options: &CropOptions,
) -> Option<TextCropCandidate> {
    // First of the longest lines.
    let best = lines.iter().reduce(|best, line| {
        if line.text.chars().count() > best.text.chars().count() {
            line
        } else {
            best
        }
    })?;

    let padded = clamp_bounds(&best.bounds.expand(options.text_block_padding * 2.0), page);
    let min_height =
        FALLBACK_MIN_HEIGHT.max((options.min_text_block_height * FALLBACK_HEIGHT_FACTOR).trunc());
    let bounds = ensure_minimum_size(&padded, options.min_crop_edge, min_height, page);

    if bounds.area() < page.area() * options.text_fallback_min_area_ratio {
        tracing::debug!(text = %best.text, "single-line fallback too small");
        return None;
    }

    let len = best.text.chars().count();
    Some(TextCropCandidate {
        bounds,
        context_text: truncate_chars(&normalize_whitespace(&best.text), options.max_context_length),
        score: (len as f64 * FALLBACK_LENGTH_WEIGHT).max(1.0),
    })
}

/// Pick up to `max_text_crops_per_page` non-overlapping text blocks.
///
/// Candidates are taken best score first; ties keep sweep order. When no
/// block qualifies but the page has text, the longest line is returned on
/// its own if it is large enough.
pub fn select_text_crops(
    lines: &[TextLine],
    page: PageSize,
    options: &CropOptions,
) -> Vec<TextCropCandidate> {
    if options.max_text_crops_per_page == 0 || lines.is_empty() {
        return Vec::new();
    }

    let mut raw = raw_candidates(lines, page, options);
    let raw_count = raw.len();
    raw.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut selected = suppress_overlaps(
        raw,
        |c| c.bounds,
        options.text_iou_threshold,
        options.max_text_crops_per_page,
    );

    if selected.is_empty() {
        tracing::debug!(lines = lines.len(), "no text block qualified, trying single-line fallback");
        selected.extend(single_line_fallback(lines, page, options));
    }

    tracing::debug!(raw = raw_count, selected = selected.len(), "selected text crops");
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::intersection_over_union;

    fn page() -> PageSize {
        PageSize::new(1000, 1000).unwrap()
    }

    fn line(text: &str, x: f64, y: f64, w: f64, h: f64) -> TextLine {
        TextLine {
            text: text.to_string(),
            bounds: Rect::new(x, y, w, h),
        }
    }

    fn paragraph(texts: &[&str]) -> Vec<TextLine> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| line(t, 100.0, 100.0 + i as f64 * 22.0, 200.0, 20.0))
            .collect()
    }

    #[test]
    fn test_block_score() {
        assert_eq!(block_score(0, 0), 0.0);
        assert!((block_score(4, 100) - 15.0).abs() < 1e-9);
        // length bonus capped at 200 chars
        assert_eq!(block_score(1, 500), block_score(1, 200));
    }

    #[test]
    fn test_empty_lines() {
        assert!(select_text_crops(&[], page(), &CropOptions::default()).is_empty());
    }

    #[test]
    fn test_zero_limit_disables_selector() {
        let opts = CropOptions {
            max_text_crops_per_page: 0,
            ..CropOptions::default()
        };
        let lines = paragraph(&["alpha bravo charlie", "delta echo foxtrot"]);
        assert!(select_text_crops(&lines, page(), &opts).is_empty());
    }

    #[test]
    fn test_two_line_block_bounds_are_padded() {
        let lines = paragraph(&["alpha bravo charlie", "delta echo foxtrot"]);
        let crops = select_text_crops(&lines, page(), &CropOptions::default());
        assert_eq!(crops.len(), 1);
        // union (100,100)-(300,142) padded by 28
        assert_eq!(crops[0].bounds, Rect::new(72.0, 72.0, 256.0, 98.0));
        assert_eq!(
            crops[0].context_text,
            "alpha bravo charlie delta echo foxtrot"
        );
    }

    #[test]
    fn test_score_counts_unique_tokens() {
        let lines = paragraph(&["alpha alpha alpha alpha", "alpha alpha alpha alpha"]);
        let crops = select_text_crops(&lines, page(), &CropOptions::default());
        assert_eq!(crops.len(), 1);
        // 1 token, 47 chars
        assert!((crops[0].score - block_score(1, 47)).abs() < 1e-9);
    }

    #[test]
    fn test_context_text_truncated() {
        let opts = CropOptions {
            max_context_length: 10,
            ..CropOptions::default()
        };
        let lines = paragraph(&["alpha bravo charlie", "delta echo foxtrot"]);
        let crops = select_text_crops(&lines, page(), &opts);
        assert_eq!(crops[0].context_text, "alpha brav");
    }

    #[test]
    fn test_narrow_block_rejected_then_fallback() {
        // 40px wide lines padded to 96px < min edge 120
        let lines = vec![
            line("narrow column of text", 500.0, 100.0, 40.0, 20.0),
            line("with a second line here", 500.0, 122.0, 40.0, 20.0),
        ];
        let crops = select_text_crops(&lines, page(), &CropOptions::default());
        assert_eq!(crops.len(), 1);
        assert_eq!(crops[0].context_text, "with a second line here");
        assert!(crops[0].bounds.width >= 120.0);
    }

    #[test]
    fn test_near_full_page_block_rejected() {
        let lines = vec![
            line("huge block of text spanning page", 0.0, 0.0, 1000.0, 450.0),
            line("second half of the huge block", 0.0, 460.0, 1000.0, 450.0),
        ];
        let opts = CropOptions {
            text_fallback_min_area_ratio: 1.0,
            ..CropOptions::default()
        };
        // the two-line block covers > 68% of the page and the fallback is
        // blocked by its area requirement
        assert!(select_text_crops(&lines, page(), &opts).is_empty());
    }

    #[test]
    fn test_higher_score_wins_overlap() {
        // Windows [0..2], [0..3], [1..3] all overlap heavily; the 3-line
        // window has the most tokens and is taken first.
        let lines = paragraph(&[
            "alpha bravo charlie",
            "delta echo foxtrot",
            "golf hotel india",
        ]);
        let crops = select_text_crops(&lines, page(), &CropOptions::default());
        assert_eq!(
            crops[0].context_text,
            "alpha bravo charlie delta echo foxtrot golf hotel india"
        );
        for (i, a) in crops.iter().enumerate() {
            for b in &crops[i + 1..] {
                assert!(intersection_over_union(&a.bounds, &b.bounds) <= 0.72);
            }
        }
    }

    #[test]
    fn test_max_lines_per_block_limits_window() {
        let opts = CropOptions {
            max_text_lines_per_block: 2,
            ..CropOptions::default()
        };
        let lines = paragraph(&[
            "alpha bravo charlie",
            "delta echo foxtrot",
            "golf hotel india",
        ]);
        let crops = select_text_crops(&lines, page(), &opts);
        assert!(crops.iter().all(|c| c.bounds.height <= 42.0 + 56.0));
    }

    #[test]
    fn test_equal_scores_keep_sweep_order() {
        // Two identical, far-apart paragraphs score the same; the first in
        // sweep order must come first.
        let mut lines = vec![
            line("alpha bravo charlie", 100.0, 100.0, 200.0, 20.0),
            line("delta echo foxtrot", 100.0, 122.0, 200.0, 20.0),
        ];
        lines.push(line("alpha bravo charlie", 100.0, 600.0, 200.0, 20.0));
        lines.push(line("delta echo foxtrot", 100.0, 622.0, 200.0, 20.0));
        // keep windows to two lines and out of the gap between paragraphs
        let opts = CropOptions {
            max_text_lines_per_block: 2,
            max_text_block_area_ratio: 0.1,
            ..CropOptions::default()
        };
        let crops = select_text_crops(&lines, page(), &opts);
        assert_eq!(crops.len(), 2);
        assert_eq!(crops[0].bounds.y, 72.0);
        assert_eq!(crops[1].bounds.y, 572.0);
    }

    #[test]
    fn test_single_short_line_fallback() {
        let lines = vec![line("Fig. 1", 480.0, 500.0, 40.0, 12.0)];
        let opts = CropOptions::default();
        let crops = select_text_crops(&lines, page(), &opts);
        assert_eq!(crops.len(), 1);
        let crop = &crops[0];
        assert_eq!(crop.context_text, "Fig. 1");
        // padded by 56 on every side: 152 x 124, already above 120 x 56
        assert_eq!(crop.bounds, Rect::new(424.0, 444.0, 152.0, 124.0));
        assert!((crop.score - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_fallback_enforces_minimum_size() {
        let opts = CropOptions {
            text_block_padding: 0.0,
            ..CropOptions::default()
        };
        let lines = vec![line("Fig. 1", 480.0, 500.0, 40.0, 12.0)];
        let crops = select_text_crops(&lines, page(), &opts);
        assert_eq!(crops.len(), 1);
        // 120 x max(56, 56)
        assert_eq!(crops[0].bounds, Rect::new(440.0, 478.0, 120.0, 56.0));
    }

    #[test]
    fn test_fallback_picks_first_longest_line() {
        let lines = vec![
            line("abc", 100.0, 100.0, 30.0, 12.0),
            line("longest", 100.0, 300.0, 70.0, 12.0),
            line("tieline", 100.0, 600.0, 70.0, 12.0),
        ];
        let crops = select_text_crops(&lines, page(), &CropOptions::default());
        assert_eq!(crops.len(), 1);
        assert_eq!(crops[0].context_text, "longest");
    }

    #[test]
    fn test_fallback_score_floor() {
        let lines = vec![line("ab", 100.0, 100.0, 20.0, 12.0)];
        let crops = select_text_crops(&lines, page(), &CropOptions::default());
        assert_eq!(crops[0].score, 1.0);
    }
}
