//! Greedy non-maximum suppression over pre-sorted candidates.

use crate::geometry::{Rect, intersection_over_union};

/// Keep candidates in order, dropping any whose IoU with an already kept
/// candidate exceeds `threshold`, until `limit` are kept.
///
/// Candidates must already be sorted best-first.
pub fn suppress_overlaps<T, I, F>(candidates: I, bounds: F, threshold: f64, limit: usize) -> Vec<T>
where
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> Rect,
{
    candidates.into_iter().fold(Vec::new(), |mut kept, candidate| {
        if kept.len() >= limit {
            return kept;
        }
        let rect = bounds(&candidate);
        let overlaps = kept
            .iter()
            .any(|existing| intersection_over_union(&bounds(existing), &rect) > threshold);
        if !overlaps {
            kept.push(candidate);
        }
        kept
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_disjoint() {
        let rects = vec![
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(20.0, 0.0, 10.0, 10.0),
            Rect::new(40.0, 0.0, 10.0, 10.0),
        ];
        let kept = suppress_overlaps(rects.clone(), |r| *r, 0.5, 10);
        assert_eq!(kept, rects);
    }

    #[test]
    fn test_drops_heavy_overlap_keeps_first() {
        let rects = vec![
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(1.0, 0.0, 10.0, 10.0),
            Rect::new(50.0, 0.0, 10.0, 10.0),
        ];
        let kept = suppress_overlaps(rects, |r| *r, 0.5, 10);
        assert_eq!(
            kept,
            vec![Rect::new(0.0, 0.0, 10.0, 10.0), Rect::new(50.0, 0.0, 10.0, 10.0)]
        );
    }

    #[test]
    fn test_threshold_is_exclusive() {
        // IoU of these two is exactly 1/3
        let rects = vec![Rect::new(0.0, 0.0, 10.0, 10.0), Rect::new(5.0, 0.0, 10.0, 10.0)];
        let iou = intersection_over_union(&rects[0], &rects[1]);
        assert_eq!(suppress_overlaps(rects.clone(), |r| *r, iou, 10).len(), 2);
        assert_eq!(suppress_overlaps(rects, |r| *r, iou - 1e-9, 10).len(), 1);
    }

    #[test]
    fn test_limit() {
        let rects: Vec<Rect> = (0..5)
            .map(|i| Rect::new(f64::from(i) * 20.0, 0.0, 10.0, 10.0))
            .collect();
        assert_eq!(suppress_overlaps(rects.clone(), |r| *r, 0.5, 2).len(), 2);
        assert!(suppress_overlaps(rects, |r| *r, 0.5, 0).is_empty());
    }
}
