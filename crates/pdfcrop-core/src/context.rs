use crate::geometry::{Rect, intersects_with_margin};
use crate::lines::TextLine;
use crate::text::{normalize_whitespace, truncate_chars};

/// Text of every line near `crop`, joined with single spaces.
///
/// A line is near when it touches `crop` grown by `margin` on all sides.
/// The result is whitespace-normalized and capped at `max_length`
/// characters.
pub fn build_crop_context_text(
    lines: &[TextLine],
    crop: &Rect,
    margin: f64,
    max_length: usize,
) -> String {
    let nearby = lines
        .iter()
        .filter(|line| intersects_with_margin(&line.bounds, crop, margin))
        .map(|line| line.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    truncate_chars(&normalize_whitespace(&nearby), max_length)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str, x: f64, y: f64) -> TextLine {
        TextLine {
            text: text.to_string(),
            bounds: Rect::new(x, y, 100.0, 12.0),
        }
    }

    #[test]
    fn test_collects_nearby_lines_in_order() {
        let crop = Rect::new(200.0, 200.0, 200.0, 200.0);
        let lines = vec![
            line("Figure 2:", 200.0, 150.0),
            line("far away", 800.0, 800.0),
            line("caption  text", 200.0, 420.0),
        ];
        assert_eq!(
            build_crop_context_text(&lines, &crop, 100.0, 320),
            "Figure 2: caption text"
        );
    }

    #[test]
    fn test_margin_controls_reach() {
        let crop = Rect::new(200.0, 200.0, 200.0, 200.0);
        let lines = vec![line("caption", 200.0, 450.0)];
        assert_eq!(build_crop_context_text(&lines, &crop, 10.0, 320), "");
        assert_eq!(build_crop_context_text(&lines, &crop, 50.0, 320), "caption");
    }

    #[test]
    fn test_truncated_to_max_length() {
        let crop = Rect::new(0.0, 0.0, 500.0, 500.0);
        let lines = vec![line("abcdef", 10.0, 10.0), line("ghijkl", 10.0, 30.0)];
        assert_eq!(build_crop_context_text(&lines, &crop, 0.0, 8), "abcdef g");
    }

    #[test]
    fn test_no_lines() {
        let crop = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(build_crop_context_text(&[], &crop, 100.0, 320), "");
    }
}
