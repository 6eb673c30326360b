//! Crops for embedded raster images.

use crate::geometry::{PageSize, Rect, clamp_bounds, ensure_minimum_size, shrink_to_area_ratio};
use crate::options::CropOptions;
use crate::suppress::suppress_overlaps;

/// Whether a clamped image rectangle passes the size, area and aspect filters.
fn is_usable_image(rect: &Rect, page: PageSize, options: &CropOptions) -> bool {
    if rect.width < options.min_crop_edge || rect.height < options.min_crop_edge {
        return false;
    }
    let ratio = page.area_ratio(rect);
    if ratio < options.min_crop_area_ratio || ratio > options.max_crop_area_ratio {
        return false;
    }
    let aspect = rect.width / rect.height.max(1.0);
    aspect > options.min_image_aspect_ratio && aspect < options.max_image_aspect_ratio
}

/// Largest rectangle resized into an acceptable crop, for pages where
/// every image was filtered out (typically full-page scans).
fn largest_image_fallback(clamped: &[Rect], page: PageSize, options: &CropOptions) -> Option<Rect> {
    // First of the largest, matching a stable descending sort.
    let largest = clamped
        .iter()
        .reduce(|best, rect| if rect.area() > best.area() { rect } else { best })?;

    let mut bounds = *largest;
    if page.area_ratio(&bounds) > options.max_crop_area_ratio {
        bounds = shrink_to_area_ratio(&bounds, page, options.image_fallback_area_ratio);
    }
    bounds = ensure_minimum_size(&bounds, options.min_crop_edge, options.min_crop_edge, page);

    if page.area_ratio(&bounds) < options.min_crop_area_ratio {
        tracing::debug!(?largest, "largest image too small for fallback crop");
        return None;
    }
    Some(bounds)
}

/// Select up to `max_image_crops_per_page` distinct image crops.
///
/// Raw rectangles are clamped to the page, filtered, ordered by area
/// (largest first) and de-duplicated by IoU. If nothing survives, the
/// largest raw image is shrunk and grown into a single fallback crop.
pub fn select_image_crops(raw: &[Rect], page: PageSize, options: &CropOptions) -> Vec<Rect> {
    if options.max_image_crops_per_page == 0 || raw.is_empty() {
        return Vec::new();
    }

    let clamped: Vec<Rect> = raw.iter().map(|r| clamp_bounds(r, page)).collect();
    let mut candidates: Vec<Rect> = clamped
        .iter()
        .copied()
        .filter(|r| is_usable_image(r, page, options))
        .collect();
    candidates.sort_by(|a, b| b.area().total_cmp(&a.area()));
    let candidate_count = candidates.len();

    let mut selected = suppress_overlaps(
        candidates,
        |r| *r,
        options.image_iou_threshold,
        options.max_image_crops_per_page,
    );

    if selected.is_empty() {
        tracing::debug!(images = raw.len(), "no image passed the filters, trying fallback");
        selected.extend(largest_image_fallback(&clamped, page, options));
    }

    tracing::debug!(
        raw = raw.len(),
        candidates = candidate_count,
        selected = selected.len(),
        "selected image crops"
    );
    selected
}
