//! Rectangle arithmetic in rendered-page pixel space.
//!
//! Every function here is total: degenerate, negative or oversized
//! rectangles produce a best-effort clamped result instead of an error.

use crate::error::CropError;

/// Axis-aligned rectangle with top-left origin, in pixels.
///
/// Values are fractional while a rectangle is being computed and become
/// whole numbers once passed through [`clamp_bounds`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Center point as `(x, y)`.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Smallest rectangle covering both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }

    /// Grow the rectangle by `by` on all four sides.
    pub fn expand(&self, by: f64) -> Rect {
        Rect {
            x: self.x - by,
            y: self.y - by,
            width: self.width + by * 2.0,
            height: self.height + by * 2.0,
        }
    }
}

/// Pixel dimensions of a rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageSize {
    pub width: u32,
    pub height: u32,
}

impl PageSize {
    /// Create a page size, rejecting zero dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`CropError::InvalidPageSize`] when either side is zero.
    pub fn new(width: u32, height: u32) -> Result<Self, CropError> {
        if width == 0 || height == 0 {
            return Err(CropError::InvalidPageSize { width, height });
        }
        Ok(Self { width, height })
    }

    /// Page area, floored at 1 so it can be used as a divisor.
    pub fn area(&self) -> f64 {
        (f64::from(self.width) * f64::from(self.height)).max(1.0)
    }

    /// Fraction of the page covered by `rect`.
    pub fn area_ratio(&self, rect: &Rect) -> f64 {
        rect.area() / self.area()
    }
}

/// A bounding box in native document units (origin bottom-left).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NativeBounds {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl NativeBounds {
    pub fn new(left: f64, bottom: f64, right: f64, top: f64) -> Self {
        Self {
            left,
            bottom,
            right,
            top,
        }
    }
}

/// Pixels per native unit on each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PixelScale {
    pub x: f64,
    pub y: f64,
}

impl PixelScale {
    /// Scale factors mapping a native page of `width_native` x
    /// `height_native` units onto `page`. Native sizes are floored at 1.
    pub fn between(page: PageSize, width_native: f64, height_native: f64) -> Self {
        Self {
            x: f64::from(page.width) / width_native.max(1.0),
            y: f64::from(page.height) / height_native.max(1.0),
        }
    }
}

/// Snap a rectangle to whole pixels inside the page.
///
/// The origin is floored and held within `[0, page]`; the far edges are
/// ceiled and capped at the page size. Width and height never go negative.
pub fn clamp_bounds(rect: &Rect, page: PageSize) -> Rect {
    let page_w = f64::from(page.width);
    let page_h = f64::from(page.height);

    let x = rect.x.floor().max(0.0).min(page_w);
    let y = rect.y.floor().max(0.0).min(page_h);
    let max_x = rect.right().ceil().min(page_w);
    let max_y = rect.bottom().ceil().min(page_h);

    Rect {
        x,
        y,
        width: (max_x - x).max(0.0),
        height: (max_y - y).max(0.0),
    }
}

/// Grow `rect` symmetrically about its center until it is at least
/// `min_width` x `min_height`, then clamp it to the page.
pub fn ensure_minimum_size(rect: &Rect, min_width: f64, min_height: f64, page: PageSize) -> Rect {
    let mut grown = *rect;

    if grown.width < min_width {
        grown.x -= (min_width - grown.width) / 2.0;
        grown.width = min_width;
    }
    if grown.height < min_height {
        grown.y -= (min_height - grown.height) / 2.0;
        grown.height = min_height;
    }

    clamp_bounds(&grown, page)
}

/// Scale `rect` down about its center so it covers at most
/// `target_ratio` of the page. Rectangles already small enough are only
/// clamped.
pub fn shrink_to_area_ratio(rect: &Rect, page: PageSize, target_ratio: f64) -> Rect {
    let target_area = (page.area() * target_ratio).max(1.0);
    let current_area = rect.area().max(1.0);
    if current_area <= target_area {
        return clamp_bounds(rect, page);
    }

    let scale = (target_area / current_area).sqrt();
    let width = rect.width * scale;
    let height = rect.height * scale;
    let (center_x, center_y) = rect.center();

    clamp_bounds(
        &Rect::new(
            center_x - width / 2.0,
            center_y - height / 2.0,
            width,
            height,
        ),
        page,
    )
}

/// Intersection over union of two rectangles, in `[0, 1]`.
///
/// Disjoint or degenerate rectangles yield 0.
pub fn intersection_over_union(a: &Rect, b: &Rect) -> f64 {
    let inter_w = (a.right().min(b.right()) - a.x.max(b.x)).max(0.0);
    let inter_h = (a.bottom().min(b.bottom()) - a.y.max(b.y)).max(0.0);
    let intersection = inter_w * inter_h;
    if intersection <= 0.0 {
        return 0.0;
    }

    let union = a.area() + b.area() - intersection;
    if union <= 0.0 {
        return 0.0;
    }
    (intersection / union).min(1.0)
}

/// Whether `text` touches `crop` grown by `margin` on every side.
///
/// Edges that merely touch count as intersecting.
pub fn intersects_with_margin(text: &Rect, crop: &Rect, margin: f64) -> bool {
    let crop_left = crop.x - margin;
    let crop_top = crop.y - margin;
    let crop_right = crop.right() + margin;
    let crop_bottom = crop.bottom() + margin;

    !(text.right() < crop_left
        || text.x > crop_right
        || text.bottom() < crop_top
        || text.y > crop_bottom)
}

/// Map a native bounding box onto the rendered page.
///
/// Native coordinates grow upwards from the bottom-left corner; pixel
/// coordinates grow downwards from the top-left, so `top` is flipped
/// against `page_height_native` before scaling.
pub fn native_to_pixels(
    bounds: &NativeBounds,
    page_height_native: f64,
    scale: PixelScale,
    page: PageSize,
) -> Rect {
    let rect = Rect {
        x: bounds.left * scale.x,
        y: (page_height_native - bounds.top) * scale.y,
        width: (bounds.right - bounds.left) * scale.x,
        height: (bounds.top - bounds.bottom) * scale.y,
    };
    clamp_bounds(&rect, page)
}
