//! Tunable thresholds for crop selection and page rendering.

use crate::error::CropError;

/// Thresholds for image and text crop selection.
///
/// All pixel values refer to the rendered page. Defaults match the
/// behavior of the command-line tool.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CropOptions {
    /// Minimum crop edge in pixels (image crops on both axes, text crops on width).
    pub min_crop_edge: f64,
    /// Smallest fraction of the page an image crop may cover.
    pub min_crop_area_ratio: f64,
    /// Largest fraction of the page an image crop may cover.
    pub max_crop_area_ratio: f64,
    /// Maximum image crops selected per page. Zero disables image crops.
    pub max_image_crops_per_page: usize,
    /// Maximum text crops selected per page. Zero disables text crops.
    pub max_text_crops_per_page: usize,
    /// Padding added around text blocks, in pixels.
    pub text_block_padding: f64,
    /// Minimum padded text block height, in pixels.
    pub min_text_block_height: f64,
    /// Minimum characters in a text block's combined text.
    pub min_text_block_chars: usize,
    /// Minimum lines in a text block.
    pub min_text_lines_per_block: usize,
    /// Maximum lines in a text block.
    pub max_text_lines_per_block: usize,
    /// Margin around an image crop when collecting context text, in pixels.
    pub context_margin: f64,
    /// Maximum characters of context text kept per crop.
    pub max_context_length: usize,
    /// Area ratio a near-full-page image is shrunk to on the fallback path.
    pub image_fallback_area_ratio: f64,
    /// Text candidates overlapping an accepted one above this IoU are dropped.
    pub text_iou_threshold: f64,
    /// Image candidates overlapping an accepted one above this IoU are dropped.
    pub image_iou_threshold: f64,
    /// Smallest page fraction a multi-line text block may cover.
    pub min_text_block_area_ratio: f64,
    /// Largest page fraction a multi-line text block may cover.
    pub max_text_block_area_ratio: f64,
    /// Smallest page fraction the single-line text fallback may cover.
    pub text_fallback_min_area_ratio: f64,
    /// Image crops with `width / height` at or below this are slivers.
    pub min_image_aspect_ratio: f64,
    /// Image crops with `width / height` at or above this are slivers.
    pub max_image_aspect_ratio: f64,
}

impl Default for CropOptions {
    fn default() -> Self {
        Self {
            min_crop_edge: 120.0,
            min_crop_area_ratio: 0.008,
            max_crop_area_ratio: 0.72,
            max_image_crops_per_page: 4,
            max_text_crops_per_page: 6,
            text_block_padding: 28.0,
            min_text_block_height: 80.0,
            min_text_block_chars: 28,
            min_text_lines_per_block: 2,
            max_text_lines_per_block: 6,
            context_margin: 100.0,
            max_context_length: 320,
            image_fallback_area_ratio: 0.62,
            text_iou_threshold: 0.72,
            image_iou_threshold: 0.85,
            min_text_block_area_ratio: 0.004,
            max_text_block_area_ratio: 0.68,
            text_fallback_min_area_ratio: 0.002,
            min_image_aspect_ratio: 0.15,
            max_image_aspect_ratio: 6.5,
        }
    }
}

impl CropOptions {
    /// Check that every threshold is usable.
    ///
    /// # Errors
    ///
    /// Returns [`CropError::InvalidOption`] naming the first bad field.
    pub fn validate(&self) -> Result<(), CropError> {
        for (name, value) in [
            ("min_crop_edge", self.min_crop_edge),
            ("text_block_padding", self.text_block_padding),
            ("min_text_block_height", self.min_text_block_height),
            ("context_margin", self.context_margin),
        ] {
            non_negative(name, value)?;
        }

        for (name, value) in [
            ("min_crop_area_ratio", self.min_crop_area_ratio),
            ("max_crop_area_ratio", self.max_crop_area_ratio),
            ("image_fallback_area_ratio", self.image_fallback_area_ratio),
            ("text_iou_threshold", self.text_iou_threshold),
            ("image_iou_threshold", self.image_iou_threshold),
            ("min_text_block_area_ratio", self.min_text_block_area_ratio),
            ("max_text_block_area_ratio", self.max_text_block_area_ratio),
            ("text_fallback_min_area_ratio", self.text_fallback_min_area_ratio),
        ] {
            unit_ratio(name, value)?;
        }

        if self.min_crop_area_ratio > self.max_crop_area_ratio {
            return Err(CropError::option(
                "min_crop_area_ratio",
                format!(
                    "{} exceeds max_crop_area_ratio {}",
                    self.min_crop_area_ratio, self.max_crop_area_ratio
                ),
            ));
        }
        if self.min_text_block_area_ratio > self.max_text_block_area_ratio {
            return Err(CropError::option(
                "min_text_block_area_ratio",
                format!(
                    "{} exceeds max_text_block_area_ratio {}",
                    self.min_text_block_area_ratio, self.max_text_block_area_ratio
                ),
            ));
        }
        if self.min_text_lines_per_block == 0 {
            return Err(CropError::option(
                "min_text_lines_per_block",
                "must be at least 1",
            ));
        }
        if self.max_text_lines_per_block < self.min_text_lines_per_block {
            return Err(CropError::option(
                "max_text_lines_per_block",
                format!(
                    "{} is below min_text_lines_per_block {}",
                    self.max_text_lines_per_block, self.min_text_lines_per_block
                ),
            ));
        }

        non_negative("min_image_aspect_ratio", self.min_image_aspect_ratio)?;
        non_negative("max_image_aspect_ratio", self.max_image_aspect_ratio)?;
        if self.min_image_aspect_ratio >= self.max_image_aspect_ratio {
            return Err(CropError::option(
                "min_image_aspect_ratio",
                "must be below max_image_aspect_ratio",
            ));
        }
        Ok(())
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), CropError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(CropError::option(
            name,
            format!("expected a finite non-negative number, got {value}"),
        ))
    }
}

fn unit_ratio(name: &'static str, value: f64) -> Result<(), CropError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(CropError::option(
            name,
            format!("expected a ratio between 0 and 1, got {value}"),
        ))
    }
}

/// Document-level limits and rasterization settings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RenderOptions {
    /// Maximum number of pages rendered, counted from the first page.
    pub max_pages: usize,
    /// Crop budget for the whole document.
    pub max_total_crops: usize,
    /// Longest rendered page side in pixels. Zero disables the cap.
    pub max_render_dimension: u32,
    /// Preferred pixels per native unit.
    pub base_render_scale: f64,
    /// Maximum characters of page text attached to each crop.
    pub max_page_text_length: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_pages: 20,
            max_total_crops: 36,
            max_render_dimension: 2400,
            base_render_scale: 2.4,
            max_page_text_length: 2600,
        }
    }
}

impl RenderOptions {
    /// Pixels per native unit for a page of the given native size.
    ///
    /// Uses `base_render_scale` unless that would push the longest side past
    /// `max_render_dimension`. Never returns less than 1.0.
    pub fn render_scale(&self, width_native: f64, height_native: f64) -> f64 {
        let largest = width_native.max(height_native).max(1.0);
        let scale = if self.max_render_dimension > 0 {
            self.base_render_scale
                .min(f64::from(self.max_render_dimension) / largest)
        } else {
            self.base_render_scale
        };
        scale.max(1.0)
    }

    /// Number of pages to process in a document of `page_count` pages.
    pub fn pages_to_render(&self, page_count: usize) -> usize {
        page_count.min(self.max_pages.max(1))
    }

    /// # Errors
    ///
    /// Returns [`CropError::InvalidOption`] when the base scale is not a
    /// positive finite number.
    pub fn validate(&self) -> Result<(), CropError> {
        if !(self.base_render_scale.is_finite() && self.base_render_scale > 0.0) {
            return Err(CropError::option(
                "base_render_scale",
                format!("expected a positive number, got {}", self.base_render_scale),
            ));
        }
        Ok(())
    }
}
