//! Records describing written page images and crops.
//!
//! With the `serde` feature these serialize to the camelCase JSON document
//! printed by the command-line tool.

use crate::geometry::{PageSize, Rect};
use crate::page::{PlannedCrop, SourceType};

/// File name of the full rendered page.
pub fn page_file_name(page_number: usize) -> String {
    format!("page-{page_number}.png")
}

/// File name of the `seq`-th crop (1-based) on a page.
pub fn crop_file_name(page_number: usize, seq: usize) -> String {
    format!("page-{page_number}-crop-{seq}.png")
}

/// A rendered page written to disk.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PageImageFile {
    pub page_number: usize,
    pub file_name: String,
}

impl PageImageFile {
    pub fn new(page_number: usize) -> Self {
        Self {
            page_number,
            file_name: page_file_name(page_number),
        }
    }
}

/// A crop written to disk, with its text context.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CropResult {
    pub page_number: usize,
    pub file_name: String,
    pub source_type: SourceType,
    pub width: u32,
    pub height: u32,
    pub area: u64,
    /// `area` over the page area (floored at 1).
    pub area_ratio: f64,
    pub context_text: String,
    pub page_text: String,
}

impl CropResult {
    /// Describe crop number `seq` of a page. Dimensions are taken from the
    /// clamped crop bounds.
    pub fn new(
        page_number: usize,
        seq: usize,
        page: PageSize,
        crop: &PlannedCrop,
        page_text: &str,
    ) -> Self {
        let (width, height) = pixel_dimensions(&crop.bounds);
        let area = u64::from(width) * u64::from(height);
        Self {
            page_number,
            file_name: crop_file_name(page_number, seq),
            source_type: crop.source_type,
            width,
            height,
            area,
            area_ratio: area as f64 / page.area(),
            context_text: crop.context_text.clone(),
            page_text: page_text.to_string(),
        }
    }
}

/// Whole-pixel width and height of clamped bounds.
fn pixel_dimensions(bounds: &Rect) -> (u32, u32) {
    // clamped bounds are whole, non-negative and within the page
    (bounds.width.max(0.0) as u32, bounds.height.max(0.0) as u32)
}

/// Everything produced for one document.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ExtractionOutput {
    pub page_image_files: Vec<PageImageFile>,
    pub image_candidates: Vec<CropResult>,
}
