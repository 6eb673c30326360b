//! pdfcrop-core: Backend-independent geometry and crop selection.
//!
//! Given the glyph boxes and embedded image boxes of a rendered page, this
//! crate rebuilds text lines, scores multi-line text blocks, filters and
//! de-duplicates image regions, and plans which rectangles of the page are
//! worth saving as standalone crops. Rendering and file output live in
//! `pdfcrop-render` and `pdfcrop-cli`.

pub mod context;
pub mod error;
pub mod geometry;
pub mod image_crops;
pub mod lines;
pub mod options;
pub mod output;
pub mod page;
pub mod suppress;
pub mod text;
pub mod text_crops;

pub use context::build_crop_context_text;
pub use error::CropError;
pub use geometry::{
    NativeBounds, PageSize, PixelScale, Rect, clamp_bounds, ensure_minimum_size,
    intersection_over_union, intersects_with_margin, native_to_pixels, shrink_to_area_ratio,
};
pub use image_crops::select_image_crops;
pub use lines::{TextLine, build_text_lines};
pub use options::{CropOptions, RenderOptions};
pub use output::{CropResult, ExtractionOutput, PageImageFile, crop_file_name, page_file_name};
#[cfg(feature = "parallel")]
pub use page::plan_pages_parallel;
pub use page::{CropBudget, PageInput, PagePlan, PlannedCrop, SourceType, plan_page, plan_pages};
pub use text::{CharItem, NativeChar, normalize_whitespace, truncate_chars};
pub use text_crops::{TextCropCandidate, select_text_crops};
