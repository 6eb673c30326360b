//! Cutting crops out of rendered pages and writing PNG files.

use std::path::Path;

use image::{DynamicImage, ImageFormat};
use pdfcrop_core::{CropResult, PageImageFile, PageSize, PlannedCrop, Rect};

use crate::error::RenderError;

/// Copy the pixels under `rect` out of `bitmap`.
///
/// The rectangle is snapped to whole pixels and held inside the bitmap.
/// Returns `None` when nothing of it lies on the bitmap.
pub fn crop_bitmap(bitmap: &DynamicImage, rect: &Rect) -> Option<DynamicImage> {
    let (width, height) = (f64::from(bitmap.width()), f64::from(bitmap.height()));
    let x = rect.x.floor().clamp(0.0, width);
    let y = rect.y.floor().clamp(0.0, height);
    let right = rect.right().ceil().min(width);
    let bottom = rect.bottom().ceil().min(height);
    if right <= x || bottom <= y {
        return None;
    }
    Some(bitmap.crop_imm(
        x as u32,
        y as u32,
        (right - x) as u32,
        (bottom - y) as u32,
    ))
}

/// Encode `image` as PNG at `path`.
///
/// # Errors
///
/// Returns [`RenderError::Image`] if encoding or writing fails.
pub fn save_png(image: &DynamicImage, path: &Path) -> Result<(), RenderError> {
    image.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Write the full page bitmap as `page-{n}.png` under `dir`.
///
/// # Errors
///
/// Returns [`RenderError::Image`] if the file cannot be written.
pub fn write_page_png(
    bitmap: &DynamicImage,
    dir: &Path,
    page_number: usize,
) -> Result<PageImageFile, RenderError> {
    let record = PageImageFile::new(page_number);
    save_png(bitmap, &dir.join(&record.file_name))?;
    Ok(record)
}

/// Write crop `seq` of a page as `page-{n}-crop-{seq}.png` under `dir`.
///
/// # Errors
///
/// Returns [`RenderError::EmptyCrop`] if the crop covers no pixels, or
/// [`RenderError::Image`] if the file cannot be written.
pub fn write_crop_png(
    bitmap: &DynamicImage,
    dir: &Path,
    page_number: usize,
    seq: usize,
    crop: &PlannedCrop,
    page_text: &str,
) -> Result<CropResult, RenderError> {
    let pixels =
        crop_bitmap(bitmap, &crop.bounds).ok_or(RenderError::EmptyCrop { page_number })?;
    let size = PageSize::new(bitmap.width(), bitmap.height())?;
    let record = CropResult::new(page_number, seq, size, crop, page_text);
    save_png(&pixels, &dir.join(&record.file_name))?;
    Ok(record)
}
