//! Error types for the rendering layer.
//!
//! Uses [`thiserror`] to wrap pdfium, image encoding and I/O failures, plus
//! validation errors surfaced by [`pdfcrop_core`].

use pdfcrop_core::CropError;
use pdfium_render::prelude::PdfiumError;
use thiserror::Error;

/// Error type for loading, rendering and writing pages.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The pdfium library failed to bind, open the document or render a page.
    #[error("pdfium error: {0}")]
    Pdfium(#[from] PdfiumError),

    /// A bitmap could not be encoded or written as an image.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Error reading the document or writing output files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A page index past the end of the document.
    #[error("page index {index} out of range (document has {count} pages)")]
    PageOutOfRange {
        /// Requested 0-based index.
        index: usize,
        /// Number of pages in the document.
        count: usize,
    },

    /// A crop rectangle with no pixels.
    #[error("empty crop region on page {page_number}")]
    EmptyCrop {
        /// 1-based page number.
        page_number: usize,
    },

    /// Invalid page size or options.
    #[error(transparent)]
    Crop(#[from] CropError),
}
