//! Page source trait.
//!
//! Defines the [`PageSource`] trait that abstracts loading a rendered page
//! together with the glyph and image geometry the crop planner needs. This
//! keeps the planner and the command-line driver independent of pdfium.

use image::DynamicImage;
use pdfcrop_core::{PageInput, RenderOptions};

use crate::error::RenderError;

/// A page ready for crop planning: its geometry plus the rendered bitmap.
#[derive(Debug, Clone)]
pub struct LoadedPage {
    /// Native glyphs, image bounds and page text.
    pub input: PageInput,
    /// The page rasterized at `input.scale`.
    pub bitmap: DynamicImage,
}

/// Trait abstracting a paginated document that can be rasterized.
///
/// # Usage
///
/// ```ignore
/// let count = options.pages_to_render(source.page_count());
/// for index in 0..count {
///     let page = source.load_page(index, &options)?;
///     let plan = plan_page(&page.input, &crop_options, &budget);
/// }
/// ```
pub trait PageSource {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Render the page at 0-based `index` and collect its geometry.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::PageOutOfRange`] for a bad index, or a backend
    /// error if the page cannot be loaded or rendered.
    fn load_page(&self, index: usize, options: &RenderOptions) -> Result<LoadedPage, RenderError>;
}
