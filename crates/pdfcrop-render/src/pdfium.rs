//! pdfium-backed [`PageSource`].
//!
//! Pages are rendered with pdfium at the scale chosen by
//! [`RenderOptions::render_scale`]. Glyph boxes come from the page's text
//! layer (tight bounds) and image boxes from its image page objects,
//! searched through form XObjects as well.

use std::path::Path;

use pdfcrop_core::{
    NativeBounds, NativeChar, PageInput, PageSize, PixelScale, RenderOptions, normalize_whitespace,
    truncate_chars,
};
use pdfium_render::prelude::*;

use crate::backend::{LoadedPage, PageSource};
use crate::error::RenderError;
use crate::objects::{ObjectNode, Transform, collect_image_bounds};

/// Bind the pdfium shared library.
///
/// Looks in `library_dir` first when given, then falls back to the system
/// library search path.
///
/// # Errors
///
/// Returns [`RenderError::Pdfium`] if no usable library is found.
pub fn bind_pdfium(library_dir: Option<&Path>) -> Result<Pdfium, RenderError> {
    let bindings = match library_dir {
        Some(dir) => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
            .or_else(|_| Pdfium::bind_to_system_library())?,
        None => Pdfium::bind_to_system_library()?,
    };
    Ok(Pdfium::new(bindings))
}

/// A PDF document opened through pdfium.
pub struct PdfiumSource<'a> {
    document: PdfDocument<'a>,
}

impl<'a> PdfiumSource<'a> {
    /// Open the PDF at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Pdfium`] if the file is missing, encrypted or
    /// not a PDF.
    pub fn open(pdfium: &'a Pdfium, path: &Path) -> Result<Self, RenderError> {
        let document = pdfium.load_pdf_from_file(path, None)?;
        Ok(Self { document })
    }

    /// Open a PDF held in memory.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Pdfium`] if the bytes are not a readable PDF.
    pub fn from_bytes(pdfium: &'a Pdfium, bytes: &'a [u8]) -> Result<Self, RenderError> {
        let document = pdfium.load_pdf_from_byte_slice(bytes, None)?;
        Ok(Self { document })
    }
}

impl PageSource for PdfiumSource<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn load_page(&self, index: usize, options: &RenderOptions) -> Result<LoadedPage, RenderError> {
        let count = self.page_count();
        let page_index = u16::try_from(index)
            .ok()
            .filter(|_| index < count)
            .ok_or(RenderError::PageOutOfRange { index, count })?;
        let page = self.document.pages().get(page_index)?;

        let width_native = f64::from(page.width().value);
        let height_native = f64::from(page.height().value);
        let scale = options.render_scale(width_native, height_native);
        let target_width = (width_native * scale).round().max(1.0) as i32;
        let target_height = (height_native * scale).round().max(1.0) as i32;

        let bitmap = page
            .render_with_config(
                &PdfRenderConfig::new()
                    .set_target_width(target_width)
                    .set_target_height(target_height),
            )?
            .as_image();
        let size = PageSize::new(bitmap.width(), bitmap.height())?;

        let text = page.text()?;
        let chars = page_chars(&text);
        let page_text = truncate_chars(
            &normalize_whitespace(&text.all()),
            options.max_page_text_length,
        );
        let image_bounds = image_object_bounds(&page);

        tracing::debug!(
            page = index + 1,
            width = size.width,
            height = size.height,
            scale,
            chars = chars.len(),
            images = image_bounds.len(),
            "rendered page"
        );

        Ok(LoadedPage {
            input: PageInput {
                page_number: index + 1,
                size,
                width_native,
                height_native,
                scale: PixelScale::between(size, width_native, height_native),
                chars,
                image_bounds,
                page_text,
            },
            bitmap,
        })
    }
}

/// Glyphs with a Unicode value and tight bounds, in native units.
#[allow(deprecated)] // PdfRect field access deprecated in 0.8.28
fn page_chars(text: &PdfPageText<'_>) -> Vec<NativeChar> {
    text.chars()
        .iter()
        .filter_map(|ch| {
            let (Some(unicode), Ok(rect)) = (ch.unicode_char(), ch.tight_bounds()) else {
                return None;
            };
            Some(NativeChar::new(
                unicode.to_string(),
                NativeBounds::new(
                    f64::from(rect.left.value),
                    f64::from(rect.bottom.value),
                    f64::from(rect.right.value),
                    f64::from(rect.top.value),
                ),
            ))
        })
        .collect()
}

/// Bounds of every image page object in native units, including images
/// nested inside form XObjects.
fn image_object_bounds(page: &PdfPage<'_>) -> Vec<NativeBounds> {
    collect_image_bounds(page.objects().iter())
}

impl ObjectNode for PdfPageObject<'_> {
    fn image_bounds(&self) -> Option<NativeBounds> {
        if self.object_type() != PdfPageObjectType::Image {
            return None;
        }
        match self.bounds() {
            Ok(quad) => Some(NativeBounds::new(
                f64::from(quad.left().value),
                f64::from(quad.bottom().value),
                f64::from(quad.right().value),
                f64::from(quad.top().value),
            )),
            Err(err) => {
                tracing::warn!(%err, "skipping image object without bounds");
                None
            }
        }
    }

    fn form_children(&self) -> Option<(Transform, Vec<Self>)> {
        let PdfPageObject::XObjectForm(form) = self else {
            return None;
        };
        let matrix = match form.matrix() {
            Ok(m) => Transform::new(
                f64::from(m.a()),
                f64::from(m.b()),
                f64::from(m.c()),
                f64::from(m.d()),
                f64::from(m.e()),
                f64::from(m.f()),
            ),
            Err(err) => {
                tracing::warn!(%err, "form object without matrix, assuming identity");
                Transform::identity()
            }
        };
        let children = form
            .as_range()
            .filter_map(|index| form.get(index).ok())
            .collect();
        Some((matrix, children))
    }
}
