//! pdfcrop-render: Page rasterization and geometry extraction.
//!
//! This crate loads PDF pages through pdfium, renders them to bitmaps and
//! collects the glyph and image boxes consumed by [`pdfcrop_core`]'s crop
//! planner. It also cuts planned crops out of the rendered pages and writes
//! them as PNG files.

pub mod backend;
pub mod bitmap;
pub mod error;
pub mod objects;
pub mod pdfium;

pub use backend::{LoadedPage, PageSource};
pub use bitmap::{crop_bitmap, save_png, write_crop_png, write_page_png};
pub use error::RenderError;
pub use objects::{MAX_FORM_DEPTH, ObjectNode, Transform, collect_image_bounds};
pub use pdfcrop_core;
pub use pdfium::{PdfiumSource, bind_pdfium};
pub use pdfium_render::prelude::Pdfium;
