//! Error types for pdfcrop-core.
//!
//! The geometry and selection algorithms are total and never fail. Errors
//! only come from validating caller input before those algorithms run.

use thiserror::Error;

/// Invalid input rejected before crop planning.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CropError {
    /// A page has a zero pixel dimension.
    #[error("invalid page size: {width}x{height} pixels")]
    InvalidPageSize {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },

    /// A configuration value is out of range or inconsistent with another.
    #[error("invalid option `{name}`: {reason}")]
    InvalidOption {
        /// Option field name (e.g. "min_crop_area_ratio").
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl CropError {
    pub(crate) fn option(name: &'static str, reason: impl Into<String>) -> Self {
        CropError::InvalidOption {
            name,
            reason: reason.into(),
        }
    }
}
