//! Per-page crop planning.
//!
//! A [`PageInput`] carries everything the document backend knows about a
//! rendered page. [`plan_page`] turns it into an ordered list of crops,
//! drawing each one from a document-wide [`CropBudget`].

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::context::build_crop_context_text;
use crate::geometry::{NativeBounds, PageSize, PixelScale, Rect, native_to_pixels};
use crate::image_crops::select_image_crops;
use crate::lines::{TextLine, build_text_lines};
use crate::options::CropOptions;
use crate::text::{CharItem, NativeChar};
use crate::text_crops::select_text_crops;

/// What a crop was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SourceType {
    /// An embedded raster image.
    #[cfg_attr(feature = "serde", serde(rename = "image-object"))]
    ImageObject,
    /// A block of text lines.
    #[cfg_attr(feature = "serde", serde(rename = "text-block"))]
    TextBlock,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::ImageObject => "image-object",
            SourceType::TextBlock => "text-block",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rendered page as seen by the planner.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageInput {
    /// 1-based page number.
    pub page_number: usize,
    /// Size of the rendered bitmap.
    pub size: PageSize,
    /// Page width in native units.
    pub width_native: f64,
    /// Page height in native units.
    pub height_native: f64,
    /// Pixels per native unit.
    pub scale: PixelScale,
    pub chars: Vec<NativeChar>,
    /// Bounds of embedded image objects.
    pub image_bounds: Vec<NativeBounds>,
    /// Normalized, truncated page text.
    pub page_text: String,
}

impl PageInput {
    /// Glyphs with text and a non-empty footprint, in pixel space.
    pub fn pixel_chars(&self) -> Vec<CharItem> {
        self.chars
            .iter()
            .filter(|ch| !ch.text.is_empty())
            .filter_map(|ch| {
                let bounds = self.to_pixels(&ch.bounds);
                (bounds.width > 0.0 && bounds.height > 0.0)
                    .then(|| CharItem::new(ch.text.clone(), bounds))
            })
            .collect()
    }

    /// Embedded image bounds in pixel space.
    pub fn pixel_images(&self) -> Vec<Rect> {
        self.image_bounds.iter().map(|b| self.to_pixels(b)).collect()
    }

    fn to_pixels(&self, bounds: &NativeBounds) -> Rect {
        native_to_pixels(bounds, self.height_native, self.scale, self.size)
    }
}

/// One crop chosen for a page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannedCrop {
    pub bounds: Rect,
    pub source_type: SourceType,
    pub context_text: String,
}

/// Crops chosen for a page, image crops first.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PagePlan {
    pub page_number: usize,
    pub size: PageSize,
    /// Number of reconstructed text lines.
    pub line_count: usize,
    pub crops: Vec<PlannedCrop>,
}

/// Document-wide cap on emitted crops.
///
/// Safe to share across threads; each successful [`CropBudget::try_take`]
/// permanently consumes one slot.
#[derive(Debug)]
pub struct CropBudget {
    limit: usize,
    used: AtomicUsize,
}

impl CropBudget {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            used: AtomicUsize::new(0),
        }
    }

    /// Claim one slot. Returns `false` once the budget is spent.
    pub fn try_take(&self) -> bool {
        self.used
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |used| {
                (used < self.limit).then_some(used + 1)
            })
            .is_ok()
    }

    pub fn is_exhausted(&self) -> bool {
        self.used.load(Ordering::Acquire) >= self.limit
    }

    pub fn remaining(&self) -> usize {
        self.limit.saturating_sub(self.used.load(Ordering::Acquire))
    }

    pub fn used(&self) -> usize {
        self.used.load(Ordering::Acquire).min(self.limit)
    }
}

/// Select the crops for one page.
///
/// Image crops (with context gathered from nearby lines) come before text
/// crops. Every crop takes a slot from `budget`; when the budget runs out the
/// remaining crops are dropped. A page that starts with an exhausted budget
/// is not analysed at all.
pub fn plan_page(input: &PageInput, options: &CropOptions, budget: &CropBudget) -> PagePlan {
    let mut plan = PagePlan {
        page_number: input.page_number,
        size: input.size,
        line_count: 0,
        crops: Vec::new(),
    };
    if budget.is_exhausted() {
        tracing::debug!(page = input.page_number, "crop budget exhausted, skipping page");
        return plan;
    }

    let chars = input.pixel_chars();
    let lines = build_text_lines(&chars);
    plan.line_count = lines.len();
    tracing::debug!(
        page = input.page_number,
        chars = chars.len(),
        lines = lines.len(),
        images = input.image_bounds.len(),
        "planning page"
    );

    for crop in candidate_crops(input, &lines, options) {
        if !budget.try_take() {
            tracing::debug!(page = input.page_number, "crop budget exhausted mid-page");
            break;
        }
        plan.crops.push(crop);
    }
    plan
}

fn candidate_crops(input: &PageInput, lines: &[TextLine], options: &CropOptions) -> Vec<PlannedCrop> {
    let image_crops = select_image_crops(&input.pixel_images(), input.size, options)
        .into_iter()
        .map(|bounds| PlannedCrop {
            context_text: build_crop_context_text(
                lines,
                &bounds,
                options.context_margin,
                options.max_context_length,
            ),
            bounds,
            source_type: SourceType::ImageObject,
        });
    let text_crops = select_text_crops(lines, input.size, options)
        .into_iter()
        .map(|candidate| PlannedCrop {
            bounds: candidate.bounds,
            source_type: SourceType::TextBlock,
            context_text: candidate.context_text,
        });
    image_crops.chain(text_crops).collect()
}

/// Plan several pages against one budget, in page order.
pub fn plan_pages(inputs: &[PageInput], options: &CropOptions, budget: &CropBudget) -> Vec<PagePlan> {
    inputs
        .iter()
        .map(|input| plan_page(input, options, budget))
        .collect()
}

/// Plan several pages concurrently against one budget.
///
/// Results are ordered like `inputs`, but when the budget is tight which
/// pages receive the last slots depends on scheduling.
#[cfg(feature = "parallel")]
pub fn plan_pages_parallel(
    inputs: &[PageInput],
    options: &CropOptions,
    budget: &CropBudget,
) -> Vec<PagePlan> {
    use rayon::prelude::*;

    inputs
        .par_iter()
        .map(|input| plan_page(input, options, budget))
        .collect()
}
