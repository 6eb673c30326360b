use std::fs;
use std::path::Path;

use pdfcrop_core::{CropBudget, CropOptions, ExtractionOutput, RenderOptions, plan_page};
use pdfcrop_render::{PageSource, RenderError, write_crop_png, write_page_png};

use crate::cli::ExtractArgs;
use crate::shared::{ProgressReporter, load_pdfium, open_pdf, require_file, resolve_options};

pub fn run(args: &ExtractArgs) -> Result<(), i32> {
    let (crop_options, render_options) = resolve_options(args)?;
    require_file(&args.file)?;

    fs::create_dir_all(&args.output_dir).map_err(|e| {
        eprintln!(
            "Error: cannot create output directory {}: {e}",
            args.output_dir.display()
        );
        1
    })?;

    let pdfium = load_pdfium(args.pdfium_lib.as_deref())?;
    let source = open_pdf(&pdfium, &args.file)?;
    let progress = ProgressReporter::new(render_options.pages_to_render(source.page_count()));

    let output = extract_document(
        &source,
        &args.output_dir,
        &crop_options,
        &render_options,
        &progress,
    )
    .map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;
    progress.finish();

    let json = serde_json::to_string(&output).map_err(|e| {
        eprintln!("Error: failed to serialize output: {e}");
        1
    })?;
    println!("{json}");
    Ok(())
}

/// Render pages, write page and crop PNGs into `dir` and describe them.
///
/// Crops are drawn from one budget of `render.max_total_crops` in page
/// order; once it is spent later pages are still rendered and saved but get
/// no crops.
pub fn extract_document<S: PageSource + ?Sized>(
    source: &S,
    dir: &Path,
    crop: &CropOptions,
    render: &RenderOptions,
    progress: &ProgressReporter,
) -> Result<ExtractionOutput, RenderError> {
    let budget = CropBudget::new(render.max_total_crops);
    let mut output = ExtractionOutput::default();

    for index in 0..render.pages_to_render(source.page_count()) {
        progress.report(index + 1, output.image_candidates.len());
        let page = source.load_page(index, render)?;
        let page_number = page.input.page_number;
        output
            .page_image_files
            .push(write_page_png(&page.bitmap, dir, page_number)?);

        let plan = plan_page(&page.input, crop, &budget);
        let mut seq = 0;
        for planned in &plan.crops {
            match write_crop_png(
                &page.bitmap,
                dir,
                page_number,
                seq + 1,
                planned,
                &page.input.page_text,
            ) {
                Ok(record) => {
                    seq += 1;
                    output.image_candidates.push(record);
                }
                Err(RenderError::EmptyCrop { .. }) => {
                    tracing::warn!(page = page_number, bounds = ?planned.bounds, "skipping empty crop");
                }
                Err(e) => return Err(e),
            }
        }
    }

    tracing::debug!(
        pages = output.page_image_files.len(),
        crops = output.image_candidates.len(),
        budget_left = budget.remaining(),
        "extraction finished"
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};
    use pdfcrop_core::{NativeBounds, NativeChar, PageInput, PageSize, PixelScale, SourceType};
    use pdfcrop_render::LoadedPage;

    /// Pages of 500x500 points, each holding one 200x150 point figure and a
    /// two-line caption under it.
    struct FigurePages(usize);

    fn caption(text: &str, x: f64, top: f64) -> Vec<NativeChar> {
        text.chars()
            .enumerate()
            .map(|(i, c)| {
                let left = x + i as f64 * 5.0;
                NativeChar::new(c.to_string(), NativeBounds::new(left, top - 8.0, left + 5.0, top))
            })
            .collect()
    }

    impl PageSource for FigurePages {
        fn page_count(&self) -> usize {
            self.0
        }

        fn load_page(&self, index: usize, options: &RenderOptions) -> Result<LoadedPage, RenderError> {
            if index >= self.0 {
                return Err(RenderError::PageOutOfRange {
                    index,
                    count: self.0,
                });
            }
            let scale = options.render_scale(500.0, 500.0);
            let side = (500.0 * scale).round() as u32;
            let size = PageSize::new(side, side)?;
            let mut chars = caption("Figure 1: request latency per region", 50.0, 240.0);
            chars.extend(caption("measured at the edge over one week", 50.0, 228.0));
            Ok(LoadedPage {
                input: PageInput {
                    page_number: index + 1,
                    size,
                    width_native: 500.0,
                    height_native: 500.0,
                    scale: PixelScale::between(size, 500.0, 500.0),
                    chars,
                    image_bounds: vec![NativeBounds::new(50.0, 250.0, 250.0, 400.0)],
                    page_text: "Figure 1: request latency per region".to_string(),
                },
                bitmap: DynamicImage::ImageRgb8(RgbImage::new(side, side)),
            })
        }
    }

    #[test]
    fn extract_writes_pages_and_crops() {
        let dir = tempfile::tempdir().unwrap();
        let render = RenderOptions {
            base_render_scale: 2.0,
            ..RenderOptions::default()
        };
        let output = extract_document(
            &FigurePages(2),
            dir.path(),
            &CropOptions::default(),
            &render,
            &ProgressReporter::silent(2),
        )
        .unwrap();

        assert_eq!(output.page_image_files.len(), 2);
        assert!(dir.path().join("page-1.png").exists());
        assert!(dir.path().join("page-2.png").exists());

        let first = &output.image_candidates[0];
        assert_eq!(first.page_number, 1);
        assert_eq!(first.file_name, "page-1-crop-1.png");
        assert_eq!(first.source_type, SourceType::ImageObject);
        // 200x150 points at 2x
        assert_eq!((first.width, first.height), (400, 300));
        assert!(first.context_text.starts_with("Figure 1: request latency"));
        assert_eq!(first.page_text, "Figure 1: request latency per region");

        for record in &output.image_candidates {
            assert!(dir.path().join(&record.file_name).exists(), "{}", record.file_name);
        }
        assert!(output
            .image_candidates
            .iter()
            .any(|r| r.source_type == SourceType::TextBlock));
    }

    #[test]
    fn extract_respects_total_budget() {
        let dir = tempfile::tempdir().unwrap();
        let render = RenderOptions {
            base_render_scale: 2.0,
            max_total_crops: 3,
            ..RenderOptions::default()
        };
        let output = extract_document(
            &FigurePages(4),
            dir.path(),
            &CropOptions::default(),
            &render,
            &ProgressReporter::silent(4),
        )
        .unwrap();

        assert_eq!(output.page_image_files.len(), 4);
        assert_eq!(output.image_candidates.len(), 3);
        let names: Vec<&str> = output
            .image_candidates
            .iter()
            .map(|r| r.file_name.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["page-1-crop-1.png", "page-1-crop-2.png", "page-2-crop-1.png"]
        );
    }

    #[test]
    fn extract_stops_at_max_pages() {
        let dir = tempfile::tempdir().unwrap();
        let render = RenderOptions {
            base_render_scale: 2.0,
            max_pages: 1,
            ..RenderOptions::default()
        };
        let output = extract_document(
            &FigurePages(3),
            dir.path(),
            &CropOptions::default(),
            &render,
            &ProgressReporter::silent(1),
        )
        .unwrap();
        assert_eq!(output.page_image_files.len(), 1);
        assert!(!dir.path().join("page-2.png").exists());
    }
}
