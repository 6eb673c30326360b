use pdfcrop_core::{CropBudget, CropOptions, PagePlan, RenderOptions, plan_page};
use pdfcrop_render::{PageSource, RenderError};
use serde_json::{Value, json};

use crate::cli::ExtractArgs;
use crate::shared::{ProgressReporter, load_pdfium, open_pdf, require_file, resolve_options};

pub fn run(args: &ExtractArgs) -> Result<(), i32> {
    let (crop_options, render_options) = resolve_options(args)?;
    require_file(&args.file)?;

    let pdfium = load_pdfium(args.pdfium_lib.as_deref())?;
    let source = open_pdf(&pdfium, &args.file)?;
    let progress = ProgressReporter::new(render_options.pages_to_render(source.page_count()));

    let plans = plan_document(&source, &crop_options, &render_options, &progress).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;
    progress.finish();

    for plan in &plans {
        println!("{}", plan_json(plan));
    }
    Ok(())
}

/// Plan every rendered page against one crop budget without writing files.
pub fn plan_document<S: PageSource + ?Sized>(
    source: &S,
    crop: &CropOptions,
    render: &RenderOptions,
    progress: &ProgressReporter,
) -> Result<Vec<PagePlan>, RenderError> {
    let budget = CropBudget::new(render.max_total_crops);
    let mut plans = Vec::new();
    for index in 0..render.pages_to_render(source.page_count()) {
        progress.report(index + 1, budget.used());
        let page = source.load_page(index, render)?;
        plans.push(plan_page(&page.input, crop, &budget));
    }
    Ok(plans)
}

/// One JSON line per page: its size, line count and planned crop boxes.
pub fn plan_json(plan: &PagePlan) -> Value {
    let crops: Vec<Value> = plan
        .crops
        .iter()
        .map(|c| {
            json!({
                "sourceType": c.source_type.as_str(),
                "x": c.bounds.x,
                "y": c.bounds.y,
                "width": c.bounds.width,
                "height": c.bounds.height,
                "contextText": c.context_text,
            })
        })
        .collect();
    json!({
        "pageNumber": plan.page_number,
        "width": plan.size.width,
        "height": plan.size.height,
        "lineCount": plan.line_count,
        "crops": crops,
    })
}
