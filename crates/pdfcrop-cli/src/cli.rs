use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use pdfcrop_core::{CropOptions, RenderOptions};

/// Render PDF pages and save figure and text-block crops with nearby text.
#[derive(Debug, Parser)]
#[command(name = "pdfcrop", about, version)]
pub struct Cli {
    /// Log debug details to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render pages, save crops and print a JSON manifest
    Extract(ExtractArgs),

    /// Print the crops that would be saved, without writing any files
    Plan(ExtractArgs),
}

/// Arguments shared by `extract` and `plan`.
#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Path to the PDF file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Directory for page and crop PNG files (created if missing)
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Directory holding the pdfium shared library. Default: system search path
    #[arg(long, value_name = "DIR")]
    pub pdfium_lib: Option<PathBuf>,

    /// Maximum pages to render, from the first page
    #[arg(long, default_value_t = RenderOptions::default().max_pages)]
    pub max_pages: usize,

    /// Maximum crops saved for the whole document
    #[arg(long, default_value_t = RenderOptions::default().max_total_crops)]
    pub max_total_crops: usize,

    /// Maximum image crops per page (0 disables image crops)
    #[arg(long, default_value_t = CropOptions::default().max_image_crops_per_page)]
    pub max_image_crops_per_page: usize,

    /// Maximum text crops per page (0 disables text crops)
    #[arg(long, default_value_t = CropOptions::default().max_text_crops_per_page)]
    pub max_text_crops_per_page: usize,

    /// Longest rendered page side in pixels (0 for no cap)
    #[arg(long, default_value_t = RenderOptions::default().max_render_dimension)]
    pub max_render_dimension: u32,

    /// Preferred pixels per PDF point
    #[arg(long, default_value_t = RenderOptions::default().base_render_scale)]
    pub base_render_scale: f64,

    /// Minimum crop edge in pixels
    #[arg(long, default_value_t = CropOptions::default().min_crop_edge)]
    pub min_crop_edge_px: f64,

    /// Smallest page fraction an image crop may cover
    #[arg(long, default_value_t = CropOptions::default().min_crop_area_ratio)]
    pub min_crop_area_ratio: f64,

    /// Largest page fraction an image crop may cover
    #[arg(long, default_value_t = CropOptions::default().max_crop_area_ratio)]
    pub max_crop_area_ratio: f64,

    /// Margin around image crops when collecting context text, in pixels
    #[arg(long, default_value_t = CropOptions::default().context_margin)]
    pub crop_context_margin_px: f64,

    /// Maximum characters of context text per crop
    #[arg(long, default_value_t = CropOptions::default().max_context_length)]
    pub max_context_length: usize,

    /// Maximum characters of page text per crop
    #[arg(long, default_value_t = RenderOptions::default().max_page_text_length)]
    pub max_page_text_length: usize,

    /// Padding around text blocks in pixels
    #[arg(long, default_value_t = CropOptions::default().text_block_padding)]
    pub text_block_padding_px: f64,

    /// Minimum padded text block height in pixels
    #[arg(long, default_value_t = CropOptions::default().min_text_block_height)]
    pub min_text_block_height_px: f64,

    /// Minimum characters in a text block
    #[arg(long, default_value_t = CropOptions::default().min_text_block_chars)]
    pub min_text_block_char_length: usize,

    /// Minimum lines in a text block
    #[arg(long, default_value_t = CropOptions::default().min_text_lines_per_block)]
    pub min_text_lines_per_block: usize,

    /// Maximum lines in a text block
    #[arg(long, default_value_t = CropOptions::default().max_text_lines_per_block)]
    pub max_text_lines_per_block: usize,
}

impl ExtractArgs {
    /// Selection thresholds from the command line; fixed heuristics keep
    /// their defaults.
    pub fn crop_options(&self) -> CropOptions {
        CropOptions {
            min_crop_edge: self.min_crop_edge_px,
            min_crop_area_ratio: self.min_crop_area_ratio,
            max_crop_area_ratio: self.max_crop_area_ratio,
            max_image_crops_per_page: self.max_image_crops_per_page,
            max_text_crops_per_page: self.max_text_crops_per_page,
            text_block_padding: self.text_block_padding_px,
            min_text_block_height: self.min_text_block_height_px,
            min_text_block_chars: self.min_text_block_char_length,
            min_text_lines_per_block: self.min_text_lines_per_block,
            max_text_lines_per_block: self.max_text_lines_per_block,
            context_margin: self.crop_context_margin_px,
            max_context_length: self.max_context_length,
            ..CropOptions::default()
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            max_pages: self.max_pages,
            max_total_crops: self.max_total_crops,
            max_render_dimension: self.max_render_dimension,
            base_render_scale: self.base_render_scale,
            max_page_text_length: self.max_page_text_length,
        }
    }
}
