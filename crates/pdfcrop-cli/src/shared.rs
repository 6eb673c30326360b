use std::io::{self, IsTerminal, Write};
use std::path::Path;

use pdfcrop_core::{CropOptions, RenderOptions};
use pdfcrop_render::{Pdfium, PdfiumSource, bind_pdfium};
use tracing_subscriber::EnvFilter;

use crate::cli::ExtractArgs;

/// Send logs to stderr so stdout carries only JSON.
///
/// `RUST_LOG` wins when set; otherwise warnings only, or debug with `-v`.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// Build and validate the options named on the command line.
///
/// Returns `Err(2)` with a message printed to stderr for inconsistent values.
pub fn resolve_options(args: &ExtractArgs) -> Result<(CropOptions, RenderOptions), i32> {
    let crop = args.crop_options();
    let render = args.render_options();
    crop.validate().and_then(|()| render.validate()).map_err(|e| {
        eprintln!("Error: {e}");
        2
    })?;
    Ok((crop, render))
}

/// Fail early with a friendly message if `file` does not exist.
pub fn require_file(file: &Path) -> Result<(), i32> {
    if file.exists() {
        Ok(())
    } else {
        eprintln!("Error: file not found: {}", file.display());
        Err(1)
    }
}

/// Bind pdfium, preferring `library_dir` when given.
pub fn load_pdfium(library_dir: Option<&Path>) -> Result<Pdfium, i32> {
    bind_pdfium(library_dir).map_err(|e| {
        eprintln!("Error: failed to load the pdfium library: {e}");
        1
    })
}

/// Open a PDF file with user-friendly error messages.
pub fn open_pdf<'a>(pdfium: &'a Pdfium, file: &Path) -> Result<PdfiumSource<'a>, i32> {
    PdfiumSource::open(pdfium, file).map_err(|e| {
        eprintln!("Error: failed to open PDF: {e}");
        1
    })
}

/// Per-page status line on stderr: the page being worked on and how many
/// crops have been taken so far. Silent unless stderr is a terminal.
pub struct ProgressReporter {
    total: usize,
    is_tty: bool,
}

impl ProgressReporter {
    pub fn new(total_pages: usize) -> Self {
        Self {
            total: total_pages,
            is_tty: io::stderr().is_terminal(),
        }
    }

    #[cfg(test)]
    pub fn silent(total_pages: usize) -> Self {
        Self {
            total: total_pages,
            is_tty: false,
        }
    }

    fn status_line(&self, page: usize, crops: usize) -> String {
        let noun = if crops == 1 { "crop" } else { "crops" };
        format!("page {page}/{}, {crops} {noun} so far", self.total)
    }

    /// Show that 1-based `page` is starting with `crops` already taken.
    pub fn report(&self, page: usize, crops: usize) {
        if self.is_tty {
            eprint!("\r{:<48}", self.status_line(page, crops));
            let _ = io::stderr().flush();
        }
    }

    /// Clear the status line.
    pub fn finish(&self) {
        if self.is_tty {
            eprint!("\r{:48}\r", "");
            let _ = io::stderr().flush();
        }
    }
}
