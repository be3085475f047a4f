//! CLI output formatting.
//!
//! After a run the binary prints what it decided:
//!
//! ```text
//! photo.jpg → photo-ig.jpg
//!     Source: 2000x1000
//!     Rotate: none
//!     Scaled: 1080x540 (fill top and bottom)
//!     Canvas: 1080x1350 white
//!     Offset: 0,405
//!     Quality: 75
//! ```
//!
//! [`format_summary`] is pure and returns lines for testability;
//! [`print_summary`] writes them to stdout. [`summary_json`] is the
//! machine-readable form behind `--json`.

use crate::imaging::{Fill, LetterboxParams};
use serde::Serialize;
use std::path::Path;

fn fill_label(fill: Fill) -> &'static str {
    match fill {
        Fill::Sides => "fill left and right",
        Fill::TopBottom => "fill top and bottom",
    }
}

/// Human-readable summary of one run.
pub fn format_summary(params: &LetterboxParams, input: &Path, output: &Path) -> Vec<String> {
    let mut lines = vec![format!("{} → {}", input.display(), output.display())];

    let (src_w, src_h) = params.source;
    lines.push(format!("    Source: {src_w}x{src_h}"));
    lines.push(format!("    Rotate: {}", params.rotation.as_str()));

    let fit = &params.fit;
    if (fit.width, fit.height) == (params.target.width, params.target.height) {
        lines.push(format!("    Scaled: {}x{}", fit.width, fit.height));
    } else {
        lines.push(format!(
            "    Scaled: {}x{} ({})",
            fit.width,
            fit.height,
            fill_label(fit.fill)
        ));
    }

    lines.push(format!(
        "    Canvas: {}x{} {}",
        params.target.width, params.target.height, params.background_name
    ));
    lines.push(format!(
        "    Offset: {},{}",
        params.placement.left, params.placement.upper
    ));
    lines.push(format!("    Quality: {}", params.quality.value()));
    lines
}

pub fn print_summary(params: &LetterboxParams, input: &Path, output: &Path) {
    for line in format_summary(params, input, output) {
        println!("{line}");
    }
}

#[derive(Serialize)]
struct Summary<'a> {
    input: &'a Path,
    output: &'a Path,
    #[serde(flatten)]
    params: &'a LetterboxParams,
}

/// Pretty-printed JSON summary of one run.
pub fn summary_json(
    params: &LetterboxParams,
    input: &Path,
    output: &Path,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&Summary {
        input,
        output,
        params,
    })
}
