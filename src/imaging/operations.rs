//! High-level letterbox operations.
//!
//! These functions combine calculations with backend execution. They take
//! options, plan the geometry, and drive the backend through rotate →
//! resize → canvas → paste → encode. Nothing here validates input beyond
//! clamping quality and falling back to the default background color; every
//! other failure is the backend's, passed through as-is.

use super::backend::{BackendError, Decoded, ImageBackend};
use super::calculations::{center_placement, fit_dimensions};
use super::color::{ColorResolver, DEFAULT_BACKGROUND, resolve_background};
use super::params::{LetterboxParams, Quality, Rotation, TargetBox};
use std::path::Path;
use tracing::info;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Caller-facing knobs for one letterbox run.
#[derive(Debug, Clone, PartialEq)]
pub struct MaximizeOptions {
    pub rotation: Rotation,
    /// Color name, looked up through a [`ColorResolver`].
    pub background: String,
    pub quality: Quality,
    pub target: TargetBox,
}

impl Default for MaximizeOptions {
    fn default() -> Self {
        Self {
            rotation: Rotation::None,
            background: DEFAULT_BACKGROUND.to_string(),
            quality: Quality::default(),
            target: TargetBox::default(),
        }
    }
}

/// Encoded output plus the plan that produced it.
#[derive(Debug, Clone)]
pub struct Maximized {
    pub bytes: Vec<u8>,
    pub params: LetterboxParams,
}

/// Plan a letterbox run without touching pixels.
///
/// `source` is the decoded size before rotation.
pub fn plan_letterbox(
    source: (u32, u32),
    options: &MaximizeOptions,
    colors: &impl ColorResolver,
) -> LetterboxParams {
    plan_rotated(source, options.rotation.apply_to(source), options, colors)
}

/// Plan from the size the rotation actually produced.
fn plan_rotated(
    source: (u32, u32),
    rotated: (u32, u32),
    options: &MaximizeOptions,
    colors: &impl ColorResolver,
) -> LetterboxParams {
    let fit = fit_dimensions(rotated, options.target);
    let placement = center_placement(&fit, options.target);
    let (background_name, background) = resolve_background(colors, &options.background);

    LetterboxParams {
        source,
        rotation: options.rotation,
        rotated,
        target: options.target,
        fit,
        placement,
        background_name,
        background,
        quality: options.quality,
    }
}

/// Rotate, fit, and center an already-decoded image on a solid canvas, then
/// encode it.
///
/// The output is always exactly `options.target` in size. The source's ICC
/// profile and EXIF are embedded unchanged.
pub fn maximize<B: ImageBackend>(
    backend: &B,
    colors: &impl ColorResolver,
    source: Decoded<B::Image>,
    options: &MaximizeOptions,
) -> Result<Maximized> {
    let Decoded { image, metadata } = source;
    let source_dims = backend.dimensions(&image).into();
    let rotated = backend.rotate(image, options.rotation)?;
    // Fit whatever the rotation produced, not the size it was expected to have
    let params = plan_rotated(
        source_dims,
        backend.dimensions(&rotated).into(),
        options,
        colors,
    );
    info!(
        source = ?params.source,
        rotation = params.rotation.as_str(),
        rotated = ?params.rotated,
        fit = ?(params.fit.width, params.fit.height),
        left = params.placement.left,
        upper = params.placement.upper,
        background = %params.background_name,
        quality = params.quality.value(),
        "letterboxing"
    );

    let (fit_w, fit_h) = (params.fit.width, params.fit.height);
    let current = backend.dimensions(&rotated);
    let scaled = if (current.width, current.height) == (fit_w, fit_h) {
        rotated
    } else {
        backend.resize(&rotated, fit_w, fit_h)?
    };

    let mut canvas = backend.canvas(&scaled, params.target, params.background)?;
    backend.paste(&mut canvas, &scaled, params.placement)?;
    let bytes = backend.encode(&canvas, params.quality, &metadata)?;

    Ok(Maximized { bytes, params })
}

/// Decode `input` and run [`maximize`] on it.
pub fn maximize_bytes<B: ImageBackend>(
    backend: &B,
    colors: &impl ColorResolver,
    input: &[u8],
    options: &MaximizeOptions,
) -> Result<Maximized> {
    let source = backend.decode(input)?;
    maximize(backend, colors, source, options)
}

/// Read `input`, letterbox it, and write the JPEG to `output`.
///
/// The output file is only created once encoding has succeeded.
pub fn maximize_file<B: ImageBackend>(
    backend: &B,
    colors: &impl ColorResolver,
    input: &Path,
    output: &Path,
    options: &MaximizeOptions,
) -> Result<LetterboxParams> {
    let bytes = std::fs::read(input)?;
    let result = maximize_bytes(backend, colors, &bytes, options)?;
    std::fs::write(output, &result.bytes)?;
    info!(path = %output.display(), bytes = result.bytes.len(), "wrote output");
    Ok(result.params)
}
