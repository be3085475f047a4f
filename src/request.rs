//! Strict validation of letterbox requests.
//!
//! The command line normalizes sloppy input: unknown rotations mean none,
//! unknown colors become white, and quality is clamped. Requests coming from
//! outside (a form, a job queue, `--strict`) are rejected instead:
//!
//! | Field | Default | Accepted |
//! |---|---|---|
//! | `rotate` | `none` | `clockwise`, `counter-clockwise`, `none` (any case) |
//! | `color` | `white` | an exact name the [`ColorResolver`] knows |
//! | `quality` | `75` | an integer from 1 to 100 |
//!
//! A field that is present but empty counts as given, so an empty quality
//! is an error rather than the default.

use crate::imaging::{ColorResolver, MaximizeOptions, Quality, Rotation, TargetBox};
use thiserror::Error;

const DEFAULT_ROTATE: &str = "none";
const DEFAULT_COLOR: &str = "white";
const DEFAULT_QUALITY: &str = "75";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("Invalid rotate value: {value:?}. Must be clockwise, counter-clockwise or none")]
    InvalidRotation { value: String },

    #[error("Unknown color name: {value:?}")]
    UnknownColor { value: String },

    #[error("Invalid quality: {value:?}. Must be an integer from 1 to 100")]
    InvalidQuality { value: String },
}

/// Raw request fields, as submitted. `None` means the field was absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestFields<'a> {
    pub rotate: Option<&'a str>,
    pub color: Option<&'a str>,
    pub quality: Option<&'a str>,
}

/// Check every field and build options for `target`, or report the first
/// bad field.
pub fn validate_request(
    fields: RequestFields<'_>,
    colors: &impl ColorResolver,
    target: TargetBox,
) -> Result<MaximizeOptions, RequestError> {
    let rotation = parse_rotation(fields.rotate.unwrap_or(DEFAULT_ROTATE))?;

    let color = fields.color.unwrap_or(DEFAULT_COLOR);
    if colors.resolve(color).is_none() {
        return Err(RequestError::UnknownColor {
            value: color.to_string(),
        });
    }

    let quality = parse_quality(fields.quality.unwrap_or(DEFAULT_QUALITY))?;

    Ok(MaximizeOptions {
        rotation,
        background: color.to_string(),
        quality,
        target,
    })
}

fn parse_rotation(value: &str) -> Result<Rotation, RequestError> {
    match value.to_ascii_lowercase().as_str() {
        "clockwise" => Ok(Rotation::Clockwise),
        "counter-clockwise" => Ok(Rotation::CounterClockwise),
        "none" => Ok(Rotation::None),
        _ => Err(RequestError::InvalidRotation {
            value: value.to_string(),
        }),
    }
}

fn parse_quality(value: &str) -> Result<Quality, RequestError> {
    let invalid = || RequestError::InvalidQuality {
        value: value.to_string(),
    };
    let parsed: i64 = value.trim().parse().map_err(|_| invalid())?;
    if (1..=100).contains(&parsed) {
        Ok(Quality::new(parsed))
    } else {
        Err(invalid())
    }
}
