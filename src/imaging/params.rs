//! Parameter types for the letterbox operation.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides the geometry) and the [`backend`](super::backend) (which
//! does the actual pixel work).
//!
//! ## Types
//!
//! - [`Quality`]: JPEG quality (1–100, default 75). Clamped on construction.
//! - [`Rotation`]: Optional quarter turn applied before fitting.
//! - [`TargetBox`]: Canvas dimensions the output must exactly fill.
//! - [`Fit`]: Scaled source dimensions inside the target box.
//! - [`Placement`]: Where the scaled source lands on the canvas.
//! - [`LetterboxParams`]: Fully-resolved plan for one image.

use serde::Serialize;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Quality(u32);

impl Quality {
    /// Clamp any integer into the encoder's valid range.
    ///
    /// Zero is treated like any other too-low value and becomes 1.
    pub fn new(value: i64) -> Self {
        Self(value.clamp(1, 100) as u32)
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(75)
    }
}

/// Quarter-turn rotation applied to the source before fitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rotation {
    #[default]
    None,
    Clockwise,
    CounterClockwise,
}

impl Rotation {
    /// Parse a user-supplied direction, case-insensitively.
    ///
    /// Anything that isn't `clockwise` or `counter-clockwise` (including an
    /// empty string) means no rotation.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::to_ascii_lowercase).as_deref() {
            Some("clockwise") => Self::Clockwise,
            Some("counter-clockwise") => Self::CounterClockwise,
            _ => Self::None,
        }
    }

    /// Dimensions after applying this rotation to a `(width, height)` image.
    pub fn apply_to(self, (width, height): (u32, u32)) -> (u32, u32) {
        match self {
            Self::None => (width, height),
            Self::Clockwise | Self::CounterClockwise => (height, width),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Clockwise => "clockwise",
            Self::CounterClockwise => "counter-clockwise",
        }
    }
}

/// Canvas the output image must exactly fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TargetBox {
    pub width: u32,
    pub height: u32,
}

impl TargetBox {
    /// Instagram's largest portrait post (4:5).
    pub const INSTAGRAM_PORTRAIT: Self = Self {
        width: 1080,
        height: 1350,
    };

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for TargetBox {
    fn default() -> Self {
        Self::INSTAGRAM_PORTRAIT
    }
}

/// Which side of the canvas receives background fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Fill {
    /// Height is bound to the canvas; bars on the left and right.
    Sides,
    /// Width is bound to the canvas; bars on top and bottom.
    TopBottom,
}

/// Scaled source dimensions, never larger than the target box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Fit {
    pub width: u32,
    pub height: u32,
    pub fill: Fill,
}

/// Paste rectangle on the canvas, as `(left, upper, right, lower)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub left: u32,
    pub upper: u32,
    pub right: u32,
    pub lower: u32,
}

impl Placement {
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.lower - self.upper
    }
}

/// An sRGB background color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
    };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Everything decided for one letterbox run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LetterboxParams {
    /// Source dimensions as decoded, before rotation.
    pub source: (u32, u32),
    pub rotation: Rotation,
    /// Source dimensions after rotation; what the fit is computed from.
    pub rotated: (u32, u32),
    pub target: TargetBox,
    pub fit: Fit,
    pub placement: Placement,
    /// Color name actually used, after fallback.
    pub background_name: String,
    pub background: Rgb,
    pub quality: Quality,
}
