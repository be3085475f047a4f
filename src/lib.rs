//! # InstaMax
//!
//! Maximize an image to the largest size Instagram accepts without cropping
//! it. The picture is scaled to fit a fixed 1080×1350 canvas, centered, and
//! the leftover space is filled with a solid color. Landscape shots can be
//! turned a quarter first, since a sideways photo gets more pixels on a
//! portrait canvas.
//!
//! # Pipeline
//!
//! ```text
//! decode → rotate → fit → resize → canvas → paste → encode (JPEG)
//! ```
//!
//! Only the fit and the placement involve decisions; both are pure functions
//! in [`imaging`]. Pixel work is delegated to an [`imaging::ImageBackend`], so
//! the orchestration can be tested without decoding anything.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Fit math, color lookup, the backend trait, and the `image`-crate backend |
//! | [`config`] | Optional TOML config: canvas size, background, quality |
//! | [`output`] | CLI summary formatting (text and JSON) |
//! | [`request`] | Strict validation of rotate/color/quality, rejecting instead of normalizing |
//!
//! # Example
//!
//! ```no_run
//! use instamax::imaging::{CssColors, MaximizeOptions, Rotation, RustBackend, maximize_file};
//! use std::path::Path;
//!
//! let options = MaximizeOptions {
//!     rotation: Rotation::Clockwise,
//!     ..MaximizeOptions::default()
//! };
//! let params = maximize_file(
//!     &RustBackend::new(),
//!     &CssColors,
//!     Path::new("landscape.jpg"),
//!     Path::new("landscape-ig.jpg"),
//!     &options,
//! )?;
//! assert_eq!(params.target.width, 1080);
//! # Ok::<(), instamax::imaging::BackendError>(())
//! ```
//!
//! # Design Decisions
//!
//! ## No Cropping, Ever
//!
//! The scale factor is chosen so the whole source fits; one axis touches the
//! canvas edge and the other gets bars. Rounding is half away from zero on
//! the free axis, and it is computed in integers so the result is identical
//! on every platform.
//!
//! ## Metadata Passes Through Untouched
//!
//! The source's ICC profile and EXIF block are copied into the output as-is,
//! including the orientation tag. Pixels are never auto-oriented; rotation is
//! only what the caller asks for.

pub mod config;
pub mod imaging;
pub mod output;
pub mod request;
