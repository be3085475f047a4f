//! Image processing: fit, letterbox, re-encode.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (JPEG, PNG, TIFF, WebP) |
//! | **Rotate** | `rotate90` / `rotate270` |
//! | **Resize** | `resize_exact` with CatmullRom (bicubic) |
//! | **Canvas + paste** | `RgbaImage::from_pixel` + `imageops::replace` |
//! | **Encode → JPEG** | `JpegEncoder` with `set_icc_profile` / `set_exif_metadata` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for fit and placement math (unit testable)
//! - **Parameters**: Data structures describing the operation
//! - **Color**: [`ColorResolver`] capability and the CSS named-color table
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod color;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Decoded, Dimensions, EmbeddedMetadata, ImageBackend};
pub use calculations::{center_placement, fit_dimensions};
pub use color::{ColorResolver, CssColors, DEFAULT_BACKGROUND};
pub use operations::{
    MaximizeOptions, Maximized, maximize, maximize_bytes, maximize_file, plan_letterbox,
};
pub use params::{Fill, Fit, LetterboxParams, Placement, Quality, Rgb, Rotation, TargetBox};
pub use rust_backend::RustBackend;
