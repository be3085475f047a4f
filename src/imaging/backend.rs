//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the pixel-level collaborator the letterbox
//! operation delegates to: decode, rotate, resize, create a canvas, paste,
//! and encode. The transformer itself only decides geometry; every failure
//! it reports comes from here.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate.

use super::params::{Placement, Quality, Rgb, Rotation, TargetBox};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl From<Dimensions> for (u32, u32) {
    fn from(d: Dimensions) -> Self {
        (d.width, d.height)
    }
}

/// Metadata blobs carried from the source into the output unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbeddedMetadata {
    /// Raw ICC color profile.
    pub icc_profile: Option<Vec<u8>>,
    /// Raw EXIF block (TIFF header onwards).
    pub exif: Option<Vec<u8>>,
}

/// A decoded image plus the metadata read alongside it.
#[derive(Debug, Clone)]
pub struct Decoded<I> {
    pub image: I,
    pub metadata: EmbeddedMetadata,
}

/// Pixel operations the letterbox transform needs.
///
/// Every backend implements all of them so the orchestration in
/// [`operations`](super::operations) stays backend-agnostic.
pub trait ImageBackend {
    type Image;

    /// Decode an encoded image, capturing its ICC profile and EXIF.
    fn decode(&self, bytes: &[u8]) -> Result<Decoded<Self::Image>, BackendError>;

    fn dimensions(&self, image: &Self::Image) -> Dimensions;

    /// Quarter-turn with the canvas expanded, so nothing is cropped.
    fn rotate(&self, image: Self::Image, rotation: Rotation) -> Result<Self::Image, BackendError>;

    /// Resample to exactly `width` x `height` with a bicubic filter.
    fn resize(
        &self,
        image: &Self::Image,
        width: u32,
        height: u32,
    ) -> Result<Self::Image, BackendError>;

    /// Solid canvas of the target size, in the same color mode as `like`.
    fn canvas(
        &self,
        like: &Self::Image,
        target: TargetBox,
        color: Rgb,
    ) -> Result<Self::Image, BackendError>;

    /// Overwrite the `placement` rectangle of `canvas` with `image`.
    fn paste(
        &self,
        canvas: &mut Self::Image,
        image: &Self::Image,
        placement: Placement,
    ) -> Result<(), BackendError>;

    /// Encode as JPEG, embedding `metadata` verbatim.
    fn encode(
        &self,
        image: &Self::Image,
        quality: Quality,
        metadata: &EmbeddedMetadata,
    ) -> Result<Vec<u8>, BackendError>;
}
