//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::ImageReader` with content sniffing |
//! | ICC / EXIF capture | `image::ImageDecoder::{icc_profile, exif_metadata}` |
//! | Rotate | `DynamicImage::rotate90` / `rotate270` (lossless, dimensions swap) |
//! | Resize | `DynamicImage::resize_exact` with `CatmullRom` (bicubic) |
//! | Canvas | `RgbaImage::from_pixel`, converted to the source's color mode |
//! | Paste | `image::imageops::replace` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder`, ICC and EXIF via `ImageEncoder::{set_icc_profile, set_exif_metadata}` |

use super::backend::{BackendError, Decoded, Dimensions, EmbeddedMetadata, ImageBackend};
use super::params::{Placement, Quality, Rgb, Rotation, TargetBox};
use image::codecs::jpeg::JpegEncoder;
use image::error::UnsupportedError;
use image::imageops::{self, FilterType};
use image::{ColorType, DynamicImage, ImageDecoder, ImageEncoder, ImageReader, Rgba, RgbaImage};
use std::io::Cursor;
use tracing::debug;

/// Pure Rust backend using the `image` crate.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_failed(e: image::ImageError) -> BackendError {
    BackendError::ProcessingFailed(format!("Failed to decode image: {e}"))
}

/// APP1 preamble some decoders leave in front of the TIFF block.
const EXIF_PREAMBLE: &[u8] = b"Exif\0\0";

fn bare_exif(exif: &[u8]) -> &[u8] {
    exif.strip_prefix(EXIF_PREAMBLE).unwrap_or(exif)
}

fn metadata_rejected(what: &str, e: UnsupportedError) -> BackendError {
    BackendError::ProcessingFailed(format!("Cannot embed {what}: {e}"))
}

fn unsupported_mode(color: ColorType) -> BackendError {
    BackendError::ProcessingFailed(format!("Unsupported color mode: {color:?}"))
}

impl ImageBackend for RustBackend {
    type Image = DynamicImage;

    fn decode(&self, bytes: &[u8]) -> Result<Decoded<DynamicImage>, BackendError> {
        let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
        let format = reader.format();
        let mut decoder = reader.into_decoder().map_err(decode_failed)?;

        // Metadata is best-effort; a broken profile shouldn't sink the pixels
        let metadata = EmbeddedMetadata {
            icc_profile: decoder.icc_profile().ok().flatten(),
            exif: decoder
                .exif_metadata()
                .ok()
                .flatten()
                .map(|exif| bare_exif(&exif).to_vec()),
        };
        let image = DynamicImage::from_decoder(decoder).map_err(decode_failed)?;

        debug!(
            ?format,
            width = image.width(),
            height = image.height(),
            color = ?image.color(),
            icc = metadata.icc_profile.is_some(),
            exif = metadata.exif.is_some(),
            "decoded source"
        );
        Ok(Decoded { image, metadata })
    }

    fn dimensions(&self, image: &DynamicImage) -> Dimensions {
        Dimensions {
            width: image.width(),
            height: image.height(),
        }
    }

    fn rotate(
        &self,
        image: DynamicImage,
        rotation: Rotation,
    ) -> Result<DynamicImage, BackendError> {
        Ok(match rotation {
            Rotation::None => image,
            Rotation::Clockwise => image.rotate90(),
            Rotation::CounterClockwise => image.rotate270(),
        })
    }

    fn resize(
        &self,
        image: &DynamicImage,
        width: u32,
        height: u32,
    ) -> Result<DynamicImage, BackendError> {
        Ok(image.resize_exact(width, height, FilterType::CatmullRom))
    }

    fn canvas(
        &self,
        like: &DynamicImage,
        target: TargetBox,
        color: Rgb,
    ) -> Result<DynamicImage, BackendError> {
        let fill = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            target.width,
            target.height,
            Rgba([color.r, color.g, color.b, u8::MAX]),
        ));
        Ok(match like.color() {
            ColorType::L8 => DynamicImage::ImageLuma8(fill.to_luma8()),
            ColorType::La8 => DynamicImage::ImageLumaA8(fill.to_luma_alpha8()),
            ColorType::Rgb8 => DynamicImage::ImageRgb8(fill.to_rgb8()),
            ColorType::Rgba8 => fill,
            ColorType::L16 => DynamicImage::ImageLuma16(fill.to_luma16()),
            ColorType::La16 => DynamicImage::ImageLumaA16(fill.to_luma_alpha16()),
            ColorType::Rgb16 => DynamicImage::ImageRgb16(fill.to_rgb16()),
            ColorType::Rgba16 => DynamicImage::ImageRgba16(fill.to_rgba16()),
            ColorType::Rgb32F => DynamicImage::ImageRgb32F(fill.to_rgb32f()),
            ColorType::Rgba32F => DynamicImage::ImageRgba32F(fill.to_rgba32f()),
            other => return Err(unsupported_mode(other)),
        })
    }

    fn paste(
        &self,
        canvas: &mut DynamicImage,
        image: &DynamicImage,
        placement: Placement,
    ) -> Result<(), BackendError> {
        if (placement.width(), placement.height()) != (image.width(), image.height()) {
            return Err(BackendError::ProcessingFailed(format!(
                "Paste box {}x{} does not match image {}x{}",
                placement.width(),
                placement.height(),
                image.width(),
                image.height()
            )));
        }

        let (x, y) = (i64::from(placement.left), i64::from(placement.upper));
        // Straight overwrite in the canvas's own mode, no blending
        match canvas {
            DynamicImage::ImageLuma8(c) => imageops::replace(c, &image.to_luma8(), x, y),
            DynamicImage::ImageLumaA8(c) => imageops::replace(c, &image.to_luma_alpha8(), x, y),
            DynamicImage::ImageRgb8(c) => imageops::replace(c, &image.to_rgb8(), x, y),
            DynamicImage::ImageRgba8(c) => imageops::replace(c, &image.to_rgba8(), x, y),
            DynamicImage::ImageLuma16(c) => imageops::replace(c, &image.to_luma16(), x, y),
            DynamicImage::ImageLumaA16(c) => {
                imageops::replace(c, &image.to_luma_alpha16(), x, y)
            }
            DynamicImage::ImageRgb16(c) => imageops::replace(c, &image.to_rgb16(), x, y),
            DynamicImage::ImageRgba16(c) => imageops::replace(c, &image.to_rgba16(), x, y),
            DynamicImage::ImageRgb32F(c) => imageops::replace(c, &image.to_rgb32f(), x, y),
            DynamicImage::ImageRgba32F(c) => imageops::replace(c, &image.to_rgba32f(), x, y),
            other => return Err(unsupported_mode(other.color())),
        }
        Ok(())
    }

    fn encode(
        &self,
        image: &DynamicImage,
        quality: Quality,
        metadata: &EmbeddedMetadata,
    ) -> Result<Vec<u8>, BackendError> {
        // Baseline JPEG is 8-bit gray or RGB; alpha and extra depth are dropped
        let flat = if image.color().has_color() {
            DynamicImage::ImageRgb8(image.to_rgb8())
        } else {
            DynamicImage::ImageLuma8(image.to_luma8())
        };

        let mut jpeg = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, quality.value() as u8);
        if let Some(icc) = &metadata.icc_profile {
            encoder
                .set_icc_profile(icc.clone())
                .map_err(|e| metadata_rejected("ICC profile", e))?;
        }
        if let Some(exif) = &metadata.exif {
            encoder
                .set_exif_metadata(bare_exif(exif).to_vec())
                .map_err(|e| metadata_rejected("EXIF", e))?;
        }
        encoder
            .write_image(
                flat.as_bytes(),
                flat.width(),
                flat.height(),
                flat.color().into(),
            )
            .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {e}")))?;

        debug!(
            bytes = jpeg.len(),
            quality = quality.value(),
            icc = metadata.icc_profile.is_some(),
            exif = metadata.exif.is_some(),
            "encoded output"
        );
        Ok(jpeg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::jpeg::JpegDecoder;
    use image::{GrayImage, Luma, Rgb as Px, RgbImage};

    /// Encode a small gradient JPEG with the given dimensions.
    fn create_test_jpeg(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Px([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let mut bytes = Vec::new();
        JpegEncoder::new(&mut bytes)
            .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
            .unwrap();
        bytes
    }

    /// 2x1: red on the left, blue on the right.
    fn red_blue() -> DynamicImage {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Px([255, 0, 0]));
        img.put_pixel(1, 0, Px([0, 0, 255]));
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn decode_synthetic_jpeg() {
        let backend = RustBackend::new();
        let decoded = backend.decode(&create_test_jpeg(200, 150)).unwrap();
        assert_eq!(
            backend.dimensions(&decoded.image),
            Dimensions {
                width: 200,
                height: 150
            }
        );
        assert_eq!(decoded.metadata, EmbeddedMetadata::default());
    }

    #[test]
    fn decode_garbage_errors() {
        let backend = RustBackend::new();
        assert!(backend.decode(b"definitely not an image").is_err());
    }

    #[test]
    fn rotate_clockwise_moves_left_column_to_top() {
        let backend = RustBackend::new();
        let rotated = backend.rotate(red_blue(), Rotation::Clockwise).unwrap();
        let rgb = rotated.to_rgb8();
        assert_eq!(rgb.dimensions(), (1, 2));
        assert_eq!(rgb.get_pixel(0, 0), &Px([255, 0, 0]));
        assert_eq!(rgb.get_pixel(0, 1), &Px([0, 0, 255]));
    }

    #[test]
    fn rotate_counter_clockwise_moves_left_column_to_bottom() {
        let backend = RustBackend::new();
        let rotated = backend
            .rotate(red_blue(), Rotation::CounterClockwise)
            .unwrap();
        let rgb = rotated.to_rgb8();
        assert_eq!(rgb.dimensions(), (1, 2));
        assert_eq!(rgb.get_pixel(0, 0), &Px([0, 0, 255]));
        assert_eq!(rgb.get_pixel(0, 1), &Px([255, 0, 0]));
    }

    #[test]
    fn opposite_rotations_are_lossless() {
        let backend = RustBackend::new();
        let original = DynamicImage::ImageRgb8(RgbImage::from_fn(7, 3, |x, y| {
            Px([x as u8 * 30, y as u8 * 80, 5])
        }));
        let there = backend
            .rotate(original.clone(), Rotation::Clockwise)
            .unwrap();
        let back = backend.rotate(there, Rotation::CounterClockwise).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn resize_is_exact() {
        let backend = RustBackend::new();
        let img = backend.decode(&create_test_jpeg(400, 300)).unwrap().image;
        let resized = backend.resize(&img, 123, 45).unwrap();
        assert_eq!((resized.width(), resized.height()), (123, 45));
    }

    #[test]
    fn canvas_keeps_color_mode() {
        let backend = RustBackend::new();
        let target = TargetBox::new(8, 10);

        let gray = DynamicImage::ImageLuma8(GrayImage::new(2, 2));
        let canvas = backend.canvas(&gray, target, Rgb::WHITE).unwrap();
        assert_eq!(canvas.color(), ColorType::L8);
        assert_eq!(canvas.to_luma8().get_pixel(3, 3), &Luma([255]));

        let canvas = backend
            .canvas(&red_blue(), target, Rgb::new(0, 0, 128))
            .unwrap();
        assert_eq!(canvas.color(), ColorType::Rgb8);
        assert_eq!((canvas.width(), canvas.height()), (8, 10));
        assert_eq!(canvas.to_rgb8().get_pixel(7, 9), &Px([0, 0, 128]));
    }

    #[test]
    fn paste_overwrites_rectangle() {
        let backend = RustBackend::new();
        let mut canvas = backend
            .canvas(&red_blue(), TargetBox::new(4, 3), Rgb::WHITE)
            .unwrap();
        let placement = Placement {
            left: 1,
            upper: 1,
            right: 3,
            lower: 2,
        };
        backend.paste(&mut canvas, &red_blue(), placement).unwrap();

        let rgb = canvas.to_rgb8();
        assert_eq!(rgb.get_pixel(0, 1), &Px([255, 255, 255]));
        assert_eq!(rgb.get_pixel(1, 1), &Px([255, 0, 0]));
        assert_eq!(rgb.get_pixel(2, 1), &Px([0, 0, 255]));
        assert_eq!(rgb.get_pixel(3, 1), &Px([255, 255, 255]));
        assert_eq!(rgb.get_pixel(1, 0), &Px([255, 255, 255]));
    }

    #[test]
    fn paste_rejects_mismatched_box() {
        let backend = RustBackend::new();
        let mut canvas = backend
            .canvas(&red_blue(), TargetBox::new(4, 3), Rgb::WHITE)
            .unwrap();
        let placement = Placement {
            left: 0,
            upper: 0,
            right: 3,
            lower: 1,
        };
        assert!(backend.paste(&mut canvas, &red_blue(), placement).is_err());
    }

    #[test]
    fn encode_produces_decodable_jpeg() {
        let backend = RustBackend::new();
        let bytes = backend
            .encode(&red_blue(), Quality::new(90), &EmbeddedMetadata::default())
            .unwrap();
        assert!(bytes.starts_with(&[0xFF, 0xD8]));
        let decoded = backend.decode(&bytes).unwrap();
        assert_eq!(
            (decoded.image.width(), decoded.image.height()),
            (2, 1)
        );
    }

    #[test]
    fn encode_flattens_alpha() {
        let backend = RustBackend::new();
        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 0])));
        let bytes = backend
            .encode(&rgba, Quality::default(), &EmbeddedMetadata::default())
            .unwrap();
        assert_eq!(backend.decode(&bytes).unwrap().image.color(), ColorType::Rgb8);
    }

    #[test]
    fn encode_keeps_grayscale() {
        let backend = RustBackend::new();
        let gray = DynamicImage::ImageLuma8(GrayImage::from_pixel(4, 4, Luma([77])));
        let bytes = backend
            .encode(&gray, Quality::default(), &EmbeddedMetadata::default())
            .unwrap();
        assert_eq!(backend.decode(&bytes).unwrap().image.color(), ColorType::L8);
    }

    fn read_back(bytes: &[u8]) -> EmbeddedMetadata {
        let mut decoder = JpegDecoder::new(Cursor::new(bytes)).unwrap();
        EmbeddedMetadata {
            icc_profile: decoder.icc_profile().unwrap(),
            exif: decoder
                .exif_metadata()
                .unwrap()
                .map(|exif| bare_exif(&exif).to_vec()),
        }
    }

    #[test]
    fn encode_embeds_metadata() {
        let backend = RustBackend::new();
        let metadata = EmbeddedMetadata {
            icc_profile: Some(vec![7; 300]),
            exif: Some(b"MM\0*\0\0\0\x08\0\0".to_vec()),
        };
        let bytes = backend
            .encode(&red_blue(), Quality::default(), &metadata)
            .unwrap();
        assert_eq!(read_back(&bytes), metadata);
    }

    #[test]
    fn encode_splits_large_icc_profile() {
        let backend = RustBackend::new();
        // Larger than one APP2 segment can hold
        let icc: Vec<u8> = (0..70_000u32).map(|i| (i % 251) as u8).collect();
        let metadata = EmbeddedMetadata {
            icc_profile: Some(icc.clone()),
            exif: None,
        };
        let bytes = backend
            .encode(&red_blue(), Quality::default(), &metadata)
            .unwrap();
        assert_eq!(read_back(&bytes).icc_profile, Some(icc));
    }

    #[test]
    fn exif_preamble_is_not_doubled() {
        let backend = RustBackend::new();
        let tiff = b"II*\0\x08\0\0\0\0\0".to_vec();
        let mut prefixed = EXIF_PREAMBLE.to_vec();
        prefixed.extend_from_slice(&tiff);
        let metadata = EmbeddedMetadata {
            icc_profile: None,
            exif: Some(prefixed),
        };
        let bytes = backend
            .encode(&red_blue(), Quality::default(), &metadata)
            .unwrap();

        let decoded = backend.decode(&bytes).unwrap();
        assert_eq!(decoded.metadata.exif, Some(tiff));
        assert_eq!(decoded.metadata.icc_profile, None);
    }
}
