// SPDX-License-Identifier: GPL-3.0-only

//! Still photo encoding
//!
//! Preview frames arrive as tightly packed RGBA. Captures are written as
//! JPEG, so the alpha channel is dropped and a mirrored preview frame is
//! flipped back to the sensor orientation before encoding.

use crate::backends::camera::CameraFrame;
use crate::constants::jpeg_quality;
use crate::errors::CaptureError;
use image::{RgbImage, RgbaImage};
use tracing::debug;

/// Encoded image data ready for saving
pub struct EncodedImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// JPEG encoder for captured frames
#[derive(Debug, Clone, Copy)]
pub struct PhotoEncoder {
    quality: u8,
}

impl PhotoEncoder {
    /// Encoder for a capability quality in 0.0 - 1.0
    pub fn new(quality: f32) -> Self {
        Self {
            quality: jpeg_quality(quality),
        }
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.quality
    }

    /// Encode a preview frame as JPEG (CPU bound; run off the UI thread)
    pub fn encode_frame(&self, frame: &CameraFrame) -> Result<EncodedImage, CaptureError> {
        let rgba = RgbaImage::from_raw(frame.width, frame.height, frame.data.to_vec())
            .ok_or_else(|| {
                CaptureError::Encoding(format!(
                    "frame buffer does not match {}x{}",
                    frame.width, frame.height
                ))
            })?;

        let rgba = if frame.mirrored {
            image::imageops::flip_horizontal(&rgba)
        } else {
            rgba
        };

        let rgb: RgbImage = image::DynamicImage::ImageRgba8(rgba).into_rgb8();
        let data = self.encode_jpeg(&rgb)?;
        debug!(
            size = data.len(),
            quality = self.quality,
            mirrored = frame.mirrored,
            "JPEG encoding complete"
        );

        Ok(EncodedImage {
            data,
            width: rgb.width(),
            height: rgb.height(),
        })
    }

    fn encode_jpeg(&self, image: &RgbImage) -> Result<Vec<u8>, CaptureError> {
        let mut cursor = std::io::Cursor::new(Vec::new());

        let mut encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, self.quality);

        encoder.encode(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgb8,
        )?;

        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Instant;

    fn frame(width: u32, height: u32, mirrored: bool, pixels: Vec<u8>) -> CameraFrame {
        CameraFrame {
            width,
            height,
            data: Arc::from(pixels),
            mirrored,
            captured_at: Instant::now(),
        }
    }

    #[test]
    fn test_encode_produces_jpeg() {
        let encoder = PhotoEncoder::new(0.9);
        assert_eq!(encoder.jpeg_quality(), 90);

        let encoded = encoder
            .encode_frame(&frame(4, 2, false, vec![128; 4 * 2 * 4]))
            .unwrap();
        assert_eq!((encoded.width, encoded.height), (4, 2));
        // JPEG SOI marker
        assert_eq!(&encoded.data[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_mirrored_frame_is_flipped_back() {
        // Left pixel red, right pixel blue, as seen in a mirrored preview
        let pixels = vec![255, 0, 0, 255, 0, 0, 255, 255];
        let encoded = PhotoEncoder::new(1.0)
            .encode_frame(&frame(2, 1, true, pixels))
            .unwrap();

        let decoded = image::load_from_memory(&encoded.data).unwrap().into_rgb8();
        let left = decoded.get_pixel(0, 0);
        let right = decoded.get_pixel(1, 0);
        assert!(left[2] > left[0], "left pixel should be blue after un-mirroring");
        assert!(right[0] > right[2], "right pixel should be red after un-mirroring");
    }

    #[test]
    fn test_size_mismatch_is_encoding_error() {
        let result = PhotoEncoder::new(1.0).encode_frame(&frame(4, 4, false, vec![0; 8]));
        assert!(matches!(result, Err(CaptureError::Encoding(_))));
    }
}
