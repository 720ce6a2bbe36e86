// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster input checks, luminance conversion, and fallible buffer allocation.

use geradeaus_core::DeskewConfig;
use geradeaus_core::error::{DeskewError, Result};
use image::{DynamicImage, GrayImage, ImageBuffer, Pixel};
use tracing::{debug, instrument};

/// Reject images the pipeline cannot process.
///
/// Only 8-bit grayscale and 8-bit RGB pages are accepted. Empty images are
/// `InvalidInput`; images above `config.max_pixels` are refused up front with
/// `ResourceExhausted` rather than failing midway through a stage.
///
/// The Hough accumulator computes `w² + h²` in `u32`, so pages whose squared
/// diagonal does not fit are `InvalidInput` regardless of their pixel count.
pub fn validate_raster(image: &DynamicImage, config: &DeskewConfig) -> Result<()> {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(DeskewError::InvalidInput(format!(
            "image has zero area ({width}x{height})"
        )));
    }

    match image {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => {}
        other => {
            return Err(DeskewError::InvalidInput(format!(
                "unsupported pixel layout {:?}; expected 8-bit gray or RGB",
                other.color()
            )));
        }
    }

    let diagonal_sq = width as u64 * width as u64 + height as u64 * height as u64;
    if diagonal_sq > u32::MAX as u64 {
        return Err(DeskewError::InvalidInput(format!(
            "{width}x{height} is too wide for the line transform (max side 65535 px)"
        )));
    }

    let pixels = width as u64 * height as u64;
    if pixels > config.max_pixels {
        return Err(DeskewError::ResourceExhausted(format!(
            "{width}x{height} exceeds the {} pixel limit",
            config.max_pixels
        )));
    }

    Ok(())
}

/// Number of bytes needed for a `width` x `height` image with `channels`
/// 8-bit channels.
pub fn buffer_len(width: u32, height: u32, channels: usize) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(channels))
        .ok_or_else(|| {
            DeskewError::ResourceExhausted(format!(
                "{width}x{height}x{channels} overflows the address space"
            ))
        })
}

/// Allocate a zeroed byte buffer, reporting allocation failure instead of
/// aborting.
pub fn reserve_buffer(len: usize) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(len).map_err(|err| {
        DeskewError::ResourceExhausted(format!("cannot reserve {len} bytes: {err}"))
    })?;
    buffer.resize(len, 0);
    Ok(buffer)
}

/// Wrap a raw buffer as an image of pixel type `P`.
pub(crate) fn from_raw<P>(width: u32, height: u32, data: Vec<u8>) -> Result<ImageBuffer<P, Vec<u8>>>
where
    P: Pixel<Subpixel = u8>,
{
    let len = data.len();
    ImageBuffer::from_raw(width, height, data).ok_or_else(|| {
        DeskewError::InvalidInput(format!(
            "buffer of {len} bytes does not hold a {width}x{height} image"
        ))
    })
}

/// Convert a validated page to 8-bit luminance.
///
/// RGB pages use the ITU-R BT.601 weights (0.299, 0.587, 0.114) with
/// rounding. Grayscale pages are copied unchanged.
#[instrument(skip_all, fields(width = image.width(), height = image.height()))]
pub fn to_luma(image: &DynamicImage) -> Result<GrayImage> {
    match image {
        DynamicImage::ImageLuma8(gray) => Ok(gray.clone()),
        DynamicImage::ImageRgb8(rgb) => {
            let (width, height) = rgb.dimensions();
            let mut luma = reserve_buffer(buffer_len(width, height, 1)?)?;
            for (out, px) in luma.iter_mut().zip(rgb.pixels()) {
                let [r, g, b] = px.0;
                let weighted = 299 * r as u32 + 587 * g as u32 + 114 * b as u32;
                *out = ((weighted + 500) / 1000) as u8;
            }
            debug!("RGB page converted to luminance");
            from_raw(width, height, luma)
        }
        other => Err(DeskewError::InvalidInput(format!(
            "unsupported pixel layout {:?}",
            other.color()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, LumaA, Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn accepts_gray_and_rgb() {
        let cfg = DeskewConfig::default();
        let gray = DynamicImage::ImageLuma8(GrayImage::new(4, 3));
        let rgb = DynamicImage::ImageRgb8(RgbImage::new(4, 3));
        assert!(validate_raster(&gray, &cfg).is_ok());
        assert!(validate_raster(&rgb, &cfg).is_ok());
    }

    #[test]
    fn rejects_zero_area() {
        let cfg = DeskewConfig::default();
        let empty = DynamicImage::ImageRgb8(RgbImage::new(0, 10));
        let err = validate_raster(&empty, &cfg).unwrap_err();
        assert!(matches!(err, DeskewError::InvalidInput(_)));
    }

    #[test]
    fn rejects_other_channel_layouts() {
        let cfg = DeskewConfig::default();
        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 4])));
        let la = DynamicImage::ImageLumaA8(image::ImageBuffer::from_pixel(2, 2, LumaA([9, 255])));
        let wide = DynamicImage::ImageLuma16(image::ImageBuffer::new(2, 2));
        for img in [rgba, la, wide] {
            let err = validate_raster(&img, &cfg).unwrap_err();
            assert!(matches!(err, DeskewError::InvalidInput(_)));
        }
    }

    #[test]
    fn rejects_images_over_pixel_limit() {
        let cfg = DeskewConfig {
            max_pixels: 99,
            ..DeskewConfig::default()
        };
        let img = DynamicImage::ImageLuma8(GrayImage::new(10, 10));
        let err = validate_raster(&img, &cfg).unwrap_err();
        assert!(matches!(err, DeskewError::ResourceExhausted(_)));
    }

    #[test]
    fn rejects_sides_too_long_for_line_transform() {
        let cfg = DeskewConfig::default();
        let wide = DynamicImage::ImageLuma8(GrayImage::new(66_000, 3));
        let err = validate_raster(&wide, &cfg).unwrap_err();
        assert!(matches!(err, DeskewError::InvalidInput(_)));

        let tall = DynamicImage::ImageLuma8(GrayImage::new(1, 65_536));
        assert!(matches!(
            validate_raster(&tall, &cfg),
            Err(DeskewError::InvalidInput(_))
        ));

        // 65535² + 1² still fits in a u32.
        let widest = DynamicImage::ImageLuma8(GrayImage::new(65_535, 1));
        assert!(validate_raster(&widest, &cfg).is_ok());
    }

    #[test]
    fn buffer_len_overflow_is_resource_exhausted() {
        assert_eq!(buffer_len(3, 2, 3).unwrap(), 18);
        let err = buffer_len(u32::MAX, u32::MAX, usize::MAX).unwrap_err();
        assert!(matches!(err, DeskewError::ResourceExhausted(_)));
    }

    #[test]
    fn impossible_reservation_is_resource_exhausted() {
        let err = reserve_buffer(usize::MAX).unwrap_err();
        assert!(matches!(err, DeskewError::ResourceExhausted(_)));
    }

    #[test]
    fn luma_uses_bt601_weights() {
        let mut rgb = RgbImage::new(3, 1);
        rgb.put_pixel(0, 0, Rgb([255, 0, 0]));
        rgb.put_pixel(1, 0, Rgb([0, 255, 0]));
        rgb.put_pixel(2, 0, Rgb([255, 255, 255]));
        let gray = to_luma(&DynamicImage::ImageRgb8(rgb)).unwrap();
        assert_eq!(gray.get_pixel(0, 0), &Luma([76]));
        assert_eq!(gray.get_pixel(1, 0), &Luma([150]));
        assert_eq!(gray.get_pixel(2, 0), &Luma([255]));
    }

    #[test]
    fn luma_passthrough_for_gray() {
        let gray = GrayImage::from_fn(5, 5, |x, y| Luma([(x * 10 + y) as u8]));
        let out = to_luma(&DynamicImage::ImageLuma8(gray.clone())).unwrap();
        assert_eq!(out, gray);
    }
}
