// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rotation correction — affine rotation about the page centre with bicubic
// resampling and edge-replicated borders. The canvas never grows or shrinks.

use geradeaus_core::error::{DeskewError, Result};
use geradeaus_core::{DeskewConfig, SkewAngle};
use image::{DynamicImage, ImageBuffer, Pixel};
use tracing::{debug, instrument};

use crate::image::raster::{buffer_len, from_raw, reserve_buffer, validate_raster};

/// A 2×3 affine matrix mapping source pixel coordinates to destination
/// coordinates: `[x', y'] = M · [x, y, 1]`.
pub type AffineMatrix = [[f64; 3]; 2];

/// Cubic convolution coefficient. Matches the common `a = -0.75` choice.
const CUBIC_A: f64 = -0.75;

/// Rotate a page by `angle` about its integer centre `(w / 2, h / 2)`.
///
/// A positive angle turns the content counter-clockwise on screen, which
/// undoes a clockwise skew of the same size. The output has exactly the
/// input's dimensions and pixel layout; corners that would sample outside
/// the source repeat the nearest edge pixel. A zero angle reproduces the
/// input bit for bit.
#[instrument(
    skip_all,
    fields(width = image.width(), height = image.height(), angle = angle.degrees())
)]
pub fn correct_rotation(
    image: &DynamicImage,
    angle: SkewAngle,
    config: &DeskewConfig,
) -> Result<DynamicImage> {
    validate_raster(image, config)?;

    let center = ((image.width() / 2) as f64, (image.height() / 2) as f64);
    let matrix = rotation_matrix(center, angle.degrees());

    let corrected = match image {
        DynamicImage::ImageLuma8(gray) => DynamicImage::ImageLuma8(warp_affine(gray, &matrix)?),
        DynamicImage::ImageRgb8(rgb) => DynamicImage::ImageRgb8(warp_affine(rgb, &matrix)?),
        other => {
            return Err(DeskewError::InvalidInput(format!(
                "unsupported pixel layout {:?}",
                other.color()
            )));
        }
    };

    debug!("Rotation correction applied");
    Ok(corrected)
}

/// Forward matrix for a rotation by `angle_degrees` about `center` at unit
/// scale. Positive angles are counter-clockwise on screen (y axis down).
pub fn rotation_matrix(center: (f64, f64), angle_degrees: f64) -> AffineMatrix {
    let (sin, cos) = angle_degrees.to_radians().sin_cos();
    let (cx, cy) = center;
    [
        [cos, sin, (1.0 - cos) * cx - sin * cy],
        [-sin, cos, sin * cx + (1.0 - cos) * cy],
    ]
}

/// Invert an affine matrix. `None` if its linear part is singular.
pub fn invert_affine(m: &AffineMatrix) -> Option<AffineMatrix> {
    let det = m[0][0] * m[1][1] - m[0][1] * m[1][0];
    if det.abs() < f64::EPSILON {
        return None;
    }
    let a = m[1][1] / det;
    let b = -m[0][1] / det;
    let c = -m[1][0] / det;
    let d = m[0][0] / det;
    Some([
        [a, b, -(a * m[0][2] + b * m[1][2])],
        [c, d, -(c * m[0][2] + d * m[1][2])],
    ])
}

/// Warp `src` through `forward` onto a canvas of the same size.
///
/// Each destination pixel is inverse-mapped into the source and sampled with
/// bicubic interpolation. Taps outside the source are clamped to the border.
pub fn warp_affine<P>(
    src: &ImageBuffer<P, Vec<u8>>,
    forward: &AffineMatrix,
) -> Result<ImageBuffer<P, Vec<u8>>>
where
    P: Pixel<Subpixel = u8>,
{
    let inverse = invert_affine(forward).ok_or_else(|| {
        DeskewError::InvalidInput("rotation matrix is not invertible".into())
    })?;

    let (width, height) = src.dimensions();
    let channels = P::CHANNEL_COUNT as usize;
    let mut out = reserve_buffer(buffer_len(width, height, channels)?)?;
    let data = src.as_raw();
    let stride = width as usize * channels;
    let max_x = width as i64 - 1;
    let max_y = height as i64 - 1;

    for y in 0..height {
        let fy = y as f64;
        for x in 0..width {
            let fx = x as f64;
            let sx = inverse[0][0] * fx + inverse[0][1] * fy + inverse[0][2];
            let sy = inverse[1][0] * fx + inverse[1][1] * fy + inverse[1][2];

            let x0 = sx.floor();
            let y0 = sy.floor();
            let wx = cubic_weights(sx - x0);
            let wy = cubic_weights(sy - y0);
            let (x0, y0) = (x0 as i64, y0 as i64);

            let mut cols = [0usize; 4];
            for (i, col) in cols.iter_mut().enumerate() {
                *col = (x0 + i as i64 - 1).clamp(0, max_x) as usize * channels;
            }

            let base = y as usize * stride + x as usize * channels;
            for c in 0..channels {
                let mut acc = 0.0;
                for (j, weight_y) in wy.iter().enumerate() {
                    let row = (y0 + j as i64 - 1).clamp(0, max_y) as usize * stride;
                    let mut row_acc = 0.0;
                    for (i, weight_x) in wx.iter().enumerate() {
                        row_acc += weight_x * data[row + cols[i] + c] as f64;
                    }
                    acc += weight_y * row_acc;
                }
                out[base + c] = acc.round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    from_raw(width, height, out)
}

/// Cubic convolution weights for the four taps around a sample at fractional
/// offset `t` in `[0, 1)`. At `t == 0` the weights are exactly `[0, 1, 0, 0]`.
fn cubic_weights(t: f64) -> [f64; 4] {
    let a = CUBIC_A;
    let w0 = ((a * (t + 1.0) - 5.0 * a) * (t + 1.0) + 8.0 * a) * (t + 1.0) - 4.0 * a;
    let w1 = ((a + 2.0) * t - (a + 3.0)) * t * t + 1.0;
    let w2 = ((a + 2.0) * (1.0 - t) - (a + 3.0)) * (1.0 - t) * (1.0 - t) + 1.0;
    let w3 = 1.0 - w0 - w1 - w2;
    [w0, w1, w2, w3]
}

// -- Tests --------------------------------------------------------------------
