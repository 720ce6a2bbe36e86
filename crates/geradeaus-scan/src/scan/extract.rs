// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Edge and line extraction — grayscale, Gaussian blur, inverted Otsu
// binarization, Canny edges, and the Hough line transform.

use geradeaus_core::error::Result;
use geradeaus_core::{DeskewConfig, LineCandidate};
use image::{DynamicImage, GrayImage};
use imageproc::edges::canny;
use imageproc::filter::separable_filter_equal;
use imageproc::hough::{LineDetectionOptions, PolarLine, detect_lines};
use tracing::{debug, instrument};

use crate::image::raster::{buffer_len, from_raw, reserve_buffer, to_luma, validate_raster};

/// Extract straight-line candidates from a page.
///
/// ## Pipeline
///
/// 1. Convert to grayscale (BT.601 luminance)
/// 2. Gaussian blur with a `blur_kernel_size` square kernel
/// 3. Otsu threshold with the inverted rule, so ink becomes the bright class
/// 4. Canny edge detection (3×3 Sobel gradients). imageproc's Canny runs its
///    own σ = 1.4 Gaussian first, so the page is smoothed twice.
/// 5. Hough transform at 1 px / 1° resolution
///
/// A page on which no line reaches `hough_vote_threshold` yields an empty
/// vector.
#[instrument(skip_all, fields(width = image.width(), height = image.height()))]
pub fn extract_lines(image: &DynamicImage, config: &DeskewConfig) -> Result<Vec<LineCandidate>> {
    let edges = edge_map(image, config)?;
    Ok(detect_line_candidates(&edges, config))
}

/// Steps 1-4 of [`extract_lines`]: the binary edge map of a page.
///
/// Edge pixels are 255, background pixels are 0.
#[instrument(skip_all, fields(width = image.width(), height = image.height()))]
pub fn edge_map(image: &DynamicImage, config: &DeskewConfig) -> Result<GrayImage> {
    validate_raster(image, config)?;

    let gray = to_luma(image)?;
    let blurred = gaussian_blur(&gray, config);

    let threshold = otsu_threshold(&blurred);
    debug!(threshold, "Otsu threshold computed");
    let binary = binarize_inverted(&blurred, threshold)?;

    let edges = canny(&binary, config.canny_low, config.canny_high);
    debug!(
        low = config.canny_low,
        high = config.canny_high,
        "Canny edge detection complete"
    );
    Ok(edges)
}

/// Step 5 of [`extract_lines`]: Hough lines over an edge map.
pub fn detect_line_candidates(edges: &GrayImage, config: &DeskewConfig) -> Vec<LineCandidate> {
    let options = LineDetectionOptions {
        vote_threshold: config.hough_vote_threshold,
        suppression_radius: config.hough_suppression_radius,
    };
    let lines = detect_lines(edges, options);
    debug!(
        line_count = lines.len(),
        vote_threshold = config.hough_vote_threshold,
        "Hough lines detected"
    );
    lines.iter().map(polar_to_candidate).collect()
}

fn polar_to_candidate(line: &PolarLine) -> LineCandidate {
    LineCandidate::from_degrees(line.r as f64, line.angle_in_degrees as f64)
}

/// Blur with a separable Gaussian of `blur_kernel_size` taps.
///
/// Samples beyond the border repeat the edge pixel.
pub fn gaussian_blur(gray: &GrayImage, config: &DeskewConfig) -> GrayImage {
    let kernel = gaussian_kernel(config.blur_kernel_size, config.effective_blur_sigma());
    separable_filter_equal(gray, &kernel)
}

/// Normalised 1-D Gaussian weights for an odd kernel size.
fn gaussian_kernel(size: u32, sigma: f32) -> Vec<f32> {
    let radius = (size / 2) as i32;
    let denom = 2.0 * sigma * sigma;
    let mut weights: Vec<f32> = (-radius..=radius)
        .map(|i| (-((i * i) as f32) / denom).exp())
        .collect();
    let sum: f32 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }
    weights
}

/// Compute the Otsu threshold for a grayscale image.
///
/// Finds the threshold value that maximises the between-class variance of
/// the pixels at or below it and the pixels above it. A uniform image has no
/// split and yields 0, the same answer OpenCV gives. Binarizing such a page
/// gives a single value everywhere, so it produces no edges.
pub fn otsu_threshold(gray: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for pixel in gray.pixels() {
        histogram[pixel.0[0] as usize] += 1;
    }

    let total_pixels = gray.width() as u64 * gray.height() as u64;
    if total_pixels == 0 {
        return 0;
    }

    let sum_total: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &count)| i as f64 * count as f64)
        .sum();

    let mut sum_background: f64 = 0.0;
    let mut weight_background: u64 = 0;
    let mut max_variance: f64 = 0.0;
    let mut best_threshold: u8 = 0;

    for (t, &count) in histogram.iter().enumerate() {
        weight_background += count;
        if weight_background == 0 {
            continue;
        }
        let weight_foreground = total_pixels - weight_background;
        if weight_foreground == 0 {
            break;
        }

        sum_background += t as f64 * count as f64;
        let mean_background = sum_background / weight_background as f64;
        let mean_foreground = (sum_total - sum_background) / weight_foreground as f64;

        let between_variance = weight_background as f64
            * weight_foreground as f64
            * (mean_background - mean_foreground).powi(2);

        if between_variance > max_variance {
            max_variance = between_variance;
            best_threshold = t as u8;
        }
    }

    best_threshold
}

/// Inverted binary threshold: pixels above `threshold` become 0, the rest 255.
///
/// Dark ink on light paper comes out bright on dark, which is the polarity
/// the edge detector expects.
pub fn binarize_inverted(gray: &GrayImage, threshold: u8) -> Result<GrayImage> {
    let (width, height) = gray.dimensions();
    let mut output = reserve_buffer(buffer_len(width, height, 1)?)?;
    for (out, pixel) in output.iter_mut().zip(gray.pixels()) {
        *out = if pixel.0[0] > threshold { 0 } else { 255 };
    }
    from_raw(width, height, output)
}

// -- Tests --------------------------------------------------------------------
