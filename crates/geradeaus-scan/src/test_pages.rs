// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Synthetic pages for tests.

use image::{GrayImage, Luma, Rgb, RgbImage};

pub(crate) const PAPER: Rgb<u8> = Rgb([246, 244, 238]);
pub(crate) const INK: Rgb<u8> = Rgb([24, 22, 30]);

const RULE_SPACING: f64 = 40.0;
const RULE_HALF_THICKNESS: f64 = 2.5;

/// A page of evenly spaced horizontal ink rules, turned clockwise (on
/// screen) by `skew_degrees` about the integer image centre.
///
/// Rules span 75% of the width and the middle 60% of the height, so they
/// stay inside the canvas for moderate skew.
pub(crate) fn ruled_page(width: u32, height: u32, skew_degrees: f64) -> RgbImage {
    let (cx, cy) = ((width / 2) as f64, (height / 2) as f64);
    let half_len = width as f64 * 0.375;
    let half_span = height as f64 * 0.3;
    let (sin, cos) = skew_degrees.to_radians().sin_cos();

    RgbImage::from_fn(width, height, |x, y| {
        let dx = x as f64 - cx;
        let dy = y as f64 - cy;
        // Page coordinates before the skew was applied.
        let u = dx * cos + dy * sin;
        let v = -dx * sin + dy * cos;

        let nearest_rule = (v / RULE_SPACING).round() * RULE_SPACING;
        let on_rule = (v - nearest_rule).abs() < RULE_HALF_THICKNESS
            && nearest_rule.abs() <= half_span
            && u.abs() <= half_len;
        if on_rule { INK } else { PAPER }
    })
}

/// Isolated horizontal strokes of `stroke_len` pixels, one per row band and
/// staggered so that no two are collinear.
pub(crate) fn short_strokes_page(width: u32, height: u32, stroke_len: u32) -> RgbImage {
    let mut page = RgbImage::from_pixel(width, height, PAPER);
    let span = width - stroke_len;
    let mut row = 30;
    let mut k = 0u32;
    while row + 5 < height {
        let x0 = (k * 53) % span;
        for y in row..row + 5 {
            for x in x0..x0 + stroke_len {
                page.put_pixel(x, y, INK);
            }
        }
        row += 30;
        k += 1;
    }
    page
}

/// Mean absolute luminance difference between two same-sized pages over the
/// central half of the canvas.
pub(crate) fn central_mean_abs_diff(a: &GrayImage, b: &GrayImage) -> f64 {
    assert_eq!(a.dimensions(), b.dimensions());
    let (w, h) = a.dimensions();
    let (x0, x1, y0, y1) = (w / 4, 3 * w / 4, h / 4, 3 * h / 4);

    let mut total = 0u64;
    for y in y0..y1 {
        for x in x0..x1 {
            let Luma([pa]) = *a.get_pixel(x, y);
            let Luma([pb]) = *b.get_pixel(x, y);
            total += pa.abs_diff(pb) as u64;
        }
    }
    total as f64 / ((x1 - x0) * (y1 - y0)) as f64
}
