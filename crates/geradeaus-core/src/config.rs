// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Deskew tunables.
//
// The defaults are the 300 DPI operating point. The Hough vote threshold in
// particular is tied to that resolution; pages rasterized at a materially
// different DPI should carry a re-tuned threshold.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DeskewError, Result};

/// Tunables for the extract → estimate → correct pipeline.
///
/// Missing fields in a JSON document fall back to the defaults, so a file
/// containing only `{"hough_vote_threshold": 120}` is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskewConfig {
    /// Side length of the square Gaussian kernel. Must be odd.
    pub blur_kernel_size: u32,
    /// Gaussian sigma. `0.0` derives it from the kernel size.
    pub blur_sigma: f32,
    /// Canny hysteresis low threshold.
    pub canny_low: f32,
    /// Canny hysteresis high threshold.
    pub canny_high: f32,
    /// Minimum accumulator votes for a Hough line to be reported.
    pub hough_vote_threshold: u32,
    /// Non-maximum suppression radius in the Hough accumulator.
    pub hough_suppression_radius: u32,
    /// Half-width of the open interval of plausible skew, in degrees.
    pub max_skew_degrees: f64,
    /// Largest image (width × height) the pipeline will allocate for.
    pub max_pixels: u64,
}

impl Default for DeskewConfig {
    fn default() -> Self {
        Self {
            blur_kernel_size: 5,
            blur_sigma: 0.0,
            canny_low: 50.0,
            canny_high: 150.0,
            hough_vote_threshold: 200,
            hough_suppression_radius: 1,
            max_skew_degrees: 45.0,
            max_pixels: 200_000_000,
        }
    }
}

impl DeskewConfig {
    /// Parse a JSON document and validate the result.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }

    /// Check every tunable against its allowed range.
    pub fn validate(&self) -> Result<()> {
        if self.blur_kernel_size == 0 || self.blur_kernel_size % 2 == 0 {
            return Err(DeskewError::InvalidConfig(format!(
                "blur_kernel_size must be odd and positive, got {}",
                self.blur_kernel_size
            )));
        }
        if !self.blur_sigma.is_finite() || self.blur_sigma < 0.0 {
            return Err(DeskewError::InvalidConfig(format!(
                "blur_sigma must be a finite non-negative number, got {}",
                self.blur_sigma
            )));
        }
        if !(self.canny_low.is_finite() && self.canny_high.is_finite())
            || self.canny_low < 0.0
            || self.canny_low > self.canny_high
        {
            return Err(DeskewError::InvalidConfig(format!(
                "canny thresholds must satisfy 0 <= low <= high, got {} / {}",
                self.canny_low, self.canny_high
            )));
        }
        if self.hough_vote_threshold == 0 {
            return Err(DeskewError::InvalidConfig(
                "hough_vote_threshold must be greater than zero".into(),
            ));
        }
        if !(self.max_skew_degrees > 0.0 && self.max_skew_degrees <= 90.0) {
            return Err(DeskewError::InvalidConfig(format!(
                "max_skew_degrees must lie in (0, 90], got {}",
                self.max_skew_degrees
            )));
        }
        if self.max_pixels == 0 {
            return Err(DeskewError::InvalidConfig(
                "max_pixels must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// The sigma actually used for blurring.
    ///
    /// When `blur_sigma` is zero it is derived from the kernel size as
    /// `0.3 * ((k - 1) / 2 - 1) + 0.8`, giving 1.1 for a 5×5 kernel.
    pub fn effective_blur_sigma(&self) -> f32 {
        if self.blur_sigma > 0.0 {
            return self.blur_sigma;
        }
        let k = self.blur_kernel_size as f32;
        0.3 * ((k - 1.0) * 0.5 - 1.0) + 0.8
    }
}
