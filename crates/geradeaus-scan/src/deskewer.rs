// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Deskew pipeline — extract lines, estimate the skew, rotate it away.

use geradeaus_core::error::Result;
use geradeaus_core::{DeskewConfig, SkewAngle, SkewEstimate};
use image::DynamicImage;
use tracing::{debug, instrument};

use crate::image::rotate::correct_rotation;
use crate::scan::estimate::estimate_skew;
use crate::scan::extract::extract_lines;

/// A corrected page and the skew that was removed from it.
#[derive(Debug, Clone)]
pub struct DeskewOutcome {
    /// The page rotated back to level, same size and layout as the input.
    pub image: DynamicImage,
    /// The estimate the rotation was based on.
    pub estimate: SkewEstimate,
}

impl DeskewOutcome {
    pub fn angle(&self) -> SkewAngle {
        self.estimate.angle
    }
}

/// Single-page deskew pipeline.
///
/// Holds only validated tunables, so one `Deskewer` can be shared across
/// threads and called for many pages. Every call is a pure function of its
/// input image.
///
/// ```ignore
/// let deskewer = Deskewer::new(DeskewConfig::load("deskew.json")?)?;
/// let outcome = deskewer.deskew(&page)?;
/// println!("angle: {}", outcome.angle());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Deskewer {
    config: DeskewConfig,
}

impl Deskewer {
    // -- Construction ---------------------------------------------------------

    /// Create a pipeline, rejecting out-of-range tunables.
    pub fn new(config: DeskewConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    // -- Accessors ------------------------------------------------------------

    pub fn config(&self) -> &DeskewConfig {
        &self.config
    }

    // -- Stages ---------------------------------------------------------------

    /// Estimate the skew of a page without correcting it.
    pub fn detect(&self, image: &DynamicImage) -> Result<SkewEstimate> {
        let candidates = extract_lines(image, &self.config)?;
        Ok(estimate_skew(&candidates, &self.config))
    }

    /// Rotate a page by a known skew angle.
    pub fn correct(&self, image: &DynamicImage, angle: SkewAngle) -> Result<DynamicImage> {
        correct_rotation(image, angle, &self.config)
    }

    /// Detect and correct in one call.
    ///
    /// A page without usable lines comes back with a zero angle and an
    /// unchanged image.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn deskew(&self, image: &DynamicImage) -> Result<DeskewOutcome> {
        let estimate = self.detect(image)?;
        debug!(
            angle = estimate.angle.degrees(),
            candidates = estimate.candidate_count,
            inliers = estimate.inlier_count,
            "Page skew detected"
        );
        let corrected = self.correct(image, estimate.angle)?;
        Ok(DeskewOutcome {
            image: corrected,
            estimate,
        })
    }
}

/// Deskew a page with the default (300 DPI) tunables.
pub fn deskew(image: &DynamicImage) -> Result<DeskewOutcome> {
    Deskewer::default().deskew(image)
}

// -- Tests --------------------------------------------------------------------
