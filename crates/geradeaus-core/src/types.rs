// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the deskew pipeline.

use serde::{Deserialize, Serialize};

/// A straight line in Hesse normal form, as reported by the Hough transform.
///
/// The line is `x * cos(theta) + y * sin(theta) = rho` with the origin at the
/// top-left pixel and y growing downwards. A horizontal text baseline has
/// `theta` close to π/2.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineCandidate {
    /// Signed distance from the origin, in pixels.
    pub rho: f64,
    /// Angle of the normal from the x-axis, in radians.
    pub theta: f64,
}

impl LineCandidate {
    pub fn new(rho: f64, theta: f64) -> Self {
        Self { rho, theta }
    }

    /// Build a candidate from a normal angle given in degrees.
    pub fn from_degrees(rho: f64, theta_degrees: f64) -> Self {
        Self {
            rho,
            theta: theta_degrees.to_radians(),
        }
    }

    /// Signed deviation of the line from horizontal, in degrees.
    ///
    /// Positive when the line descends to the right on screen.
    pub fn deviation_degrees(&self) -> f64 {
        self.theta.to_degrees() - 90.0
    }
}

/// Estimated page skew in degrees.
///
/// Positive means the content is turned clockwise on screen; the corrector
/// turns it back by the same amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkewAngle(pub f64);

impl SkewAngle {
    /// Identity correction.
    pub const ZERO: SkewAngle = SkewAngle(0.0);

    pub fn degrees(self) -> f64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }
}

impl From<f64> for SkewAngle {
    fn from(degrees: f64) -> Self {
        Self(degrees)
    }
}

impl std::fmt::Display for SkewAngle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}°", self.0)
    }
}

/// Result of the skew estimator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkewEstimate {
    /// Median deviation of the inlier lines, or zero if there were none.
    pub angle: SkewAngle,
    /// Number of lines handed to the estimator.
    pub candidate_count: usize,
    /// Number of lines that fell inside the plausible skew range.
    pub inlier_count: usize,
}

impl SkewEstimate {
    /// Estimate for a page with no usable lines.
    pub fn level(candidate_count: usize) -> Self {
        Self {
            angle: SkewAngle::ZERO,
            candidate_count,
            inlier_count: 0,
        }
    }
}
