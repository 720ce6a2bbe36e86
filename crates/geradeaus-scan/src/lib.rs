// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// geradeaus-scan — Skew detection and correction for rasterized pages.
//
// Three pure stages: edge/line extraction (blur, Otsu, Canny, Hough), a
// median skew estimator over the near-horizontal lines, and a same-size
// bicubic rotation with edge-replicated borders. `Deskewer` composes them
// for one page per call.

pub mod deskewer;
pub mod image;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_pages;

// Re-export the primary API so callers can use `geradeaus_scan::Deskewer` etc.
pub use deskewer::{DeskewOutcome, Deskewer, deskew};
pub use crate::image::rotate::correct_rotation;
pub use scan::estimate::estimate_skew;
pub use scan::extract::{edge_map, extract_lines};

pub use geradeaus_core::{
    DeskewConfig, DeskewError, ErrorKind, LineCandidate, SkewAngle, SkewEstimate,
};
