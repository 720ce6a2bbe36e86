// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Skew estimation — median deviation of the near-horizontal Hough lines.

use geradeaus_core::{DeskewConfig, LineCandidate, SkewAngle, SkewEstimate};
use tracing::{debug, instrument};

/// Deviations this close to the range bound count as on the bound.
///
/// Absorbs degrees → radians → degrees round-off so that a line at exactly
/// 45° stays outside the open interval.
const BOUND_EPSILON: f64 = 1e-9;

/// Reduce Hough line candidates to a single skew angle.
///
/// Each candidate's normal angle is mapped to a signed deviation from
/// horizontal. Only deviations strictly inside
/// `(-max_skew_degrees, max_skew_degrees)` are kept; page borders and other
/// near-vertical lines fall outside. The answer is the median of what is
/// left, or exactly zero when nothing is left.
#[instrument(skip_all, fields(candidates = candidates.len()))]
pub fn estimate_skew(candidates: &[LineCandidate], config: &DeskewConfig) -> SkewEstimate {
    let bound = config.max_skew_degrees - BOUND_EPSILON;
    let mut inliers: Vec<f64> = candidates
        .iter()
        .map(LineCandidate::deviation_degrees)
        .filter(|deviation| deviation.abs() < bound)
        .collect();

    let Some(angle) = median(&mut inliers) else {
        debug!("No lines inside the skew range; page treated as level");
        return SkewEstimate::level(candidates.len());
    };

    debug!(angle, inliers = inliers.len(), "Skew estimated");
    SkewEstimate {
        angle: SkewAngle(angle),
        candidate_count: candidates.len(),
        inlier_count: inliers.len(),
    }
}

/// Median of `values`, sorting them in place. An even count averages the two
/// middle values. `None` for an empty slice.
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}
