// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Skew detection — edge/line extraction and the median skew estimator.

pub mod estimate;
pub mod extract;

pub use estimate::estimate_skew;
pub use extract::{edge_map, extract_lines};
