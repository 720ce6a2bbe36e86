// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — raster validation, luminance conversion, and rotation
// correction.

pub mod raster;
pub mod rotate;

pub use raster::{to_luma, validate_raster};
pub use rotate::{correct_rotation, rotation_matrix};
