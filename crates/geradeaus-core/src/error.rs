// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Geradeaus.

use thiserror::Error;

/// Top-level error type for all deskew operations.
///
/// A page with no detectable lines is not an error: it resolves to a zero
/// skew angle. Everything here is a violated precondition or an allocation
/// the process could not satisfy.
#[derive(Debug, Error)]
pub enum DeskewError {
    // -- Input --
    #[error("invalid input image: {0}")]
    InvalidInput(String),

    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    // -- Configuration --
    #[error("invalid deskew configuration: {0}")]
    InvalidConfig(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Coarse classification of a [`DeskewError`], for callers that decide
/// whether to retry or report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The image itself is unusable (empty, wrong pixel layout).
    InvalidInput,
    /// The image is too large or memory could not be reserved.
    ResourceExhausted,
    /// The tunables are out of range or could not be parsed.
    Configuration,
    /// The configuration file could not be read.
    Io,
}

impl DeskewError {
    /// Classify this error. The core never retries; this is for the caller.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DeskewError::InvalidInput(_) => ErrorKind::InvalidInput,
            DeskewError::ResourceExhausted(_) => ErrorKind::ResourceExhausted,
            DeskewError::InvalidConfig(_) | DeskewError::Serialization(_) => {
                ErrorKind::Configuration
            }
            DeskewError::Io(_) => ErrorKind::Io,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DeskewError>;
