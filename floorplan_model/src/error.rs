// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Model loading errors.

use std::fmt;

/// Errors raised while loading a model payload.
///
/// Degenerate geometry is not an error: short or zero-area rings are kept and skipped by
/// renderers and pickers.
#[derive(Debug)]
pub enum Error {
    /// The payload is not a valid model tree.
    Decode(serde_json::Error),
}

/// Result alias for model loading.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(e) => write!(f, "model decode failed: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e)
    }
}
