// Copyright 2020 Canvas2D Contributors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The error taxonomy this crate actually surfaces to callers.
//!
//! Most invalid input is absorbed silently (ignored setters, no-op zero
//! area rects, empty-stack `restore`) — that's HTML5 Canvas parity, not
//! an oversight. [`CanvasError`] only covers the handful of cases where a
//! factory operation genuinely cannot produce a usable value and the
//! caller needs to know.

/// Errors a factory or setter can report. Drawing operations themselves
/// never return this — see the module docs for why.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum CanvasError {
    /// An argument was the wrong type/shape/count for the operation
    /// (e.g. a gradient built with fewer than two stops where the
    /// operation requires at least one usable stop to be meaningful).
    ValidationFailure,
    /// A numeric argument fell outside its allowed range in a way that
    /// isn't simply "ignore it" (e.g. a negative `shadowBlur`).
    InvalidArgumentRange,
}

impl core::fmt::Display for CanvasError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            CanvasError::ValidationFailure => "validation failure",
            CanvasError::InvalidArgumentRange => "argument out of range",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for CanvasError {}
