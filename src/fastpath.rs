// Copyright 2020 Canvas2D Contributors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Specialized rasterizers for the primitives the generic polygon pipeline
//! would be wasteful for: axis-aligned rectangles and full circles.
//!
//! Every routine here requires solid-color `source-over` with no shadow —
//! anything else routes through the generic pipeline in `context.rs`.

use canvas2d_path::{Point, Transform};

use crate::color::Color;

/// Carried on the [`crate::Context`] instance (never global state, per the
/// "no global state" design note). Set when a draw falls through to the
/// generic path-based (polygon) pipeline — *not* when a specialized fast
/// path fires — so tests can assert the opposite: that a fast path was
/// taken by asserting the flag stayed unset.
#[derive(Default, Debug)]
pub struct FastPathFlag {
    used: bool,
}

impl FastPathFlag {
    pub fn reset(&mut self) {
        self.used = false;
    }

    pub fn mark_path_based_rendering_used(&mut self) {
        self.used = true;
    }

    pub fn is_path_based_rendering_used(&self) -> bool {
        self.used
    }
}

/// A device-space pixel span producer, implemented by the caller (usually
/// closing over the surface, clip mask, blend mode and global alpha).
pub trait PixelSink {
    fn write_span(&mut self, y: i32, x0: i32, x1: i32, color: Color);
    fn write_pixel(&mut self, x: i32, y: i32, color: Color);
}

/// `true` only for a transform with no rotation/skew (axis-aligned
/// rectangles stay rectangles under it).
pub fn is_axis_aligned(t: &Transform) -> bool {
    t.is_axis_aligned()
}

/// Maps a user-space axis-aligned rect through an axis-aligned transform
/// into an integer device-space pixel rect `(x0, y0, x1, y1)` (`x1`/`y1`
/// exclusive). Uses the same column rule as the generic scanline filler
/// (`scan::emit_span`'s `x_in.ceil()..=x_out.floor()`): the low edge is
/// `ceil`'d and the high edge `floor`'d (then pushed out by one to turn the
/// inclusive `floor` bound into an exclusive one), so a fast-pathed rect and
/// the same rect routed through the generic pipeline cover identical pixels.
pub fn device_rect_bounds(t: &Transform, x: f32, y: f32, w: f32, h: f32) -> (i32, i32, i32, i32) {
    let p0 = t.map_point(Point::from_xy(x, y));
    let p1 = t.map_point(Point::from_xy(x + w, y + h));
    let (left, right) = if p0.x <= p1.x { (p0.x, p1.x) } else { (p1.x, p0.x) };
    let (top, bottom) = if p0.y <= p1.y { (p0.y, p1.y) } else { (p1.y, p0.y) };
    (left.ceil() as i32, top.ceil() as i32, right.floor() as i32 + 1, bottom.floor() as i32 + 1)
}

/// Fills an axis-aligned device-space rectangle with a flat color.
pub fn fill_rect<S: PixelSink>(x0: i32, y0: i32, x1: i32, y1: i32, color: Color, sink: &mut S) {
    for y in y0..y1 {
        sink.write_span(y, x0, x1 - 1, color);
    }
}

/// Fills a full circle at device-space center `(cx, cy)` with radius `r`
/// via per-row analytic half-widths (the scanline form of a midpoint
/// circle fill).
pub fn fill_circle<S: PixelSink>(cx: f32, cy: f32, r: f32, color: Color, sink: &mut S) {
    if r <= 0.0 {
        return;
    }
    let icy = cy.round() as i32;
    let ir = r.ceil() as i32;
    for dy in -ir..=ir {
        let y = icy + dy;
        let fy = y as f32 + 0.5 - cy;
        let under = r * r - fy * fy;
        if under < 0.0 {
            continue;
        }
        let dx = under.sqrt();
        let x0 = (cx - dx).round() as i32;
        let x1 = (cx + dx).round() as i32;
        if x1 >= x0 {
            sink.write_span(y, x0, x1, color);
        }
    }
}
