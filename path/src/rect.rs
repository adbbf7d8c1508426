// Copyright 2020 Canvas2D Contributors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

/// An axis-aligned rectangle in user space, defined by `x`, `y`, `width`, `height`.
///
/// # Guarantees
///
/// - `width` and `height` are finite and `> 0`.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Rect {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl Rect {
    /// Creates a new `Rect`. Returns `None` for non-finite input or a
    /// non-positive width/height — per the canvas spec, those are silent
    /// no-ops rather than errors.
    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Option<Self> {
        if !x.is_finite() || !y.is_finite() || !(width > 0.0) || !(height > 0.0) {
            return None;
        }
        Some(Rect { x, y, width, height })
    }

    pub fn from_ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Option<Self> {
        Rect::from_xywh(left, top, right - left, bottom - top)
    }

    #[inline] pub fn x(&self) -> f32 { self.x }
    #[inline] pub fn y(&self) -> f32 { self.y }
    #[inline] pub fn width(&self) -> f32 { self.width }
    #[inline] pub fn height(&self) -> f32 { self.height }
    #[inline] pub fn left(&self) -> f32 { self.x }
    #[inline] pub fn top(&self) -> f32 { self.y }
    #[inline] pub fn right(&self) -> f32 { self.x + self.width }
    #[inline] pub fn bottom(&self) -> f32 { self.y + self.height }

    pub fn contains_point(&self, px: f32, py: f32) -> bool {
        px >= self.left() && px < self.right() && py >= self.top() && py < self.bottom()
    }
}
