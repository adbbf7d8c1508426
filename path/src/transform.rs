// Copyright 2020 Canvas2D Contributors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use crate::point::Point;
use crate::scalar::Scalar;

/// An affine 2D transformation matrix.
///
/// Represents the matrix
///
/// ```text
/// | a c e |
/// | b d f |
/// | 0 0 1 |
/// ```
///
/// matching the layout HTML5 Canvas exposes through `DOMMatrix`/`setTransform`.
/// `multiply`/`translate`/`scale`/`rotate` are all *post*-multiplications:
/// `self.multiply(m)` produces `self · m`, i.e. `m` is applied in the
/// coordinate space established by `self`.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Transform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for Transform {
    #[inline]
    fn default() -> Self {
        Transform::identity()
    }
}

impl Transform {
    /// The identity transform.
    #[inline]
    pub const fn identity() -> Self {
        Transform { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 }
    }

    #[inline]
    pub fn from_row(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Transform { a, b, c, d, e, f }
    }

    #[inline]
    pub fn from_translate(tx: f32, ty: f32) -> Self {
        Transform { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: tx, f: ty }
    }

    #[inline]
    pub fn from_scale(sx: f32, sy: f32) -> Self {
        Transform { a: sx, b: 0.0, c: 0.0, d: sy, e: 0.0, f: 0.0 }
    }

    /// `angle` is in radians, clockwise in the usual y-down canvas space.
    pub fn from_rotate(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Transform { a: cos, b: sin, c: -sin, d: cos, e: 0.0, f: 0.0 }
    }

    /// Exact equality with the identity matrix, never approximate (per spec: `isIdentity`
    /// is exact, not within tolerance).
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.a == 1.0 && self.b == 0.0 && self.c == 0.0
            && self.d == 1.0 && self.e == 0.0 && self.f == 0.0
    }

    pub fn is_finite(&self) -> bool {
        self.a.is_finite() && self.b.is_finite() && self.c.is_finite()
            && self.d.is_finite() && self.e.is_finite() && self.f.is_finite()
    }

    /// `self · other`: `other` is applied in the coordinate space `self` establishes.
    #[must_use]
    pub fn multiply(&self, other: &Transform) -> Transform {
        Transform {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    #[must_use]
    pub fn pre_translate(&self, tx: f32, ty: f32) -> Transform {
        self.multiply(&Transform::from_translate(tx, ty))
    }

    #[must_use]
    pub fn pre_scale(&self, sx: f32, sy: f32) -> Transform {
        self.multiply(&Transform::from_scale(sx, sy))
    }

    #[must_use]
    pub fn pre_rotate(&self, angle: f32) -> Transform {
        self.multiply(&Transform::from_rotate(angle))
    }

    /// Maps a point from the space `self` maps *from* to the space it maps *into*.
    #[inline]
    pub fn map_point(&self, p: Point) -> Point {
        Point::from_xy(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    pub fn map_points(&self, points: &mut [Point]) {
        if self.is_identity() {
            return;
        }
        for p in points {
            *p = self.map_point(*p);
        }
    }

    fn determinant(&self) -> f32 {
        self.a * self.d - self.b * self.c
    }

    /// Inverts the transform. Returns `None` when the matrix is degenerate
    /// (`|ad - bc| <= epsilon`), matching the contract in the spec.
    pub fn invert(&self) -> Option<Transform> {
        let det = self.determinant();
        if det.abs() <= f32::EPSILON || !det.is_finite() {
            return None;
        }
        let inv_det = 1.0 / det;
        let a = self.d * inv_det;
        let b = -self.b * inv_det;
        let c = -self.c * inv_det;
        let d = self.a * inv_det;
        let e = -(a * self.e + c * self.f);
        let f = -(b * self.e + d * self.f);
        Some(Transform { a, b, c, d, e, f })
    }

    /// Rotation angle implied by the transform's linear part, via `atan2(b, a)`.
    pub fn rotation_angle(&self) -> f32 {
        self.b.atan2(self.a)
    }

    /// Scale along the local x axis, `hypot(a, b)`.
    pub fn scale_x(&self) -> f32 {
        self.a.hypot(self.b)
    }

    /// Scale along the local y axis, `hypot(c, d)`.
    pub fn scale_y(&self) -> f32 {
        self.c.hypot(self.d)
    }

    /// `true` when the linear part is a uniform scale possibly combined with
    /// rotation/translation but no skew — i.e. it maps any circle to a circle.
    pub fn has_uniform_scale(&self) -> bool {
        let sx = self.scale_x();
        let sy = self.scale_y();
        sx.is_nearly_equal(sy)
    }

    /// `true` when the transform has no rotation or skew (axes stay axis-aligned).
    pub fn is_axis_aligned(&self) -> bool {
        self.b.is_nearly_zero() && self.c.is_nearly_zero()
    }

    /// Scales a stroke line width by the transform's geometric-mean scale factor,
    /// `w * sqrt(|ad - bc|)`.
    pub fn scaled_line_width(&self, width: f32) -> f32 {
        width * self.determinant().abs().sqrt()
    }
}
