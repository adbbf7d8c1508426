// Copyright 2020 Canvas2D Contributors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Paint sources: solid colors, gradients, and image patterns.
//!
//! Modeled as a single tagged variant (`Shader`) sampled through one
//! `sample(x, y) -> Color` method, per the "sum types vs class hierarchies"
//! design note — the compositor reads the variant tag once per span rather
//! than re-dispatching per pixel.

use core::f32::consts::PI;

use canvas2d_path::{Point, Transform};

use crate::color::Color;
use crate::image::Image;

/// A single `(offset, color)` gradient stop. Offsets are clamped to
/// `[0, 1]`; stops are interpreted in insertion order, so duplicate
/// offsets produce a hard transition rather than being merged.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Color,
}

impl GradientStop {
    pub fn new(offset: f32, color: Color) -> Self {
        GradientStop { offset: offset.clamp(0.0, 1.0), color }
    }
}

fn sample_stops(stops: &[GradientStop], t: f32) -> Color {
    if stops.len() < 2 {
        return Color::TRANSPARENT;
    }
    let t = t.clamp(0.0, 1.0);
    if t <= stops[0].offset {
        return stops[0].color;
    }
    let last = stops.len() - 1;
    if t >= stops[last].offset {
        return stops[last].color;
    }
    for w in stops.windows(2) {
        let (a, b) = (w[0], w[1]);
        if t >= a.offset && t <= b.offset {
            let span = b.offset - a.offset;
            let local_t = if span > 0.0 { (t - a.offset) / span } else { 1.0 };
            return a.color.lerp(b.color, local_t);
        }
    }
    stops[last].color
}

/// A gradient that varies linearly along the segment `p0 -> p1`.
#[derive(Clone, Debug)]
pub struct LinearGradient {
    pub p0: Point,
    pub p1: Point,
    pub stops: Vec<GradientStop>,
}

impl LinearGradient {
    fn sample(&self, x: f32, y: f32) -> Color {
        let d = self.p1 - self.p0;
        let len_sq = d.dot(d);
        if len_sq <= 0.0 {
            return Color::TRANSPARENT;
        }
        let p = Point::from_xy(x, y) - self.p0;
        let t = p.dot(d) / len_sq;
        sample_stops(&self.stops, t)
    }
}

/// A gradient between two circles `(c0, r0)` and `(c1, r1)`, matching the
/// HTML5 Canvas "pencil of circles" construction.
#[derive(Clone, Debug)]
pub struct RadialGradient {
    pub c0: Point,
    pub r0: f32,
    pub c1: Point,
    pub r1: f32,
    pub stops: Vec<GradientStop>,
}

impl RadialGradient {
    fn sample(&self, x: f32, y: f32) -> Color {
        // Solve |P - lerp(c0,c1,t)| = lerp(r0,r1,t) for the largest valid
        // t, i.e. the quadratic a*t^2 + b*t + c = 0 in the pencil of
        // circles interpolating between the two given circles.
        let p = Point::from_xy(x, y);
        let dc = self.c1 - self.c0;
        let dr = self.r1 - self.r0;
        let pc = p - self.c0;

        let a = dc.dot(dc) - dr * dr;
        let b = -2.0 * (pc.dot(dc) + self.r0 * dr);
        let c = pc.dot(pc) - self.r0 * self.r0;

        let t = if a.abs() < 1e-6 {
            if b.abs() < 1e-6 {
                return Color::TRANSPARENT;
            }
            -c / b
        } else {
            let disc = b * b - 4.0 * a * c;
            if disc < 0.0 {
                return Color::TRANSPARENT;
            }
            let sqrt_disc = disc.sqrt();
            let t0 = (-b + sqrt_disc) / (2.0 * a);
            let t1 = (-b - sqrt_disc) / (2.0 * a);
            let valid = |t: f32| self.r0 + t * dr >= 0.0;
            match (valid(t0), valid(t1)) {
                (true, true) => t0.max(t1),
                (true, false) => t0,
                (false, true) => t1,
                (false, false) => return Color::TRANSPARENT,
            }
        };

        sample_stops(&self.stops, t)
    }
}

/// A gradient that sweeps around `center` starting at `start_angle`.
#[derive(Clone, Debug)]
pub struct ConicGradient {
    pub center: Point,
    pub start_angle: f32,
    pub stops: Vec<GradientStop>,
}

impl ConicGradient {
    fn sample(&self, x: f32, y: f32) -> Color {
        let angle = (y - self.center.y).atan2(x - self.center.x);
        let mut t = (angle - self.start_angle) % (2.0 * PI);
        if t < 0.0 {
            t += 2.0 * PI;
        }
        sample_stops(&self.stops, t / (2.0 * PI))
    }
}

/// How a [`Pattern`] tiles outside its source image's bounds.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Repetition {
    Repeat,
    RepeatX,
    RepeatY,
    NoRepeat,
}

/// An image tiled per a [`Repetition`] mode, sampled nearest-neighbor.
#[derive(Clone, Debug)]
pub struct Pattern {
    pub image: Image,
    pub repetition: Repetition,
}

impl Pattern {
    fn sample(&self, x: f32, y: f32) -> Color {
        let w = self.image.width() as i64;
        let h = self.image.height() as i64;
        let ix = x.floor() as i64;
        let iy = y.floor() as i64;

        let (sx, in_x) = wrap(ix, w, matches!(self.repetition, Repetition::Repeat | Repetition::RepeatX));
        let (sy, in_y) = wrap(iy, h, matches!(self.repetition, Repetition::Repeat | Repetition::RepeatY));
        if !in_x || !in_y {
            return Color::TRANSPARENT;
        }
        self.image.get_pixel(sx, sy).unwrap_or(Color::TRANSPARENT)
    }
}

/// `rem_euclid`-wraps `v` into `[0, len)` when `wrap` is set; otherwise
/// reports whether `v` already falls in range.
fn wrap(v: i64, len: i64, wrap_axis: bool) -> (i64, bool) {
    if wrap_axis {
        (v.rem_euclid(len), true)
    } else {
        (v, v >= 0 && v < len)
    }
}

/// A paint source: a tagged union of everything `fillStyle`/`strokeStyle`
/// can hold.
#[derive(Clone, Debug)]
pub enum Shader {
    SolidColor(Color),
    LinearGradient(LinearGradient),
    RadialGradient(RadialGradient),
    ConicGradient(ConicGradient),
    Pattern(Pattern),
}

impl Shader {
    /// Samples the paint at a point in **paint-local space** — callers
    /// sampling in device space must first apply the inverse of whatever
    /// transform was active when the paint was bound.
    pub fn sample(&self, x: f32, y: f32) -> Color {
        match self {
            Shader::SolidColor(c) => *c,
            Shader::LinearGradient(g) => g.sample(x, y),
            Shader::RadialGradient(g) => g.sample(x, y),
            Shader::ConicGradient(g) => g.sample(x, y),
            Shader::Pattern(p) => p.sample(x, y),
        }
    }

    /// Fast-path eligibility per §4.10: only an opaque or translucent
    /// solid color can ever feed a specialized rasterizer.
    pub fn as_solid_color(&self) -> Option<Color> {
        match self {
            Shader::SolidColor(c) => Some(*c),
            _ => None,
        }
    }
}

/// A bound paint: a [`Shader`] plus the transform that was active when it
/// was set, used to map device-space sample points back into paint-local
/// space.
#[derive(Clone, Debug)]
pub struct Paint {
    pub shader: Shader,
    pub transform: Transform,
}

impl Paint {
    pub fn solid_color(color: Color) -> Self {
        Paint { shader: Shader::SolidColor(color), transform: Transform::identity() }
    }

    /// Samples at device-space `(x, y)`, mapping back into paint-local
    /// space first. Falls back to transparent black if the paint's
    /// transform is not invertible (soft failure, logged).
    pub fn sample_device(&self, x: f32, y: f32) -> Color {
        match self.shader {
            Shader::SolidColor(c) => c,
            _ => match self.transform.invert() {
                Some(inv) => {
                    let p = inv.map_point(Point::from_xy(x, y));
                    self.shader.sample(p.x, p.y)
                }
                None => {
                    log::warn!("failed to invert a paint transform; nothing will be painted");
                    Color::TRANSPARENT
                }
            },
        }
    }
}
