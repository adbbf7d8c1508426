// Copyright 2020 Canvas2D Contributors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Converts [`Path`] commands into polygon rings at a resolution-appropriate
//! tolerance, subdividing curves and sampling arcs just finely enough that
//! the chord error stays under the tolerance once mapped through the
//! current transform.

use core::f32::consts::PI;

use crate::path::{CornerRadii, Path, PathCommand};
use crate::point::Point;
use crate::rect::Rect;
use crate::transform::Transform;

/// The default flatness tolerance, in device pixels.
pub const DEFAULT_TOLERANCE: f32 = 0.25;

/// A flattened subpath: a polyline in device space plus whether it was
/// explicitly closed with `ClosePath`.
///
/// Open rings still contribute to stroking; filling conceptually closes
/// them with a straight segment back to the first point.
#[derive(Clone, Debug, Default)]
pub struct Ring {
    pub points: Vec<Point>,
    pub closed: bool,
}

impl Ring {
    fn push(&mut self, p: Point) {
        if self.points.last().map_or(true, |&last| last != p) {
            self.points.push(p);
        }
    }
}

struct Flattener<'a> {
    transform: &'a Transform,
    tolerance: f32,
    rings: Vec<Ring>,
    current: Ring,
    has_subpath: bool,
}

/// Flattens `path` into device-space polygon rings.
///
/// `tolerance` is a device-pixel flatness bound; it's converted into a
/// user-space bound internally by dividing by the transform's approximate
/// scale, so curves stay visually smooth regardless of zoom.
pub fn flatten_path(path: &Path, transform: &Transform, tolerance: f32) -> Vec<Ring> {
    let scale = transform.scale_x().max(transform.scale_y()).max(1e-6);
    let user_tolerance = (tolerance / scale).max(1e-6);

    let mut f = Flattener {
        transform,
        tolerance: user_tolerance,
        rings: Vec::new(),
        current: Ring::default(),
        has_subpath: false,
    };

    for cmd in path.commands() {
        f.apply(*cmd);
    }
    f.finish_subpath(false);
    f.rings
}

impl<'a> Flattener<'a> {
    fn finish_subpath(&mut self, closed: bool) {
        if !self.current.points.is_empty() {
            self.current.closed = closed;
            let ring = core::mem::take(&mut self.current);
            self.rings.push(ring);
        }
        self.has_subpath = false;
    }

    fn start_subpath(&mut self, p: Point) {
        self.finish_subpath(false);
        self.has_subpath = true;
        self.current.push(p);
    }

    fn line_to_user(&mut self, p: Point) {
        if !self.has_subpath {
            self.start_subpath(p);
        } else {
            self.current.push(p);
        }
    }

    fn apply(&mut self, cmd: PathCommand) {
        match cmd {
            PathCommand::MoveTo(p) => self.start_subpath(p),
            PathCommand::LineTo(p) => self.line_to_user(p),
            PathCommand::QuadTo { cp, to } => {
                let from = self.current.points.last().copied().unwrap_or(cp);
                flatten_quad(from, cp, to, self.tolerance, &mut |p| self.current.push(p));
                if !self.has_subpath {
                    self.has_subpath = true;
                }
            }
            PathCommand::CubicTo { c1, c2, to } => {
                let from = self.current.points.last().copied().unwrap_or(c1);
                flatten_cubic(from, c1, c2, to, self.tolerance, &mut |p| self.current.push(p));
                if !self.has_subpath {
                    self.has_subpath = true;
                }
            }
            PathCommand::Arc { center, radius, start_angle, end_angle, ccw } => {
                sample_arc(center, radius, radius, 0.0, start_angle, end_angle, ccw, self.tolerance, &mut |p| {
                    self.line_to_user(p)
                });
            }
            PathCommand::Ellipse { center, rx, ry, rotation, start_angle, end_angle, ccw } => {
                sample_arc(center, rx, ry, rotation, start_angle, end_angle, ccw, self.tolerance, &mut |p| {
                    self.line_to_user(p)
                });
            }
            PathCommand::Rect(rect) => self.apply_rect(rect),
            PathCommand::RoundRect(rect, radii) => self.apply_round_rect(rect, radii),
            PathCommand::Close => self.finish_subpath(true),
        }
    }

    fn apply_rect(&mut self, rect: Rect) {
        self.start_subpath(Point::from_xy(rect.left(), rect.top()));
        self.current.push(Point::from_xy(rect.right(), rect.top()));
        self.current.push(Point::from_xy(rect.right(), rect.bottom()));
        self.current.push(Point::from_xy(rect.left(), rect.bottom()));
        self.finish_subpath(true);
    }

    fn apply_round_rect(&mut self, rect: Rect, radii: CornerRadii) {
        let max_r = (rect.width().min(rect.height())) * 0.5;
        let tl = radii.top_left.clamp(0.0, max_r);
        let tr = radii.top_right.clamp(0.0, max_r);
        let br = radii.bottom_right.clamp(0.0, max_r);
        let bl = radii.bottom_left.clamp(0.0, max_r);

        let (l, t, r, b) = (rect.left(), rect.top(), rect.right(), rect.bottom());

        self.start_subpath(Point::from_xy(l + tl, t));
        self.current.push(Point::from_xy(r - tr, t));
        if tr > 0.0 {
            sample_arc(
                Point::from_xy(r - tr, t + tr), tr, tr, 0.0,
                -PI / 2.0, 0.0, false, self.tolerance,
                &mut |p| self.current.push(p),
            );
        }
        self.current.push(Point::from_xy(r, b - br));
        if br > 0.0 {
            sample_arc(
                Point::from_xy(r - br, b - br), br, br, 0.0,
                0.0, PI / 2.0, false, self.tolerance,
                &mut |p| self.current.push(p),
            );
        }
        self.current.push(Point::from_xy(l + bl, b));
        if bl > 0.0 {
            sample_arc(
                Point::from_xy(l + bl, b - bl), bl, bl, 0.0,
                PI / 2.0, PI, false, self.tolerance,
                &mut |p| self.current.push(p),
            );
        }
        self.current.push(Point::from_xy(l, t + tl));
        if tl > 0.0 {
            sample_arc(
                Point::from_xy(l + tl, t + tl), tl, tl, 0.0,
                PI, 1.5 * PI, false, self.tolerance,
                &mut |p| self.current.push(p),
            );
        }
        self.finish_subpath(true);
    }
}

// The device-space points pushed by the flattener still need the transform
// applied; callers map `Ring::points` themselves via `Transform::map_points`
// for composability with the stroker (which works in user space). See
// `flatten_path_device` below for the common "flatten then map" path.

/// Like [`flatten_path`] but also maps every point through `transform`,
/// which is what the polygon filler wants.
pub fn flatten_path_device(path: &Path, transform: &Transform, tolerance: f32) -> Vec<Ring> {
    let mut rings = flatten_path(path, transform, tolerance);
    for ring in &mut rings {
        transform.map_points(&mut ring.points);
    }
    rings
}

fn flatten_quad(p0: Point, p1: Point, p2: Point, tolerance: f32, emit: &mut dyn FnMut(Point)) {
    subdivide_quad(p0, p1, p2, tolerance, 0, emit);
    emit(p2);
}

fn subdivide_quad(p0: Point, p1: Point, p2: Point, tolerance: f32, depth: u32, emit: &mut dyn FnMut(Point)) {
    if depth >= 16 || flatness_quad(p0, p1, p2) <= tolerance {
        return;
    }
    let p01 = p0.lerp(p1, 0.5);
    let p12 = p1.lerp(p2, 0.5);
    let mid = p01.lerp(p12, 0.5);
    subdivide_quad(p0, p01, mid, tolerance, depth + 1, emit);
    emit(mid);
    subdivide_quad(mid, p12, p2, tolerance, depth + 1, emit);
}

fn flatness_quad(p0: Point, p1: Point, p2: Point) -> f32 {
    point_line_distance(p1, p0, p2)
}

fn flatten_cubic(p0: Point, p1: Point, p2: Point, p3: Point, tolerance: f32, emit: &mut dyn FnMut(Point)) {
    subdivide_cubic(p0, p1, p2, p3, tolerance, 0, emit);
    emit(p3);
}

fn subdivide_cubic(
    p0: Point, p1: Point, p2: Point, p3: Point,
    tolerance: f32, depth: u32, emit: &mut dyn FnMut(Point),
) {
    if depth >= 24 || flatness_cubic(p0, p1, p2, p3) <= tolerance {
        return;
    }
    let p01 = p0.lerp(p1, 0.5);
    let p12 = p1.lerp(p2, 0.5);
    let p23 = p2.lerp(p3, 0.5);
    let p012 = p01.lerp(p12, 0.5);
    let p123 = p12.lerp(p23, 0.5);
    let mid = p012.lerp(p123, 0.5);
    subdivide_cubic(p0, p01, p012, mid, tolerance, depth + 1, emit);
    emit(mid);
    subdivide_cubic(mid, p123, p23, p3, tolerance, depth + 1, emit);
}

fn flatness_cubic(p0: Point, p1: Point, p2: Point, p3: Point) -> f32 {
    point_line_distance(p1, p0, p3).max(point_line_distance(p2, p0, p3))
}

/// Perpendicular distance from `p` to the infinite line through `a`-`b`.
fn point_line_distance(p: Point, a: Point, b: Point) -> f32 {
    let ab = b - a;
    let len = ab.length();
    if len <= f32::EPSILON {
        return p.distance(a);
    }
    (ab.cross(p - a)).abs() / len
}

/// Samples a (possibly elliptical, possibly rotated) arc into line segments
/// whose chord error stays under `tolerance`, calling `emit` for every
/// sampled point (start point included, endpoint included).
#[allow(clippy::too_many_arguments)]
fn sample_arc(
    center: Point,
    rx: f32,
    ry: f32,
    rotation: f32,
    start_angle: f32,
    end_angle: f32,
    ccw: bool,
    tolerance: f32,
    emit: &mut dyn FnMut(Point),
) {
    let sweep = resolve_sweep(start_angle, end_angle, ccw);
    let radius = rx.max(ry).max(1e-6);
    // Chord error for a step `d_theta` on a circle of radius `r` is
    // approximately `r * (1 - cos(d_theta / 2))`; solve for the step that
    // keeps that under `tolerance`.
    let max_step = 2.0 * (1.0 - (tolerance / radius).min(1.0)).acos().max(1e-3);
    let steps = (sweep.abs() / max_step).ceil().max(1.0) as u32;

    let point_at = |angle: f32| -> Point {
        let (sin_r, cos_r) = rotation.sin_cos();
        let ex = rx * angle.cos();
        let ey = ry * angle.sin();
        Point::from_xy(center.x + ex * cos_r - ey * sin_r, center.y + ex * sin_r + ey * cos_r)
    };

    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        emit(point_at(start_angle + sweep * t));
    }
}

/// Resolves the signed sweep (in radians) from `start` to `end`, wrapping by
/// a full turn when needed so that `ccw=false` always sweeps through
/// increasing angles and `ccw=true` through decreasing ones.
fn resolve_sweep(start: f32, end: f32, ccw: bool) -> f32 {
    const TAU: f32 = 2.0 * PI;
    if !ccw {
        let mut sweep = end - start;
        while sweep < 0.0 {
            sweep += TAU;
        }
        if sweep == 0.0 {
            sweep = TAU;
        }
        sweep
    } else {
        let mut sweep = end - start;
        while sweep > 0.0 {
            sweep -= TAU;
        }
        if sweep == 0.0 {
            sweep = -TAU;
        }
        sweep
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path_builder::PathBuilder;

    #[test]
    fn rect_flattens_to_closed_quad() {
        let mut b = PathBuilder::new();
        b.rect(0.0, 0.0, 10.0, 20.0);
        let path = b.finish();
        let rings = flatten_path(&path, &Transform::identity(), DEFAULT_TOLERANCE);
        assert_eq!(rings.len(), 1);
        assert!(rings[0].closed);
        assert_eq!(rings[0].points.len(), 4);
    }

    #[test]
    fn full_circle_arc_samples_many_points() {
        let mut b = PathBuilder::new();
        b.arc(0.0, 0.0, 50.0, 0.0, 2.0 * PI, false);
        let path = b.finish();
        let rings = flatten_path(&path, &Transform::identity(), DEFAULT_TOLERANCE);
        assert_eq!(rings.len(), 1);
        assert!(rings[0].points.len() > 16);
    }

    #[test]
    fn open_subpath_is_not_marked_closed() {
        let mut b = PathBuilder::new();
        b.move_to(0.0, 0.0);
        b.line_to(10.0, 10.0);
        let path = b.finish();
        let rings = flatten_path(&path, &Transform::identity(), DEFAULT_TOLERANCE);
        assert_eq!(rings.len(), 1);
        assert!(!rings[0].closed);
    }
}
