// Copyright 2020 Canvas2D Contributors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Expands a flattened polyline into closed fill polygons representing its
//! stroked outline, honoring width, join, cap, miter limit and dash.

use core::f32::consts::PI;

use crate::dash::Dash;
use crate::flatten::Ring;
use crate::point::Point;

#[derive(Copy, Clone, PartialEq, Debug)]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

impl Default for LineCap {
    fn default() -> Self {
        LineCap::Butt
    }
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub enum LineJoin {
    Miter,
    Round,
    Bevel,
}

impl Default for LineJoin {
    fn default() -> Self {
        LineJoin::Miter
    }
}

/// Validated stroke parameters. `width` is guaranteed `> 0` and finite —
/// construct via [`StrokeProps::new`], which returns `None` for the
/// zero/negative/NaN/infinite widths the canvas spec says to ignore.
#[derive(Clone, Debug)]
pub struct StrokeProps {
    pub width: f32,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f32,
    pub dash: Option<Dash>,
}

impl StrokeProps {
    pub fn new(width: f32, line_cap: LineCap, line_join: LineJoin, miter_limit: f32) -> Option<Self> {
        if !width.is_finite() || width <= 0.0 || !miter_limit.is_finite() || miter_limit <= 0.0 {
            return None;
        }
        Some(StrokeProps { width, line_cap, line_join, miter_limit, dash: None })
    }

    pub fn with_dash(mut self, dash: Option<Dash>) -> Self {
        self.dash = dash;
        self
    }
}

/// Expands every ring into its stroke outline, applying the dash pattern
/// first when present. Output rings are always closed and meant to be
/// filled with the nonzero rule.
pub fn stroke_rings(rings: &[Ring], props: &StrokeProps, tolerance: f32) -> Vec<Ring> {
    let mut out = Vec::new();
    for ring in rings {
        if let Some(dash) = &props.dash {
            for seg in dash.split_ring(ring) {
                stroke_one(&seg, props, tolerance, &mut out);
            }
        } else {
            stroke_one(ring, props, tolerance, &mut out);
        }
    }
    out
}

fn stroke_one(ring: &Ring, props: &StrokeProps, tolerance: f32, out: &mut Vec<Ring>) {
    let pts = dedup(&ring.points);
    if pts.len() < 2 {
        if pts.len() == 1 && props.line_cap == LineCap::Round {
            // A single-point subpath with a round cap draws a dot.
            out.push(disc(pts[0], props.width * 0.5, tolerance));
        }
        return;
    }
    let half = props.width * 0.5;
    if ring.closed {
        out.push(offset_loop(&pts, half, true, props, tolerance));
        let mut reversed = pts.clone();
        reversed.reverse();
        out.push(offset_loop(&reversed, half, true, props, tolerance));
    } else {
        out.push(stroke_open(&pts, half, props, tolerance));
    }
}

fn dedup(points: &[Point]) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        if out.last().map_or(true, |&last| last.distance(p) > 1e-6) {
            out.push(p);
        }
    }
    out
}

fn edge_dirs(points: &[Point], closed: bool) -> Vec<Point> {
    let n = points.len();
    let edges = if closed { n } else { n - 1 };
    (0..edges)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            (b - a).normalized().unwrap_or(Point::from_xy(1.0, 0.0))
        })
        .collect()
}

fn unit_normal(dir: Point) -> Point {
    dir.ccw_normal()
}

/// Builds one offset side (outer when `offset` shares the loop's winding
/// sign, inner otherwise) of a **closed** polyline, including the join that
/// wraps from the last edge back to the first.
fn offset_loop(points: &[Point], half: f32, _closed: bool, props: &StrokeProps, tolerance: f32) -> Ring {
    let dirs = edge_dirs(points, true);
    let n = points.len();
    let mut out = Vec::new();
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let dir = dirs[i];
        let normal = unit_normal(dir);
        let oa = a + normal * half;
        let ob = b + normal * half;
        if !out.is_empty() {
            let prev_dir = dirs[(i + n - 1) % n];
            append_join(&mut out, prev_dir, dir, a, half, props, tolerance);
        }
        out.push(oa);
        out.push(ob);
    }
    // Join last edge back to first.
    append_join(&mut out, dirs[n - 1], dirs[0], points[0], half, props, tolerance);
    Ring { points: out, closed: true }
}

fn stroke_open(points: &[Point], half: f32, props: &StrokeProps, tolerance: f32) -> Ring {
    let dirs = edge_dirs(points, false);
    let left = build_open_side(points, &dirs, half, props, tolerance);
    let right = build_open_side(points, &dirs, -half, props, tolerance);

    let end_dir = *dirs.last().unwrap();
    let start_dir = dirs[0];

    let mut out = left.clone();
    append_cap(
        &mut out,
        *points.last().unwrap(),
        unit_normal(end_dir),
        end_dir,
        half,
        props.line_cap,
        tolerance,
    );
    out.extend(right.iter().rev().copied());
    append_cap(
        &mut out,
        points[0],
        unit_normal(start_dir) * -1.0,
        start_dir * -1.0,
        half,
        props.line_cap,
        tolerance,
    );

    Ring { points: out, closed: true }
}

fn build_open_side(
    points: &[Point],
    dirs: &[Point],
    offset: f32,
    props: &StrokeProps,
    tolerance: f32,
) -> Vec<Point> {
    let mut out = Vec::new();
    for (i, &dir) in dirs.iter().enumerate() {
        let a = points[i];
        let b = points[i + 1];
        let normal = unit_normal(dir);
        let oa = a + normal * offset;
        let ob = b + normal * offset;
        if i > 0 {
            append_join(&mut out, dirs[i - 1], dir, a, offset, props, tolerance);
        }
        out.push(oa);
        out.push(ob);
    }
    out
}

/// Appends the join geometry for the turn at `pivot` from edge direction
/// `d0` to `d1`, on the side offset by `offset` (signed: positive is the
/// "left" side of travel). No-op for a concave turn on this side — the
/// straight segment already closes the gap and any overlap is resolved by
/// the nonzero fill rule.
fn append_join(out: &mut Vec<Point>, d0: Point, d1: Point, pivot: Point, offset: f32, props: &StrokeProps, tolerance: f32) {
    let cross = d0.cross(d1);
    if cross.abs() < 1e-6 {
        return; // straight or reversing: no join needed
    }
    // `ccw_normal` is mirrored in screen (y-down) space, so the convex side
    // for a given offset sign is the opposite of the naive same-sign check.
    let turning_outward = (cross > 0.0) != (offset > 0.0);
    if !turning_outward {
        return;
    }

    let n0 = unit_normal(d0);
    let n1 = unit_normal(d1);
    let p0 = pivot + n0 * offset;
    let p1 = pivot + n1 * offset;

    match props.line_join {
        LineJoin::Bevel => {}
        LineJoin::Round => {
            append_arc_between(out, pivot, p0, p1, offset.abs(), tolerance);
        }
        LineJoin::Miter => {
            if let Some(miter_pt) = line_intersection(p0, d0, p1, d1) {
                let miter_len = miter_pt.distance(pivot);
                if miter_len <= props.miter_limit * offset.abs() {
                    out.push(miter_pt);
                }
            }
        }
    }
}

fn line_intersection(p0: Point, d0: Point, p1: Point, d1: Point) -> Option<Point> {
    let denom = d0.cross(d1);
    if denom.abs() < 1e-9 {
        return None;
    }
    let t = (p1 - p0).cross(d1) / denom;
    Some(p0 + d0 * t)
}

/// Samples the short way around `center` from `from` to `to` (both assumed
/// equidistant from `center`), appending intermediate points.
fn append_arc_between(out: &mut Vec<Point>, center: Point, from: Point, to: Point, radius: f32, tolerance: f32) {
    let a0 = (from.y - center.y).atan2(from.x - center.x);
    let mut a1 = (to.y - center.y).atan2(to.x - center.x);
    let mut sweep = a1 - a0;
    while sweep > PI {
        sweep -= 2.0 * PI;
    }
    while sweep < -PI {
        sweep += 2.0 * PI;
    }
    a1 = a0 + sweep;

    let steps = arc_steps(sweep, radius, tolerance);
    for i in 1..steps {
        let t = i as f32 / steps as f32;
        let a = a0 + sweep * t;
        out.push(Point::from_xy(center.x + radius * a.cos(), center.y + radius * a.sin()));
    }
}

fn arc_steps(sweep: f32, radius: f32, tolerance: f32) -> u32 {
    let radius = radius.max(1e-6);
    let max_step = 2.0 * (1.0 - (tolerance / radius).min(1.0)).acos().max(1e-3);
    (sweep.abs() / max_step).ceil().max(1.0) as u32
}

/// Appends the cap geometry at a path endpoint, connecting the "+half"
/// offset point (already the last point pushed) to the "-half" offset point
/// across the given outward normal/direction.
fn append_cap(out: &mut Vec<Point>, center: Point, normal: Point, dir: Point, half: f32, cap: LineCap, tolerance: f32) {
    match cap {
        LineCap::Butt => {}
        LineCap::Square => {
            let from = center + normal * half;
            let to = center - normal * half;
            out.push(from + dir * half);
            out.push(to + dir * half);
        }
        LineCap::Round => {
            let steps = arc_steps(PI, half, tolerance);
            for i in 1..steps {
                let t = i as f32 / steps as f32 * PI;
                out.push(center + normal * (half * t.cos()) + dir * (half * t.sin()));
            }
        }
    }
}

fn disc(center: Point, radius: f32, tolerance: f32) -> Ring {
    let steps = arc_steps(2.0 * PI, radius, tolerance).max(8);
    let points = (0..steps)
        .map(|i| {
            let a = i as f32 / steps as f32 * 2.0 * PI;
            Point::from_xy(center.x + radius * a.cos(), center.y + radius * a.sin())
        })
        .collect();
    Ring { points, closed: true }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_line_stroke_is_a_rectangle() {
        let pts = vec![Point::from_xy(0.0, 0.0), Point::from_xy(10.0, 0.0)];
        let props = StrokeProps::new(2.0, LineCap::Butt, LineJoin::Miter, 10.0).unwrap();
        let ring = Ring { points: pts, closed: false };
        let out = stroke_rings(&[ring], &props, 0.25);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].points.len(), 4);
    }

    #[test]
    fn square_cap_extends_past_endpoint() {
        let pts = vec![Point::from_xy(0.0, 0.0), Point::from_xy(10.0, 0.0)];
        let props = StrokeProps::new(2.0, LineCap::Square, LineJoin::Miter, 10.0).unwrap();
        let ring = Ring { points: pts, closed: false };
        let out = stroke_rings(&[ring], &props, 0.25);
        let max_x = out[0].points.iter().map(|p| p.x).fold(f32::MIN, f32::max);
        assert!(max_x > 10.5);
    }

    #[test]
    fn zero_width_is_rejected() {
        assert!(StrokeProps::new(0.0, LineCap::Butt, LineJoin::Miter, 10.0).is_none());
        assert!(StrokeProps::new(f32::NAN, LineCap::Butt, LineJoin::Miter, 10.0).is_none());
    }
}
