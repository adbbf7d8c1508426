// Copyright 2020 Canvas2D Contributors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The scanline polygon filler (C7): turns one or more flattened rings
//! into horizontal spans under the nonzero or evenodd fill rule.

use canvas2d_path::{Point, Ring};

/// Which pixels inside a self-intersecting or multi-ring polygon count as
/// "inside."
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum FillRule {
    NonZero,
    EvenOdd,
}

impl Default for FillRule {
    fn default() -> Self {
        FillRule::NonZero
    }
}

/// A closed, inclusive horizontal run of pixels on scanline `y`.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Span {
    pub y: i32,
    pub x0: i32,
    pub x1: i32,
}

struct Edge {
    y0: f32,
    y1: f32,
    x_at_y0: f32,
    dx_dy: f32,
    winding: i32,
}

/// Builds the scanning edge table from every ring. Filling conceptually
/// closes an open ring with a straight segment back to its first point, so
/// both open and closed rings are treated identically here.
fn build_edges(rings: &[Ring]) -> Vec<Edge> {
    let mut edges = Vec::new();
    for ring in rings {
        let pts = &ring.points;
        if pts.len() < 2 {
            continue;
        }
        for i in 0..pts.len() {
            let a = pts[i];
            let b = pts[(i + 1) % pts.len()];
            push_edge(&mut edges, a, b);
        }
    }
    edges
}

fn push_edge(edges: &mut Vec<Edge>, a: Point, b: Point) {
    if a.y == b.y {
        return; // horizontal edges never change winding at any scanline center
    }
    let (top, bottom, winding) = if a.y < b.y { (a, b, 1) } else { (b, a, -1) };
    let dx_dy = (bottom.x - top.x) / (bottom.y - top.y);
    edges.push(Edge { y0: top.y, y1: bottom.y, x_at_y0: top.x, dx_dy, winding });
}

/// Rasterizes `rings` under `rule`, calling `emit` once per span. `height`
/// bounds the scanline loop; `width` clamps span x-ranges. Scanline y
/// samples at `y + 0.5`, matching pixel-center sampling; per-edge
/// membership uses the half-open `[y0, y1)` rule so a shared vertex is
/// counted on exactly one of its two edges.
pub fn fill<F: FnMut(Span)>(rings: &[Ring], rule: FillRule, width: u32, height: u32, mut emit: F) {
    let edges = build_edges(rings);
    if edges.is_empty() {
        return;
    }

    let min_y = edges.iter().map(|e| e.y0).fold(f32::INFINITY, f32::min).floor().max(0.0);
    let max_y = edges.iter().map(|e| e.y1).fold(f32::NEG_INFINITY, f32::max).ceil().min(height as f32);
    if !(min_y < max_y) {
        return;
    }

    let mut xs: Vec<(f32, i32)> = Vec::new();
    let mut y = min_y as i32;
    while (y as f32) < max_y {
        let sample_y = y as f32 + 0.5;
        xs.clear();
        for e in &edges {
            if sample_y >= e.y0 && sample_y < e.y1 {
                let x = e.x_at_y0 + (sample_y - e.y0) * e.dx_dy;
                xs.push((x, e.winding));
            }
        }
        if !xs.is_empty() {
            xs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(core::cmp::Ordering::Equal));
            emit_spans(&xs, rule, y, width, &mut emit);
        }
        y += 1;
    }
}

fn emit_spans<F: FnMut(Span)>(xs: &[(f32, i32)], rule: FillRule, y: i32, width: u32, emit: &mut F) {
    let mut winding = 0;
    let mut run_start: Option<f32> = None;
    let is_inside = |w: i32| match rule {
        FillRule::NonZero => w != 0,
        FillRule::EvenOdd => w % 2 != 0,
    };

    for &(x, w) in xs {
        let was_inside = is_inside(winding);
        winding += w;
        let now_inside = is_inside(winding);
        if !was_inside && now_inside {
            run_start = Some(x);
        } else if was_inside && !now_inside {
            if let Some(start) = run_start.take() {
                emit_span(start, x, y, width, emit);
            }
        }
    }
}

fn emit_span<F: FnMut(Span)>(x_in: f32, x_out: f32, y: i32, width: u32, emit: &mut F) {
    let x0 = x_in.ceil() as i32;
    let x1 = x_out.floor() as i32;
    let x0 = x0.max(0);
    let x1 = x1.min(width as i32 - 1);
    if x0 <= x1 {
        emit(Span { y, x0, x1 });
    }
}

/// Tests whether `(x, y)` falls inside `rings` under `rule`, via the same
/// edge table and half-open `[y0, y1)` membership rule the scanline fill
/// uses, sampled at the exact point rather than a scanline center (used by
/// `isPointInPath`/`isPointInStroke`, which test a caller-given point
/// directly rather than a pixel center).
pub fn point_in(rings: &[Ring], rule: FillRule, x: f32, y: f32) -> bool {
    let edges = build_edges(rings);
    let mut winding = 0;
    for e in &edges {
        if y >= e.y0 && y < e.y1 {
            let ex = e.x_at_y0 + (y - e.y0) * e.dx_dy;
            if ex < x {
                winding += e.winding;
            }
        }
    }
    match rule {
        FillRule::NonZero => winding != 0,
        FillRule::EvenOdd => winding % 2 != 0,
    }
}

/// Collects every span into a `Vec`, for tests and callers that don't need
/// streaming output.
pub fn fill_to_vec(rings: &[Ring], rule: FillRule, width: u32, height: u32) -> Vec<Span> {
    let mut out = Vec::new();
    fill(rings, rule, width, height, |s| out.push(s));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(pts: &[(f32, f32)], closed: bool) -> Ring {
        Ring { points: pts.iter().map(|&(x, y)| Point::from_xy(x, y)).collect(), closed }
    }

    #[test]
    fn square_fills_interior_scanlines() {
        let r = ring(&[(2.0, 2.0), (8.0, 2.0), (8.0, 8.0), (2.0, 8.0)], true);
        let spans = fill_to_vec(&[r], FillRule::NonZero, 10, 10);
        assert_eq!(spans.len(), 6); // y = 2..=7
        for s in &spans {
            assert_eq!((s.x0, s.x1), (2, 7));
        }
    }

    #[test]
    fn evenodd_clears_overlapping_region_of_two_identical_squares() {
        let outer = ring(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)], true);
        let inner = ring(&[(3.0, 3.0), (7.0, 3.0), (7.0, 7.0), (3.0, 7.0)], true);
        let spans = fill_to_vec(&[outer, inner], FillRule::EvenOdd, 10, 10);
        // At y=5 the evenodd rule should produce two spans: left ring and right ring,
        // with a hole over the inner square.
        let row: Vec<_> = spans.iter().filter(|s| s.y == 5).collect();
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn nonzero_keeps_overlap_of_two_identical_squares_filled() {
        let outer = ring(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)], true);
        let inner = ring(&[(3.0, 3.0), (7.0, 3.0), (7.0, 7.0), (3.0, 7.0)], true);
        let spans = fill_to_vec(&[outer, inner], FillRule::NonZero, 10, 10);
        let row: Vec<_> = spans.iter().filter(|s| s.y == 5).collect();
        assert_eq!(row.len(), 1);
        assert_eq!((row[0].x0, row[0].x1), (0, 9));
    }

    #[test]
    fn open_ring_is_implicitly_closed_for_filling() {
        let r = ring(&[(2.0, 2.0), (8.0, 2.0), (8.0, 8.0), (2.0, 8.0)], false);
        let spans = fill_to_vec(&[r], FillRule::NonZero, 10, 10);
        assert_eq!(spans.len(), 6);
    }

    #[test]
    fn point_in_matches_fill_for_interior_and_exterior_points() {
        let tri = ring(&[(10.0, 10.0), (90.0, 10.0), (50.0, 90.0)], true);
        assert!(point_in(&[tri.clone()], FillRule::NonZero, 50.0, 50.0));
        assert!(!point_in(&[tri], FillRule::NonZero, 5.0, 5.0));
    }

    #[test]
    fn triangle_fill_matches_expected_interior_point() {
        let tri = ring(&[(10.0, 10.0), (90.0, 10.0), (50.0, 90.0)], true);
        let spans = fill_to_vec(&[tri], FillRule::EvenOdd, 100, 100);
        let contains = |x: i32, y: i32| spans.iter().any(|s| s.y == y && s.x0 <= x && x <= s.x1);
        assert!(contains(50, 50));
        assert!(!contains(5, 5));
    }
}
