// Copyright 2020 Canvas2D Contributors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Splits a flattened polyline into on/off segments for dashed strokes.

use crate::flatten::Ring;
use crate::point::Point;

/// A validated dash pattern: an even-length, non-negative, non-zero-sum
/// length array plus a starting offset into it.
#[derive(Clone, Debug, PartialEq)]
pub struct Dash {
    array: Vec<f32>,
    offset: f32,
}

impl Dash {
    /// `array` is doubled if its length is odd (canvas semantics). Returns
    /// `None` for a negative/non-finite entry, an all-zero pattern, or a
    /// non-finite offset — callers should treat that as "no dashing".
    pub fn new(mut array: Vec<f32>, offset: f32) -> Option<Self> {
        if array.is_empty() || !offset.is_finite() {
            return None;
        }
        if array.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return None;
        }
        if array.len() % 2 != 0 {
            let doubled = array.clone();
            array.extend(doubled);
        }
        if array.iter().sum::<f32>() <= 0.0 {
            return None;
        }
        Some(Dash { array, offset })
    }

    fn pattern_length(&self) -> f32 {
        self.array.iter().sum()
    }

    /// Splits `ring` into the "on" sub-polylines of the dash pattern,
    /// walking by cumulative arc length starting at `offset` (wrapped modulo
    /// the pattern length; negative offsets wrap to a positive equivalent
    /// traversal position, matching observed HTML5 Canvas behavior).
    pub fn split_ring(&self, ring: &Ring) -> Vec<Ring> {
        let points = closed_points(ring);
        if points.len() < 2 {
            return Vec::new();
        }

        let pattern_len = self.pattern_length();
        let mut pos = self.offset.rem_euclid(pattern_len);

        // Find which dash index and remaining length `pos` falls into.
        let mut index = 0usize;
        loop {
            let seg = self.array[index];
            if pos < seg {
                break;
            }
            pos -= seg;
            index = (index + 1) % self.array.len();
        }
        let mut remaining = self.array[index] - pos;
        let mut is_on = index % 2 == 0;

        let mut out = Vec::new();
        let mut current: Vec<Point> = Vec::new();
        if is_on {
            current.push(points[0]);
        }

        for window in points.windows(2) {
            let (a, b) = (window[0], window[1]);
            let mut seg_len = a.distance(b);
            let mut seg_start = a;

            while seg_len > remaining {
                let t = remaining / seg_len.max(f32::EPSILON);
                let cut = seg_start.lerp(b, t);
                if is_on {
                    current.push(cut);
                    if current.len() >= 2 {
                        out.push(Ring { points: core::mem::take(&mut current), closed: false });
                    } else {
                        current.clear();
                    }
                } else {
                    current.push(cut);
                }
                seg_len -= remaining;
                seg_start = cut;

                index = (index + 1) % self.array.len();
                remaining = self.array[index];
                is_on = index % 2 == 0;
                if is_on {
                    current.clear();
                    current.push(cut);
                }
            }

            remaining -= seg_len;
            if is_on {
                current.push(b);
            }
        }

        if is_on && current.len() >= 2 {
            out.push(Ring { points: current, closed: false });
        }

        out
    }
}

/// For a closed ring, appends the first point to the end so arc-length
/// walking treats the closing edge like any other segment.
fn closed_points(ring: &Ring) -> Vec<Point> {
    let mut pts = ring.points.clone();
    if ring.closed {
        if let Some(&first) = pts.first() {
            if pts.last() != Some(&first) {
                pts.push(first);
            }
        }
    }
    pts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(pts: &[(f32, f32)]) -> Ring {
        Ring { points: pts.iter().map(|&(x, y)| Point::from_xy(x, y)).collect(), closed: false }
    }

    #[test]
    fn odd_length_pattern_is_doubled() {
        let d = Dash::new(vec![5.0], 0.0).unwrap();
        assert_eq!(d.array, vec![5.0, 5.0]);
    }

    #[test]
    fn simple_dash_splits_into_segments() {
        let d = Dash::new(vec![2.0, 2.0], 0.0).unwrap();
        let r = ring(&[(0.0, 0.0), (10.0, 0.0)]);
        let parts = d.split_ring(&r);
        // on:0-2, off:2-4, on:4-6, off:6-8, on:8-10
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].points[0], Point::from_xy(0.0, 0.0));
        assert_eq!(parts[0].points.last().copied(), Some(Point::from_xy(2.0, 0.0)));
    }

    #[test]
    fn negative_offset_wraps() {
        let d = Dash::new(vec![2.0, 2.0], -4.0).unwrap();
        let r = ring(&[(0.0, 0.0), (10.0, 0.0)]);
        let parts_neg = d.split_ring(&r);
        let d2 = Dash::new(vec![2.0, 2.0], 0.0).unwrap();
        let parts_pos = d2.split_ring(&r);
        assert_eq!(parts_neg.len(), parts_pos.len());
    }
}
