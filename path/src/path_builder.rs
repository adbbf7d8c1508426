// Copyright 2020 Canvas2D Contributors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use crate::path::{CornerRadii, Path, PathCommand};
use crate::point::Point;
use crate::rect::Rect;
use crate::scalar::Scalar;

/// Builds a [`Path`] by recording the HTML5 Canvas path-building operations.
///
/// Mirrors `CanvasRenderingContext2D`'s path methods: `moveTo`/`lineTo`
/// inject an implicit `moveTo(0, 0)` if the path is empty, and any drawing
/// call right after `closePath` implicitly reopens a new subpath at the
/// point the previous one started from.
#[derive(Clone, Debug, Default)]
pub struct PathBuilder {
    path: Path,
    current_point: Point,
    last_move_to: Point,
    move_to_required: bool,
}

impl PathBuilder {
    pub fn new() -> Self {
        PathBuilder {
            path: Path::default(),
            current_point: Point::zero(),
            last_move_to: Point::zero(),
            move_to_required: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn current_point(&self) -> Point {
        self.current_point
    }

    fn inject_move_to_if_needed(&mut self) {
        if self.move_to_required {
            let p = self.last_move_to;
            self.move_to(p.x, p.y);
        }
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        let p = Point::from_xy(x, y);
        self.path.commands.push(PathCommand::MoveTo(p));
        self.current_point = p;
        self.last_move_to = p;
        self.move_to_required = false;
    }

    pub fn line_to(&mut self, x: f32, y: f32) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        self.inject_move_to_if_needed();
        let p = Point::from_xy(x, y);
        self.path.commands.push(PathCommand::LineTo(p));
        self.current_point = p;
    }

    pub fn quad_to(&mut self, cpx: f32, cpy: f32, x: f32, y: f32) {
        if ![cpx, cpy, x, y].iter().all(|v| v.is_finite()) {
            return;
        }
        self.inject_move_to_if_needed();
        let to = Point::from_xy(x, y);
        self.path.commands.push(PathCommand::QuadTo { cp: Point::from_xy(cpx, cpy), to });
        self.current_point = to;
    }

    pub fn cubic_to(&mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) {
        if ![c1x, c1y, c2x, c2y, x, y].iter().all(|v| v.is_finite()) {
            return;
        }
        self.inject_move_to_if_needed();
        let to = Point::from_xy(x, y);
        self.path.commands.push(PathCommand::CubicTo {
            c1: Point::from_xy(c1x, c1y),
            c2: Point::from_xy(c2x, c2y),
            to,
        });
        self.current_point = to;
    }

    pub fn close_path(&mut self) {
        if self.path.is_empty() {
            return;
        }
        self.path.commands.push(PathCommand::Close);
        self.current_point = self.last_move_to;
        // The next drawing command starts a fresh subpath at the point the
        // closed one began from.
        self.move_to_required = true;
    }

    /// `arc(cx, cy, r, start_angle, end_angle, ccw)`. Draws a straight line
    /// from the current point to the arc's start point first, unless this is
    /// the first command in the path (then it behaves like a `moveTo`).
    pub fn arc(&mut self, cx: f32, cy: f32, r: f32, start_angle: f32, end_angle: f32, ccw: bool) {
        if !r.is_finite() || r < 0.0 || !cx.is_finite() || !cy.is_finite()
            || !start_angle.is_finite() || !end_angle.is_finite()
        {
            return;
        }
        let center = Point::from_xy(cx, cy);
        let start_point = Point::from_xy(cx + r * start_angle.cos(), cy + r * start_angle.sin());
        if self.move_to_required && self.path.is_empty() {
            self.move_to(start_point.x, start_point.y);
        } else {
            self.line_to(start_point.x, start_point.y);
        }
        if r == 0.0 {
            return;
        }
        self.path.commands.push(PathCommand::Arc {
            center,
            radius: r,
            start_angle,
            end_angle,
            ccw,
        });
        let end_point = Point::from_xy(cx + r * end_angle.cos(), cy + r * end_angle.sin());
        self.current_point = end_point;
    }

    /// `ellipse(cx, cy, rx, ry, rotation, start_angle, end_angle, ccw)`.
    #[allow(clippy::too_many_arguments)]
    pub fn ellipse(
        &mut self,
        cx: f32,
        cy: f32,
        rx: f32,
        ry: f32,
        rotation: f32,
        start_angle: f32,
        end_angle: f32,
        ccw: bool,
    ) {
        if !(rx.is_finite() && ry.is_finite() && rx >= 0.0 && ry >= 0.0) {
            return;
        }
        let center = Point::from_xy(cx, cy);
        let start_point = ellipse_point(center, rx, ry, rotation, start_angle);
        if self.move_to_required && self.path.is_empty() {
            self.move_to(start_point.x, start_point.y);
        } else {
            self.line_to(start_point.x, start_point.y);
        }
        self.path.commands.push(PathCommand::Ellipse {
            center,
            rx,
            ry,
            rotation,
            start_angle,
            end_angle,
            ccw,
        });
        self.current_point = ellipse_point(center, rx, ry, rotation, end_angle);
    }

    /// The HTML5 Canvas "tangent arc": a line to the tangent point on the
    /// `(current, x1,y1)` segment followed by a circular arc of radius `r`
    /// tangent to both `(current,x1,y1)` and `(x1,y1,x2,y2)`. Degenerates to
    /// a straight `lineTo(x1, y1)` when the segments are collinear or `r` is
    /// zero (per spec).
    pub fn arc_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, r: f32) {
        if ![x1, y1, x2, y2, r].iter().all(|v| v.is_finite()) || r < 0.0 {
            return;
        }

        let p0 = self.current_point;
        let p1 = Point::from_xy(x1, y1);
        let p2 = Point::from_xy(x2, y2);

        let v1 = p0 - p1;
        let v2 = p2 - p1;
        let (n1, n2) = match (v1.normalized(), v2.normalized()) {
            (Some(n1), Some(n2)) => (n1, n2),
            _ => {
                self.line_to(x1, y1);
                return;
            }
        };

        let cos_theta = n1.dot(n2).bound(-1.0, 1.0);
        let theta = cos_theta.acos();
        // Collinear (theta ~ 0 or ~ pi) or zero radius: degrade to a line.
        if r == 0.0 || theta.is_nearly_zero() || (core::f32::consts::PI - theta).is_nearly_zero() {
            self.line_to(x1, y1);
            return;
        }

        let dist_along = r / (theta * 0.5).tan();
        let t1 = p1 + n1 * dist_along;
        let t2 = p1 + n2 * dist_along;

        let bisector = match (n1 + n2).normalized() {
            Some(b) => b,
            None => {
                self.line_to(x1, y1);
                return;
            }
        };
        let dist_to_center = r / (theta * 0.5).sin();
        let center = p1 + bisector * dist_to_center;

        let start_angle = (t1.y - center.y).atan2(t1.x - center.x);
        let end_angle = (t2.y - center.y).atan2(t2.x - center.x);
        let ccw = v1.cross(v2) > 0.0;

        self.line_to(t1.x, t1.y);
        self.path.commands.push(PathCommand::Arc {
            center,
            radius: r,
            start_angle,
            end_angle,
            ccw,
        });
        self.current_point = t2;
    }

    /// `rect(x, y, w, h)`: no-op for non-positive/non-finite width or height.
    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let rect = match Rect::from_xywh(x, y, w, h) {
            Some(r) => r,
            None => return,
        };
        self.path.commands.push(PathCommand::Rect(rect));
        // Equivalent to Move;Line x3;Close;Move(start) per spec: the pen ends
        // back up at the rectangle's starting corner.
        self.current_point = Point::from_xy(x, y);
        self.last_move_to = self.current_point;
        self.move_to_required = false;
    }

    /// `roundRect(x, y, w, h, radii)`.
    pub fn round_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radii: CornerRadii) {
        let rect = match Rect::from_xywh(x, y, w, h) {
            Some(r) => r,
            None => return,
        };
        self.path.commands.push(PathCommand::RoundRect(rect, radii));
        self.current_point = Point::from_xy(x, y);
        self.last_move_to = self.current_point;
        self.move_to_required = false;
    }

    pub fn finish(self) -> Path {
        self.path
    }

    pub fn clear(&mut self) {
        *self = PathBuilder::new();
    }
}

fn ellipse_point(center: Point, rx: f32, ry: f32, rotation: f32, angle: f32) -> Point {
    let (sin_r, cos_r) = rotation.sin_cos();
    let ex = rx * angle.cos();
    let ey = ry * angle.sin();
    Point::from_xy(center.x + ex * cos_r - ey * sin_r, center.y + ex * sin_r + ey * cos_r)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arc_to_right_angle_corner() {
        let mut b = PathBuilder::new();
        b.move_to(0.0, 0.0);
        b.arc_to(10.0, 0.0, 10.0, 10.0, 5.0);
        let path = b.finish();
        let cmds = path.commands();
        // MoveTo, LineTo(5,0), Arc
        assert_eq!(cmds.len(), 3);
        match cmds[1] {
            PathCommand::LineTo(p) => {
                assert!((p.x - 5.0).abs() < 1e-4);
                assert!(p.y.abs() < 1e-4);
            }
            _ => panic!("expected LineTo"),
        }
        match cmds[2] {
            PathCommand::Arc { center, radius, .. } => {
                assert!((center.x - 5.0).abs() < 1e-4);
                assert!((center.y - 5.0).abs() < 1e-4);
                assert!((radius - 5.0).abs() < 1e-4);
            }
            _ => panic!("expected Arc"),
        }
    }

    #[test]
    fn arc_to_collinear_degrades_to_line() {
        let mut b = PathBuilder::new();
        b.move_to(0.0, 0.0);
        b.arc_to(5.0, 0.0, 10.0, 0.0, 3.0);
        let cmds = b.finish().commands().to_vec();
        assert!(cmds.iter().all(|c| !matches!(c, PathCommand::Arc { .. })));
    }

    #[test]
    fn rect_is_closed_and_resets_pen() {
        let mut b = PathBuilder::new();
        b.rect(10.0, 10.0, 5.0, 5.0);
        assert_eq!(b.current_point(), Point::from_xy(10.0, 10.0));
    }

    #[test]
    fn negative_size_rect_is_noop() {
        let mut b = PathBuilder::new();
        b.rect(0.0, 0.0, -5.0, 10.0);
        assert!(b.is_empty());
    }
}
