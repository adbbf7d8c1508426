// Copyright 2020 Canvas2D Contributors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use crate::point::Point;
use crate::rect::Rect;

/// Per-corner radii for [`PathCommand::RoundRect`], following the HTML5
/// `roundRect` convention of one radius per corner.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct CornerRadii {
    pub top_left: f32,
    pub top_right: f32,
    pub bottom_right: f32,
    pub bottom_left: f32,
}

impl CornerRadii {
    pub fn uniform(r: f32) -> Self {
        CornerRadii { top_left: r, top_right: r, bottom_right: r, bottom_left: r }
    }
}

/// A single recorded path-building operation.
///
/// Paths are a tagged-variant sequence rather than parallel verb/point
/// arrays: arcs and rectangles keep their own parameters until the
/// flattener decides how finely to sample them, so the builder never has
/// to decode a generic command stream to answer "where does the pen end
/// up".
#[derive(Copy, Clone, Debug)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    QuadTo { cp: Point, to: Point },
    CubicTo { c1: Point, c2: Point, to: Point },
    /// A circular arc. Angles are in radians, measured clockwise from the
    /// positive x axis (canvas/y-down convention).
    Arc { center: Point, radius: f32, start_angle: f32, end_angle: f32, ccw: bool },
    Ellipse {
        center: Point,
        rx: f32,
        ry: f32,
        rotation: f32,
        start_angle: f32,
        end_angle: f32,
        ccw: bool,
    },
    Rect(Rect),
    RoundRect(Rect, CornerRadii),
    Close,
}

/// An immutable, append-only recording of path-building commands.
///
/// Produced by [`crate::PathBuilder`]. Rendering consumes a path by
/// flattening it into polygon rings; the path itself keeps the original
/// commands so repeated flattening at different transforms/tolerances
/// stays cheap to re-derive and exact.
#[derive(Clone, Debug, Default)]
pub struct Path {
    pub(crate) commands: Vec<PathCommand>,
}

impl Path {
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }
}
