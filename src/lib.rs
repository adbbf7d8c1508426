// Copyright 2020 Canvas2D Contributors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! A pure-software, CPU-only implementation of the HTML5 Canvas 2D
//! rasterization model: non-premultiplied RGBA8 surfaces, aliased (no
//! antialiasing) scanline fills, Porter-Duff compositing, and the subset
//! of `CanvasRenderingContext2D` that draws pixels.
//!
//! GPU backends, font shaping/text layout, and a DOM are explicitly out of
//! scope — see [`Context`] for the drawing surface this crate does own.

mod blend;
mod color;
mod compositor;
mod context;
mod error;
mod fastpath;
mod image;
mod mask;
mod paint;
mod scan;
mod surface;

pub use blend::BlendMode;
pub use color::Color;
pub use context::Context;
pub use error::CanvasError;
pub use image::Image;
pub use mask::ClipMask;
pub use paint::{ConicGradient, GradientStop, LinearGradient, Paint, Pattern, RadialGradient, Repetition, Shader};
pub use scan::{FillRule, Span};
pub use surface::Surface;

pub use canvas2d_path::{
    CornerRadii, Dash, LineCap, LineJoin, Path, PathBuilder, PathCommand, Point, Rect, StrokeProps,
    Transform,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_rect_fast_path_does_not_mark_path_based_rendering() {
        let mut ctx = Context::new(20, 20).unwrap();
        ctx.set_fill_style_color(Color::from_rgba(255, 0, 0, 255));
        ctx.fill_rect(2.0, 2.0, 10.0, 10.0);
        assert!(!ctx.is_path_based_rendering_used());
        assert_eq!(ctx.surface().get_pixel(5, 5), Some(Color::from_rgba(255, 0, 0, 255)));
    }

    #[test]
    fn fill_rect_under_gradient_marks_path_based_rendering() {
        let mut ctx = Context::new(20, 20).unwrap();
        ctx.set_fill_style_shader(Shader::LinearGradient(LinearGradient {
            p0: Point::from_xy(0.0, 0.0),
            p1: Point::from_xy(20.0, 0.0),
            stops: vec![
                GradientStop::new(0.0, Color::BLACK),
                GradientStop::new(1.0, Color::from_rgba(255, 255, 255, 255)),
            ],
        }));
        ctx.fill_rect(2.0, 2.0, 10.0, 10.0);
        assert!(ctx.is_path_based_rendering_used());
    }

    #[test]
    fn save_restore_roundtrips_style_state() {
        let mut ctx = Context::new(10, 10).unwrap();
        ctx.set_fill_style_color(Color::from_rgba(1, 2, 3, 255));
        ctx.save();
        ctx.set_fill_style_color(Color::from_rgba(9, 9, 9, 255));
        ctx.restore();
        ctx.fill_rect(0.0, 0.0, 1.0, 1.0);
        assert_eq!(ctx.surface().get_pixel(0, 0), Some(Color::from_rgba(1, 2, 3, 255)));
    }

    #[test]
    fn empty_stack_restore_is_a_noop() {
        let mut ctx = Context::new(10, 10).unwrap();
        ctx.set_fill_style_color(Color::from_rgba(5, 5, 5, 255));
        ctx.restore();
        ctx.fill_rect(0.0, 0.0, 1.0, 1.0);
        assert_eq!(ctx.surface().get_pixel(0, 0), Some(Color::from_rgba(5, 5, 5, 255)));
    }

    #[test]
    fn clip_region_blocks_fills_outside_it() {
        let mut ctx = Context::new(10, 10).unwrap();
        ctx.rect(0.0, 0.0, 4.0, 10.0);
        ctx.clip(FillRule::NonZero);
        ctx.set_fill_style_color(Color::from_rgba(0, 255, 0, 255));
        ctx.fill_rect(0.0, 0.0, 10.0, 10.0);
        assert_eq!(ctx.surface().get_pixel(2, 5), Some(Color::from_rgba(0, 255, 0, 255)));
        assert_eq!(ctx.surface().get_pixel(8, 5), Some(Color::TRANSPARENT));
    }

    #[test]
    fn clear_rect_resets_to_transparent_ignoring_alpha_and_blend() {
        let mut ctx = Context::new(10, 10).unwrap();
        ctx.set_fill_style_color(Color::from_rgba(255, 0, 0, 255));
        ctx.fill_rect(0.0, 0.0, 10.0, 10.0);
        ctx.set_global_alpha(0.2);
        ctx.set_global_composite_operation("xor");
        ctx.clear_rect(2.0, 2.0, 4.0, 4.0);
        assert_eq!(ctx.surface().get_pixel(3, 3), Some(Color::TRANSPARENT));
    }

    #[test]
    fn zero_area_rect_is_a_noop() {
        let mut ctx = Context::new(10, 10).unwrap();
        ctx.set_fill_style_color(Color::from_rgba(255, 0, 0, 255));
        ctx.fill_rect(0.0, 0.0, 0.0, 5.0);
        assert_eq!(ctx.surface().get_pixel(0, 0), Some(Color::TRANSPARENT));
    }

    #[test]
    fn invalid_line_width_is_ignored() {
        let mut ctx = Context::new(10, 10).unwrap();
        ctx.set_line_width(3.0);
        ctx.set_line_width(-1.0);
        ctx.set_line_width(f32::NAN);
        assert_eq!(ctx.line_width(), 3.0);
    }

    #[test]
    fn draw_image_copies_pixels_nearest_neighbor() {
        let mut ctx = Context::new(4, 4).unwrap();
        let img = Image::from_rgba8(2, 2, vec![
            255, 0, 0, 255, 0, 255, 0, 255,
            0, 0, 255, 255, 255, 255, 0, 255,
        ]).unwrap();
        ctx.draw_image_scaled(&img, 0.0, 0.0, 4.0, 4.0);
        assert_eq!(ctx.surface().get_pixel(0, 0), Some(Color::from_rgba(255, 0, 0, 255)));
        assert_eq!(ctx.surface().get_pixel(3, 3), Some(Color::from_rgba(255, 255, 0, 255)));
    }

    #[test]
    fn is_point_in_path_matches_a_filled_rect() {
        let mut ctx = Context::new(20, 20).unwrap();
        ctx.rect(2.0, 2.0, 10.0, 10.0);
        assert!(ctx.is_point_in_path(5.0, 5.0, FillRule::NonZero));
        assert!(!ctx.is_point_in_path(15.0, 15.0, FillRule::NonZero));
    }
}
