// Copyright 2020 Canvas2D Contributors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The graphics-state stack and the dispatcher that mirrors the HTML5
//! Canvas 2D API surface (C11).

use canvas2d_path::{
    flatten_path_device, stroke_rings, CornerRadii, Dash, LineCap, LineJoin, Path, PathBuilder,
    Rect, StrokeProps, Transform, DEFAULT_TOLERANCE,
};

use crate::blend::BlendMode;
use crate::color::Color;
use crate::compositor::Compositor;
use crate::fastpath::{self, FastPathFlag};
use crate::image::Image;
use crate::mask::ClipMask;
use crate::paint::{Paint, Shader};
use crate::scan::{self, FillRule};
use crate::surface::Surface;

/// A snapshot of everything `save`/`restore` stacks. The current path is
/// deliberately excluded — it lives on [`Context`] directly.
#[derive(Clone, Debug)]
struct GraphicsState {
    transform: Transform,
    fill_shader: Shader,
    stroke_shader: Shader,
    line_width: f32,
    line_cap: LineCap,
    line_join: LineJoin,
    miter_limit: f32,
    dash_pattern: Vec<f32>,
    dash_offset: f32,
    global_alpha: f32,
    composite: BlendMode,
    clip: Option<ClipMask>,
    shadow_color: Color,
    shadow_blur: f32,
    shadow_offset_x: f32,
    shadow_offset_y: f32,
}

impl GraphicsState {
    fn new() -> Self {
        GraphicsState {
            transform: Transform::identity(),
            fill_shader: Shader::SolidColor(Color::BLACK),
            stroke_shader: Shader::SolidColor(Color::BLACK),
            line_width: 1.0,
            line_cap: LineCap::default(),
            line_join: LineJoin::default(),
            miter_limit: 10.0,
            dash_pattern: Vec::new(),
            dash_offset: 0.0,
            global_alpha: 1.0,
            composite: BlendMode::default(),
            clip: None,
            shadow_color: Color::TRANSPARENT,
            shadow_blur: 0.0,
            shadow_offset_x: 0.0,
            shadow_offset_y: 0.0,
        }
    }

    fn has_shadow(&self) -> bool {
        self.shadow_blur != 0.0 || self.shadow_offset_x != 0.0 || self.shadow_offset_y != 0.0
    }

    /// Builds the device-space stroke parameters for `transform`: line
    /// width and dash lengths are both scaled by the transform's
    /// geometric-mean scale factor, so a dash pattern set in user-space
    /// units keeps its proportions relative to the (also scaled) stroke
    /// width after any `scale`/`transform` call.
    fn device_stroke_props(&self, transform: &Transform) -> Option<StrokeProps> {
        let factor = transform.scaled_line_width(1.0);
        let width = self.line_width * factor;
        if !(width > 0.0) {
            return None;
        }
        let dash_pattern: Vec<f32> = self.dash_pattern.iter().map(|v| v * factor).collect();
        let dash = Dash::new(dash_pattern, self.dash_offset * factor);
        StrokeProps::new(width, self.line_cap, self.line_join, self.miter_limit)
            .map(|p| p.with_dash(dash))
    }
}

/// The rasterization engine's public entry point: owns the pixel buffer,
/// the graphics-state stack, and the path currently being built.
pub struct Context {
    surface: Surface,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    path: PathBuilder,
    fast_path: FastPathFlag,
}

impl Context {
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Some(Context {
            surface: Surface::new(width, height)?,
            state: GraphicsState::new(),
            stack: Vec::new(),
            path: PathBuilder::new(),
            fast_path: FastPathFlag::default(),
        })
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    /// Testable instrumentation hook (§8, §9): `true` once any draw since
    /// the last `reset_fast_path_flag` fell through to the generic
    /// path-based pipeline instead of a specialized fast path.
    pub fn is_path_based_rendering_used(&self) -> bool {
        self.fast_path.is_path_based_rendering_used()
    }

    pub fn reset_fast_path_flag(&mut self) {
        self.fast_path.reset();
    }

    // ---- save / restore ----------------------------------------------

    pub fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    /// Empty-stack `restore` is silently ignored (`EmptyState`).
    pub fn restore(&mut self) {
        if let Some(prev) = self.stack.pop() {
            self.state = prev;
        }
    }

    // ---- transform -----------------------------------------------------

    pub fn reset_transform(&mut self) {
        self.state.transform = Transform::identity();
    }

    pub fn set_transform(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.state.transform = Transform::from_row(a, b, c, d, e, f);
    }

    pub fn transform(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.state.transform = self.state.transform.multiply(&Transform::from_row(a, b, c, d, e, f));
    }

    pub fn translate(&mut self, x: f32, y: f32) {
        self.state.transform = self.state.transform.pre_translate(x, y);
    }

    pub fn scale(&mut self, x: f32, y: f32) {
        self.state.transform = self.state.transform.pre_scale(x, y);
    }

    pub fn rotate(&mut self, angle: f32) {
        self.state.transform = self.state.transform.pre_rotate(angle);
    }

    pub fn current_transform(&self) -> Transform {
        self.state.transform
    }

    // ---- style setters ---------------------------------------------------

    pub fn set_fill_style_color(&mut self, color: Color) {
        self.state.fill_shader = Shader::SolidColor(color);
    }

    pub fn set_fill_style_shader(&mut self, shader: Shader) {
        self.state.fill_shader = shader;
    }

    pub fn set_stroke_style_color(&mut self, color: Color) {
        self.state.stroke_shader = Shader::SolidColor(color);
    }

    pub fn set_stroke_style_shader(&mut self, shader: Shader) {
        self.state.stroke_shader = shader;
    }

    pub fn set_global_alpha(&mut self, alpha: f32) {
        if alpha.is_finite() && (0.0..=1.0).contains(&alpha) {
            self.state.global_alpha = alpha;
        }
    }

    pub fn set_global_composite_operation(&mut self, name: &str) {
        if let Some(mode) = BlendMode::from_name(name) {
            self.state.composite = mode;
        }
    }

    /// Non-finite/non-positive widths are ignored (`IgnoredInvalidSetter`).
    pub fn set_line_width(&mut self, width: f32) {
        if width.is_finite() && width > 0.0 {
            self.state.line_width = width;
        }
    }

    pub fn line_width(&self) -> f32 {
        self.state.line_width
    }

    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.state.line_cap = cap;
    }

    pub fn set_line_join(&mut self, join: LineJoin) {
        self.state.line_join = join;
    }

    pub fn set_miter_limit(&mut self, limit: f32) {
        if limit.is_finite() && limit > 0.0 {
            self.state.miter_limit = limit;
        }
    }

    /// `setLineDash`: an odd-length array is canvas-doubled at validation
    /// time already by [`Dash::new`]; here we keep the *user-facing*
    /// pattern (un-doubled) so `getLineDash` round-trips it verbatim.
    pub fn set_line_dash(&mut self, pattern: &[f32]) {
        if pattern.iter().all(|v| v.is_finite() && *v >= 0.0) {
            self.state.dash_pattern = pattern.to_vec();
        }
    }

    pub fn get_line_dash(&self) -> &[f32] {
        &self.state.dash_pattern
    }

    pub fn set_line_dash_offset(&mut self, offset: f32) {
        if offset.is_finite() {
            self.state.dash_offset = offset;
        }
    }

    pub fn set_shadow_color(&mut self, color: Color) {
        self.state.shadow_color = color;
    }

    pub fn set_shadow_blur(&mut self, blur: f32) {
        if blur.is_finite() && blur >= 0.0 {
            self.state.shadow_blur = blur;
        }
    }

    pub fn set_shadow_offset(&mut self, x: f32, y: f32) {
        if x.is_finite() {
            self.state.shadow_offset_x = x;
        }
        if y.is_finite() {
            self.state.shadow_offset_y = y;
        }
    }

    // ---- path building ---------------------------------------------------

    pub fn begin_path(&mut self) {
        self.path = PathBuilder::new();
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        self.path.move_to(x, y);
    }

    pub fn line_to(&mut self, x: f32, y: f32) {
        self.path.line_to(x, y);
    }

    pub fn quadratic_curve_to(&mut self, cpx: f32, cpy: f32, x: f32, y: f32) {
        self.path.quad_to(cpx, cpy, x, y);
    }

    pub fn bezier_curve_to(&mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) {
        self.path.cubic_to(c1x, c1y, c2x, c2y, x, y);
    }

    pub fn arc(&mut self, cx: f32, cy: f32, r: f32, start: f32, end: f32, ccw: bool) {
        self.path.arc(cx, cy, r, start, end, ccw);
    }

    pub fn ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, rot: f32, start: f32, end: f32, ccw: bool) {
        self.path.ellipse(cx, cy, rx, ry, rot, start, end, ccw);
    }

    pub fn arc_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, r: f32) {
        self.path.arc_to(x1, y1, x2, y2, r);
    }

    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.path.rect(x, y, w, h);
    }

    pub fn round_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radii: CornerRadii) {
        self.path.round_rect(x, y, w, h, radii);
    }

    pub fn close_path(&mut self) {
        self.path.close_path();
    }

    // ---- paint factory passthroughs ----------------------------------

    pub fn create_pattern_shader(image: Image, repetition: crate::paint::Repetition) -> Shader {
        Shader::Pattern(crate::paint::Pattern { image, repetition })
    }

    // ---- rectangle operations ---------------------------------------

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let rect = match Rect::from_xywh(x, y, w, h) {
            Some(r) => r,
            None => return,
        };
        if self.fast_rect_eligible() {
            let (dx0, dy0, dx1, dy1) = fastpath::device_rect_bounds(&self.state.transform, x, y, w, h);
            let color = self.state.fill_shader.as_solid_color().unwrap();
            let mut comp = self.compositor();
            fastpath::fill_rect(dx0, dy0, dx1, dy1, color, &mut comp);
        } else {
            self.fast_path.mark_path_based_rendering_used();
            let mut b = PathBuilder::new();
            b.rect(rect.x(), rect.y(), rect.width(), rect.height());
            self.fill_path_internal(&b.finish(), FillRule::NonZero);
        }
    }

    pub fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        if Rect::from_xywh(x, y, w, h).is_none() {
            return;
        }
        self.fast_path.mark_path_based_rendering_used();
        let mut b = PathBuilder::new();
        b.rect(x, y, w, h);
        self.stroke_path_internal(&b.finish());
    }

    /// Bypasses compositing entirely, per §4.11: writes transparent black
    /// directly, honoring the clip mask but ignoring `globalAlpha` and
    /// `globalCompositeOperation`.
    pub fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let rect = match Rect::from_xywh(x, y, w, h) {
            Some(r) => r,
            None => return,
        };
        let (dx0, dy0, dx1, dy1) =
            fastpath::device_rect_bounds(&self.state.transform, rect.x(), rect.y(), rect.width(), rect.height());
        let clip = self.state.clip.clone();
        let width = self.surface.width() as i32;
        let height = self.surface.height() as i32;
        let mut comp = Compositor { surface: &mut self.surface, clip: clip.as_ref(), blend: BlendMode::Copy, global_alpha: 1.0 };
        for y in dy0.max(0)..dy1.min(height) {
            comp.clear_span(y, dx0.max(0), (dx1 - 1).min(width - 1));
        }
    }

    fn fast_rect_eligible(&self) -> bool {
        fastpath::is_axis_aligned(&self.state.transform)
            && self.state.fill_shader.as_solid_color().is_some()
            && self.state.composite.is_source_over()
            && !self.state.has_shadow()
    }

    // ---- fill / stroke / clip ------------------------------------------

    pub fn fill(&mut self, rule: FillRule) {
        self.fast_path.mark_path_based_rendering_used();
        let path = self.path.clone().finish();
        self.fill_path_internal(&path, rule);
    }

    pub fn fill_path(&mut self, path: &Path, rule: FillRule) {
        self.fast_path.mark_path_based_rendering_used();
        self.fill_path_internal(path, rule);
    }

    pub fn stroke(&mut self) {
        self.fast_path.mark_path_based_rendering_used();
        let path = self.path.clone().finish();
        self.stroke_path_internal(&path);
    }

    pub fn stroke_path(&mut self, path: &Path) {
        self.fast_path.mark_path_based_rendering_used();
        self.stroke_path_internal(path);
    }

    fn fill_path_internal(&mut self, path: &Path, rule: FillRule) {
        let rings: Vec<_> = flatten_path_device(path, &self.state.transform, DEFAULT_TOLERANCE)
            .into_iter()
            .filter(|r| r.points.len() >= 2)
            .collect();
        let paint = Paint { shader: self.state.fill_shader.clone(), transform: self.state.transform };
        let (width, height) = (self.surface.width(), self.surface.height());
        let clip = self.state.clip.clone();
        let mut comp = Compositor { surface: &mut self.surface, clip: clip.as_ref(), blend: self.state.composite, global_alpha: self.state.global_alpha };
        scan::fill(&rings, rule, width, height, |span| comp.write_paint_span(span.y, span.x0, span.x1, &paint));
    }

    fn stroke_path_internal(&mut self, path: &Path) {
        let device_props = match self.state.device_stroke_props(&self.state.transform) {
            Some(p) => p,
            None => return,
        };
        let rings = flatten_path_device(path, &self.state.transform, DEFAULT_TOLERANCE);
        let outline = stroke_rings(&rings, &device_props, DEFAULT_TOLERANCE);
        let paint = Paint { shader: self.state.stroke_shader.clone(), transform: self.state.transform };
        let (width, height) = (self.surface.width(), self.surface.height());
        let clip = self.state.clip.clone();
        let mut comp = Compositor { surface: &mut self.surface, clip: clip.as_ref(), blend: self.state.composite, global_alpha: self.state.global_alpha };
        scan::fill(&outline, FillRule::NonZero, width, height, |span| comp.write_paint_span(span.y, span.x0, span.x1, &paint));
    }

    /// `clip(path, rule)`: rasterizes `path` into a temporary mask and
    /// intersects it into the current clip (or adopts it if there was
    /// none yet) — monotonic, per §4.8.
    pub fn clip(&mut self, rule: FillRule) {
        let path = self.path.clone().finish();
        self.clip_path(&path, rule);
    }

    pub fn clip_path(&mut self, path: &Path, rule: FillRule) {
        let (width, height) = (self.surface.width(), self.surface.height());
        let rings = flatten_path_device(path, &self.state.transform, DEFAULT_TOLERANCE);
        let mut temp = ClipMask::new_cleared(width, height);
        scan::fill(&rings, rule, width, height, |span| {
            for x in span.x0..=span.x1 {
                temp.set(x as u32, span.y as u32, true);
            }
        });
        match &mut self.state.clip {
            Some(existing) => existing.intersect_with(&temp),
            None => self.state.clip = Some(temp),
        }
    }

    // ---- drawImage --------------------------------------------------

    pub fn draw_image(&mut self, image: &Image, dx: f32, dy: f32) {
        self.draw_image_scaled(image, dx, dy, image.width() as f32, image.height() as f32);
    }

    pub fn draw_image_scaled(&mut self, image: &Image, dx: f32, dy: f32, dw: f32, dh: f32) {
        self.draw_image_full(image, 0.0, 0.0, image.width() as f32, image.height() as f32, dx, dy, dw, dh);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_image_full(
        &mut self,
        image: &Image,
        sx: f32,
        sy: f32,
        sw: f32,
        sh: f32,
        dx: f32,
        dy: f32,
        dw: f32,
        dh: f32,
    ) {
        if dw <= 0.0 || dh <= 0.0 || sw <= 0.0 || sh <= 0.0 {
            return;
        }
        let inv = match self.state.transform.invert() {
            Some(inv) => inv,
            None => {
                log::warn!("failed to invert the current transform; drawImage skipped");
                return;
            }
        };
        let (bx0, by0, bx1, by1) = fastpath::device_rect_bounds(&self.state.transform, dx, dy, dw, dh);
        let (width, height) = (self.surface.width() as i32, self.surface.height() as i32);
        let clip = self.state.clip.clone();
        let mut comp = Compositor { surface: &mut self.surface, clip: clip.as_ref(), blend: self.state.composite, global_alpha: self.state.global_alpha };
        for y in by0.max(0)..by1.min(height) {
            for x in bx0.max(0)..bx1.min(width) {
                let user = inv.map_point(canvas2d_path::Point::from_xy(x as f32 + 0.5, y as f32 + 0.5));
                let u = (user.x - dx) / dw;
                let v = (user.y - dy) / dh;
                if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
                    continue;
                }
                let src_x = (sx + u * sw).floor() as i64;
                let src_y = (sy + v * sh).floor() as i64;
                if let Some(color) = image.get_pixel(src_x, src_y) {
                    comp.write_source_pixel(x, y, color);
                }
            }
        }
    }

    // ---- hit testing --------------------------------------------------

    pub fn is_point_in_path(&self, x: f32, y: f32, rule: FillRule) -> bool {
        let path = self.path.clone().finish();
        self.is_point_in_path_of(&path, x, y, rule)
    }

    pub fn is_point_in_path_of(&self, path: &Path, x: f32, y: f32, rule: FillRule) -> bool {
        let rings = flatten_path_device(path, &self.state.transform, DEFAULT_TOLERANCE);
        scan::point_in(&rings, rule, x, y)
    }

    pub fn is_point_in_stroke(&self, x: f32, y: f32) -> bool {
        let path = self.path.clone().finish();
        self.is_point_in_stroke_of(&path, x, y)
    }

    pub fn is_point_in_stroke_of(&self, path: &Path, x: f32, y: f32) -> bool {
        let device_props = match self.state.device_stroke_props(&self.state.transform) {
            Some(p) => p,
            None => return false,
        };
        let rings = flatten_path_device(path, &self.state.transform, DEFAULT_TOLERANCE);
        let outline = stroke_rings(&rings, &device_props, DEFAULT_TOLERANCE);
        scan::point_in(&outline, FillRule::NonZero, x, y)
    }

    // ---- direct-shape performance operations -----------------------------

    pub fn fill_circle(&mut self, cx: f32, cy: f32, r: f32) {
        if r <= 0.0 {
            return;
        }
        if self.fast_circle_eligible() {
            let center = self.state.transform.map_point(canvas2d_path::Point::from_xy(cx, cy));
            let device_r = r * self.state.transform.scale_x();
            let color = self.state.fill_shader.as_solid_color().unwrap();
            let mut comp = self.compositor();
            fastpath::fill_circle(center.x, center.y, device_r, color, &mut comp);
        } else {
            self.fast_path.mark_path_based_rendering_used();
            let mut b = PathBuilder::new();
            b.arc(cx, cy, r, 0.0, core::f32::consts::TAU, false);
            self.fill_path_internal(&b.finish(), FillRule::NonZero);
        }
    }

    pub fn stroke_circle(&mut self, cx: f32, cy: f32, r: f32) {
        self.fast_path.mark_path_based_rendering_used();
        let mut b = PathBuilder::new();
        b.arc(cx, cy, r, 0.0, core::f32::consts::TAU, false);
        self.stroke_path_internal(&b.finish());
    }

    pub fn fill_and_stroke_circle(&mut self, cx: f32, cy: f32, r: f32) {
        self.fill_circle(cx, cy, r);
        self.stroke_circle(cx, cy, r);
    }

    pub fn stroke_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) {
        self.fast_path.mark_path_based_rendering_used();
        let mut b = PathBuilder::new();
        b.move_to(x0, y0);
        b.line_to(x1, y1);
        self.stroke_path_internal(&b.finish());
    }

    pub fn fill_arc(&mut self, cx: f32, cy: f32, r: f32, start: f32, end: f32, ccw: bool) {
        self.fast_path.mark_path_based_rendering_used();
        let mut b = PathBuilder::new();
        b.move_to(cx, cy);
        b.arc(cx, cy, r, start, end, ccw);
        b.close_path();
        self.fill_path_internal(&b.finish(), FillRule::NonZero);
    }

    pub fn outer_stroke_arc(&mut self, cx: f32, cy: f32, r: f32, start: f32, end: f32, ccw: bool) {
        self.fast_path.mark_path_based_rendering_used();
        let mut b = PathBuilder::new();
        b.arc(cx, cy, r, start, end, ccw);
        self.stroke_path_internal(&b.finish());
    }

    pub fn fill_and_outer_stroke_arc(&mut self, cx: f32, cy: f32, r: f32, start: f32, end: f32, ccw: bool) {
        self.fill_arc(cx, cy, r, start, end, ccw);
        self.outer_stroke_arc(cx, cy, r, start, end, ccw);
    }

    pub fn fill_round_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radii: CornerRadii) {
        self.fast_path.mark_path_based_rendering_used();
        let mut b = PathBuilder::new();
        b.round_rect(x, y, w, h, radii);
        self.fill_path_internal(&b.finish(), FillRule::NonZero);
    }

    pub fn stroke_round_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radii: CornerRadii) {
        self.fast_path.mark_path_based_rendering_used();
        let mut b = PathBuilder::new();
        b.round_rect(x, y, w, h, radii);
        self.stroke_path_internal(&b.finish());
    }

    pub fn fill_and_stroke_round_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radii: CornerRadii) {
        self.fill_round_rect(x, y, w, h, radii);
        self.stroke_round_rect(x, y, w, h, radii);
    }

    pub fn fill_and_stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.fill_rect(x, y, w, h);
        self.stroke_rect(x, y, w, h);
    }

    fn fast_circle_eligible(&self) -> bool {
        self.state.transform.has_uniform_scale()
            && self.state.fill_shader.as_solid_color().is_some()
            && self.state.composite.is_source_over()
            && !self.state.has_shadow()
    }

    fn compositor(&mut self) -> Compositor<'_> {
        Compositor {
            surface: &mut self.surface,
            clip: self.state.clip.as_ref(),
            blend: self.state.composite,
            global_alpha: self.state.global_alpha,
        }
    }
}
