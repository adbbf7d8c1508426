// Copyright 2020 Canvas2D Contributors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Per-pixel paint sampling, global alpha, composite-op blending and clip
//! testing (C9) — the thing every span from the polygon filler or a fast
//! path ultimately goes through.

use crate::blend::BlendMode;
use crate::color::Color;
use crate::fastpath::PixelSink;
use crate::mask::ClipMask;
use crate::paint::Paint;
use crate::surface::Surface;

/// Binds a surface, optional clip mask, blend mode and global alpha for
/// the duration of one draw call.
pub struct Compositor<'a> {
    pub surface: &'a mut Surface,
    pub clip: Option<&'a ClipMask>,
    pub blend: BlendMode,
    pub global_alpha: f32,
}

impl<'a> Compositor<'a> {
    #[inline]
    fn clip_allows(&self, x: i32, y: i32) -> bool {
        match self.clip {
            Some(mask) => x >= 0 && y >= 0 && mask.get(x as u32, y as u32),
            None => true,
        }
    }

    /// Composites `src` (not yet scaled by global alpha) onto `(x, y)`.
    pub fn write_source_pixel(&mut self, x: i32, y: i32, src: Color) {
        if !self.surface.contains(x, y) || !self.clip_allows(x, y) {
            return;
        }
        let mut sf = src.to_f32x4();
        sf[3] *= self.global_alpha.clamp(0.0, 1.0);
        if sf[3] <= 0.0 && self.blend.is_source_over() {
            return;
        }
        let dst = self.surface.get_pixel(x as u32, y as u32).unwrap_or(Color::TRANSPARENT);
        let out = self.blend.composite(sf, dst.to_f32x4());
        self.surface.set_pixel(x as u32, y as u32, Color::from_f32x4(out));
    }

    /// Samples `paint` per pixel across a generic-pipeline span — the
    /// paint can vary across the span (gradients, patterns), so this
    /// cannot collapse to a single packed write.
    pub fn write_paint_span(&mut self, y: i32, x0: i32, x1: i32, paint: &Paint) {
        for x in x0..=x1 {
            let color = paint.sample_device(x as f32 + 0.5, y as f32 + 0.5);
            self.write_source_pixel(x, y, color);
        }
    }

    /// Writes transparent black directly, bypassing blending entirely —
    /// `clearRect`'s contract (still honors the clip mask).
    pub fn clear_span(&mut self, y: i32, x0: i32, x1: i32) {
        for x in x0..=x1 {
            if self.surface.contains(x, y) && self.clip_allows(x, y) {
                self.surface.set_pixel(x as u32, y as u32, Color::TRANSPARENT);
            }
        }
    }
}

impl<'a> PixelSink for Compositor<'a> {
    fn write_span(&mut self, y: i32, x0: i32, x1: i32, color: Color) {
        for x in x0..=x1 {
            self.write_source_pixel(x, y, color);
        }
    }

    fn write_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.write_source_pixel(x, y, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opaque_surface(color: Color) -> Surface {
        let mut s = Surface::new(4, 4).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                s.set_pixel(x, y, color);
            }
        }
        s
    }

    /// Spec §8 end-to-end scenario 2: a translucent source-over fill
    /// composited over an already-opaque destination pixel blends rather
    /// than replacing it outright.
    #[test]
    fn translucent_source_over_blends_with_an_opaque_destination() {
        let mut surface = opaque_surface(Color::from_rgba(0, 0, 255, 255));
        let mut comp = Compositor { surface: &mut surface, clip: None, blend: BlendMode::SourceOver, global_alpha: 1.0 };
        comp.write_source_pixel(1, 1, Color::from_rgba(255, 0, 0, 128));

        let out = surface.get_pixel(1, 1).unwrap();
        assert_eq!(out.a, 255);
        assert!(out.r > 100 && out.r < 155);
        assert!(out.b > 100 && out.b < 155);
    }

    #[test]
    fn global_alpha_scales_an_already_opaque_source() {
        let mut surface = opaque_surface(Color::TRANSPARENT);
        let mut comp = Compositor { surface: &mut surface, clip: None, blend: BlendMode::SourceOver, global_alpha: 0.5 };
        comp.write_source_pixel(0, 0, Color::from_rgba(255, 255, 255, 255));

        let out = surface.get_pixel(0, 0).unwrap();
        assert_eq!(out.a, 128);
    }

    #[test]
    fn global_alpha_is_clamped_above_one() {
        let mut surface = opaque_surface(Color::TRANSPARENT);
        let mut comp = Compositor { surface: &mut surface, clip: None, blend: BlendMode::SourceOver, global_alpha: 5.0 };
        comp.write_source_pixel(0, 0, Color::from_rgba(10, 20, 30, 200));

        let out = surface.get_pixel(0, 0).unwrap();
        assert_eq!(out, Color::from_rgba(10, 20, 30, 200));
    }

    #[test]
    fn zero_alpha_source_over_is_a_fully_skipped_write() {
        let mut surface = opaque_surface(Color::from_rgba(9, 9, 9, 255));
        let mut comp = Compositor { surface: &mut surface, clip: None, blend: BlendMode::SourceOver, global_alpha: 0.0 };
        comp.write_source_pixel(0, 0, Color::from_rgba(255, 0, 0, 255));

        assert_eq!(surface.get_pixel(0, 0), Some(Color::from_rgba(9, 9, 9, 255)));
    }

    #[test]
    fn clip_mask_blocks_writes_outside_it() {
        let mut surface = opaque_surface(Color::TRANSPARENT);
        let mut mask = ClipMask::new_cleared(4, 4);
        mask.set(0, 0, true);
        let mut comp = Compositor { surface: &mut surface, clip: Some(&mask), blend: BlendMode::SourceOver, global_alpha: 1.0 };
        comp.write_source_pixel(0, 0, Color::BLACK);
        comp.write_source_pixel(1, 1, Color::BLACK);

        assert_eq!(surface.get_pixel(0, 0), Some(Color::BLACK));
        assert_eq!(surface.get_pixel(1, 1), Some(Color::TRANSPARENT));
    }

    #[test]
    fn clear_span_ignores_blend_mode_and_global_alpha() {
        let mut surface = opaque_surface(Color::from_rgba(255, 0, 0, 255));
        let mut comp = Compositor { surface: &mut surface, clip: None, blend: BlendMode::Xor, global_alpha: 0.2 };
        comp.clear_span(1, 0, 3);

        assert_eq!(surface.get_pixel(0, 1), Some(Color::TRANSPARENT));
        assert_eq!(surface.get_pixel(3, 1), Some(Color::TRANSPARENT));
        assert_eq!(surface.get_pixel(0, 0), Some(Color::from_rgba(255, 0, 0, 255)));
    }

    #[test]
    fn write_paint_span_samples_the_paint_at_each_pixel_center() {
        let mut surface = Surface::new(4, 4).unwrap();
        let mut comp = Compositor { surface: &mut surface, clip: None, blend: BlendMode::SourceOver, global_alpha: 1.0 };
        let paint = Paint::solid_color(Color::from_rgba(1, 2, 3, 255));
        comp.write_paint_span(0, 0, 2, &paint);

        for x in 0..=2 {
            assert_eq!(surface.get_pixel(x, 0), Some(Color::from_rgba(1, 2, 3, 255)));
        }
        assert_eq!(surface.get_pixel(3, 0), Some(Color::TRANSPARENT));
    }
}
