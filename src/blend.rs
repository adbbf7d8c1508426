// Copyright 2020 Canvas2D Contributors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! `globalCompositeOperation` and the Porter-Duff math the compositor uses
//! to combine a source color with a destination pixel.

/// A compositing (blend) operation, selectable via
/// `globalCompositeOperation`.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum BlendMode {
    SourceOver,
    DestinationOver,
    SourceIn,
    DestinationIn,
    SourceOut,
    DestinationOut,
    SourceAtop,
    DestinationAtop,
    Xor,
    Copy,
    /// Additive blending (`lighter`).
    Lighter,
}

impl Default for BlendMode {
    fn default() -> Self {
        BlendMode::SourceOver
    }
}

impl BlendMode {
    /// Parses the HTML5 Canvas `globalCompositeOperation` string. Unknown
    /// names are rejected (callers should keep the prior value, mirroring
    /// `IgnoredInvalidSetter`).
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "source-over" => BlendMode::SourceOver,
            "destination-over" => BlendMode::DestinationOver,
            "source-in" => BlendMode::SourceIn,
            "destination-in" => BlendMode::DestinationIn,
            "source-out" => BlendMode::SourceOut,
            "destination-out" => BlendMode::DestinationOut,
            "source-atop" => BlendMode::SourceAtop,
            "destination-atop" => BlendMode::DestinationAtop,
            "xor" => BlendMode::Xor,
            "copy" => BlendMode::Copy,
            "lighter" => BlendMode::Lighter,
            _ => return None,
        })
    }

    /// Whether this op can ever be satisfied by a plain opaque 32-bit
    /// packed write (only true for `source-over` writing an opaque,
    /// fully-covering source — see fast-path dispatch).
    #[inline]
    pub fn is_source_over(&self) -> bool {
        matches!(self, BlendMode::SourceOver)
    }

    /// The classic Porter-Duff `(Fa, Fb)` coefficient pair for this op,
    /// given source alpha `sa` and destination alpha `da`.
    fn factors(&self, sa: f32, da: f32) -> (f32, f32) {
        match self {
            BlendMode::SourceOver => (1.0, 1.0 - sa),
            BlendMode::DestinationOver => (1.0 - da, 1.0),
            BlendMode::SourceIn => (da, 0.0),
            BlendMode::DestinationIn => (0.0, sa),
            BlendMode::SourceOut => (1.0 - da, 0.0),
            BlendMode::DestinationOut => (0.0, 1.0 - sa),
            BlendMode::SourceAtop => (da, 1.0 - sa),
            BlendMode::DestinationAtop => (1.0 - da, sa),
            BlendMode::Xor => (1.0 - da, 1.0 - sa),
            BlendMode::Copy => (1.0, 0.0),
            BlendMode::Lighter => (1.0, 1.0),
        }
    }

    /// Composites non-premultiplied `src` (already scaled by `globalAlpha`
    /// and any paint-level coverage) over non-premultiplied `dst`, in
    /// premultiplied space, returning a non-premultiplied result.
    pub fn composite(&self, src: [f32; 4], dst: [f32; 4]) -> [f32; 4] {
        let sa = src[3];
        let da = dst[3];
        let (fa, fb) = self.factors(sa, da);

        let s_premul = [src[0] * sa, src[1] * sa, src[2] * sa];
        let d_premul = [dst[0] * da, dst[1] * da, dst[2] * da];

        let out_a = (sa * fa + da * fb).clamp(0.0, 1.0);
        let out_premul = [
            s_premul[0] * fa + d_premul[0] * fb,
            s_premul[1] * fa + d_premul[1] * fb,
            s_premul[2] * fa + d_premul[2] * fb,
        ];

        if out_a > 0.0 {
            [
                (out_premul[0] / out_a).clamp(0.0, 1.0),
                (out_premul[1] / out_a).clamp(0.0, 1.0),
                (out_premul[2] / out_a).clamp(0.0, 1.0),
                out_a,
            ]
        } else {
            [0.0, 0.0, 0.0, 0.0]
        }
    }
}
