// Copyright 2020 Canvas2D Contributors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The RGBA8 pixel source used by image patterns and `drawImage`.

use crate::color::Color;

/// An immutable RGBA8 image, suitable for sharing across `save`/`restore`
/// frames and pattern paints.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Image {
    /// Builds an image from a `4 · width · height`-byte RGBA8 buffer.
    /// Returns `None` for a zero dimension or a mismatched buffer length.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        if data.len() != width as usize * height as usize * 4 {
            return None;
        }
        Some(Image { width, height, data })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Nearest-neighbor pixel fetch; `None` outside the image bounds.
    #[inline]
    pub fn get_pixel(&self, x: i64, y: i64) -> Option<Color> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some(Color::from_rgba(self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_buffer_length_is_rejected() {
        assert!(Image::from_rgba8(2, 2, vec![0; 10]).is_none());
    }

    #[test]
    fn out_of_bounds_fetch_is_none() {
        let img = Image::from_rgba8(1, 1, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(img.get_pixel(0, 0), Some(Color::from_rgba(1, 2, 3, 4)));
        assert_eq!(img.get_pixel(1, 0), None);
        assert_eq!(img.get_pixel(-1, 0), None);
    }
}
