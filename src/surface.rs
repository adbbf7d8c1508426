// Copyright 2020 Canvas2D Contributors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The pixel buffer a [`crate::Context`] draws into.

use crate::color::Color;

/// An RGBA8, non-premultiplied pixel buffer.
///
/// Byte order is `R, G, B, A` per pixel, row-major, stride `= 4 · width`.
/// The same storage is also readable as a packed 32-bit little-endian
/// `0xAABBGGRR` view via [`Surface::pixels`]/[`Surface::pixels_mut`] — both
/// views always agree because they alias the same bytes.
#[derive(Clone, Debug)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    /// Allocates a new, fully transparent surface. Returns `None` for a
    /// zero dimension (the one allocation failure this type can report
    /// without panicking).
    pub fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let len = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        Some(Surface { width, height, data: vec![0u8; len] })
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
    pub fn stride(&self) -> usize {
        self.width as usize * 4
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// The byte buffer reinterpreted as one packed little-endian
    /// `0xAABBGGRR` value per pixel.
    pub fn pixels(&self) -> &[u32] {
        bytemuck::cast_slice(&self.data)
    }

    pub fn pixels_mut(&mut self) -> &mut [u32] {
        bytemuck::cast_slice_mut(&mut self.data)
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.stride()) + x as usize * 4;
        Some(Color::from_rgba(self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]))
    }

    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x >= self.width || y >= self.height {
            return;
        }
        let stride = self.stride();
        let i = (y as usize * stride) + x as usize * 4;
        self.data[i] = color.r;
        self.data[i + 1] = color.g;
        self.data[i + 2] = color.b;
        self.data[i + 3] = color.a;
    }

    /// Writes transparent black into every pixel, bypassing compositing
    /// entirely (used by the fully-unclipped fast path of `clearRect`).
    pub fn clear(&mut self) {
        self.data.iter_mut().for_each(|b| *b = 0);
    }

    #[cfg(feature = "png-format")]
    pub fn decode_png(data: &[u8]) -> Result<Self, png::DecodingError> {
        let decoder = png::Decoder::new(data);
        let mut reader = decoder.read_info()?;
        let mut buf = vec![0u8; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf)?;
        let mut surface = Surface::new(info.width, info.height).ok_or_else(|| {
            png::DecodingError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "zero-sized image",
            ))
        })?;
        match info.color_type {
            png::ColorType::Rgba => {
                let len = surface.data.len();
                surface.data.copy_from_slice(&buf[..len])
            }
            png::ColorType::Rgb => {
                for (px, rgb) in surface.data.chunks_exact_mut(4).zip(buf.chunks_exact(3)) {
                    px[0] = rgb[0];
                    px[1] = rgb[1];
                    px[2] = rgb[2];
                    px[3] = 255;
                }
            }
            other => {
                return Err(png::DecodingError::IoError(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("unsupported color type {:?}", other),
                )))
            }
        }
        Ok(surface)
    }

    #[cfg(feature = "png-format")]
    pub fn encode_png(&self) -> Result<Vec<u8>, png::EncodingError> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(&self.data)?;
        }
        Ok(out)
    }
}
