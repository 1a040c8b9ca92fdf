use crate::color::Color;
use crate::error::{PadError, Result};
use crate::geometry::{PixelBlock, Point};
use crate::surface::{DisplaySurface, SurfaceConfig, SurfaceFactory};

use super::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

// ============================================================================
// Utility Functions
// ============================================================================

/// Write ABGR pixel to slice (RGBA8888 little-endian byte order)
#[inline]
fn write_pixel_rgba(dest: &mut [u8], [r, g, b, a]: [u8; 4]) {
    dest[0] = a; // A
    dest[1] = b; // B
    dest[2] = g; // G
    dest[3] = r; // R
}

// ============================================================================
// PixelBuffer
// ============================================================================

/// RGBA8888 pixel buffer for software rendering.
///
/// Serves both as the display surface the grid is painted onto and as the
/// full-resolution shadow layer strokes are smoothed on.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Create a new pixel buffer with default resolution (560x560)
    pub fn new() -> Self {
        Self::with_size(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }

    /// Create a fully transparent pixel buffer with custom resolution.
    ///
    /// Callers go through [`BufferFactory`] for sizes that may not fit in memory.
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0; width as usize * height as usize * 4],
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Check if coordinates are within bounds
    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    /// Calculate byte offset for pixel at (x, y)
    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Clip a block to the buffer
    fn clip(&self, block: PixelBlock) -> PixelBlock {
        PixelBlock {
            x0: block.x0.min(self.width),
            y0: block.y0.min(self.height),
            x1: block.x1.min(self.width),
            y1: block.y1.min(self.height),
        }
    }

    /// Read all 4 channels of a pixel (bounds checked)
    /// Returns (r, g, b, a) or None if out of bounds
    #[inline]
    pub fn get_pixel_rgba(&self, x: i32, y: i32) -> Option<(u8, u8, u8, u8)> {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            Some((
                self.pixels[idx + 3], // R
                self.pixels[idx + 2], // G
                self.pixels[idx + 1], // B
                self.pixels[idx],     // A
            ))
        } else {
            None
        }
    }

    /// Draw a horizontal span with a fixed RGBA value
    pub fn hline_rgba(&mut self, x1: i32, x2: i32, y: i32, rgba: [u8; 4]) {
        if y < 0 || y >= self.height as i32 {
            return;
        }
        let (x1, x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let start = x1.max(0);
        let end = x2.min(self.width as i32 - 1);
        if start > end {
            return;
        }

        // Compute starting index once, then increment by 4 per pixel
        let mut idx = self.pixel_index(start as u32, y as u32);
        let count = (end - start + 1) as usize;
        for _ in 0..count {
            write_pixel_rgba(&mut self.pixels[idx..idx + 4], rgba);
            idx += 4;
        }
    }

    /// Draw an anti-aliased line segment with round caps.
    ///
    /// Coverage is the distance from each pixel center to the segment, faded over the
    /// last pixel of the edge. Overlapping segments keep the stronger coverage, so
    /// joins between consecutive segments stay round without darkening.
    pub fn stroke_segment(&mut self, a: Point, b: Point, width: f32, color: Color) {
        let half = (width * 0.5).max(0.5);
        let reach = half + 1.0;

        let x_min = ((a.x.min(b.x) - reach).floor() as i32).max(0);
        let y_min = ((a.y.min(b.y) - reach).floor() as i32).max(0);
        let x_max = ((a.x.max(b.x) + reach).ceil() as i32).min(self.width as i32 - 1);
        let y_max = ((a.y.max(b.y) + reach).ceil() as i32).min(self.height as i32 - 1);
        if x_min > x_max || y_min > y_max {
            return;
        }

        let [r, g, bl, _] = color.to_rgba8();
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let len_sq = dx * dx + dy * dy;

        for y in y_min..=y_max {
            let py = y as f32 + 0.5;
            for x in x_min..=x_max {
                let px = x as f32 + 0.5;

                // Project pixel center onto the segment
                let t = if len_sq > f32::EPSILON {
                    (((px - a.x) * dx + (py - a.y) * dy) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let nearest = Point::new(a.x + dx * t, a.y + dy * t);
                let dist = nearest.distance_to(&Point::new(px, py));

                let coverage = (half + 0.5 - dist).clamp(0.0, 1.0);
                if coverage <= 0.0 {
                    continue;
                }
                let alpha = (coverage * color.alpha() * 255.0).round() as u8;
                let idx = self.pixel_index(x as u32, y as u32);
                if alpha > self.pixels[idx] {
                    write_pixel_rgba(&mut self.pixels[idx..idx + 4], [r, g, bl, alpha]);
                }
            }
        }
    }

    /// Copy contents from another buffer (must be same size)
    pub fn copy_from(&mut self, src: &PixelBuffer) {
        if self.pixels.len() == src.pixels.len() {
            self.pixels.copy_from_slice(&src.pixels);
        }
    }

    /// Raw bytes for SDL texture upload
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySurface for PixelBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fill_rect(&mut self, block: PixelBlock, color: Color) {
        let block = self.clip(block);
        if block.width() == 0 {
            return;
        }
        let rgba = color.to_rgba8();
        for y in block.y0..block.y1 {
            self.hline_rgba(block.x0 as i32, block.x1 as i32 - 1, y as i32, rgba);
        }
    }

    fn read_block(&self, block: PixelBlock) -> Vec<Color> {
        let block = self.clip(block);
        let mut out = Vec::with_capacity(block.area());
        for y in block.y0..block.y1 {
            for x in block.x0..block.x1 {
                let idx = self.pixel_index(x, y);
                out.push(Color::from_rgba8([
                    self.pixels[idx + 3],
                    self.pixels[idx + 2],
                    self.pixels[idx + 1],
                    self.pixels[idx],
                ]));
            }
        }
        out
    }

    fn write_block(&mut self, block: PixelBlock, pixels: &[Color]) {
        let block = self.clip(block);
        let mut src = pixels.iter();
        for y in block.y0..block.y1 {
            for x in block.x0..block.x1 {
                let Some(color) = src.next() else {
                    return;
                };
                let idx = self.pixel_index(x, y);
                write_pixel_rgba(&mut self.pixels[idx..idx + 4], color.to_rgba8());
            }
        }
    }
}

/// Creates in-memory [`PixelBuffer`] surfaces
#[derive(Debug, Clone, Copy, Default)]
pub struct BufferFactory;

impl SurfaceFactory for BufferFactory {
    type Surface = PixelBuffer;

    fn create(&self, config: &SurfaceConfig) -> Result<PixelBuffer> {
        let bytes = config
            .width
            .checked_mul(config.height)
            .and_then(|n| n.checked_mul(4));
        if matches!(bytes, None | Some(0)) {
            return Err(PadError::SurfaceUnavailable(format!(
                "cannot allocate a {}x{} pixel buffer",
                config.width, config.height
            )));
        }
        Ok(PixelBuffer::with_size(config.width, config.height))
    }
}
