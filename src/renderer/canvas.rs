//! CPU draw surface handed to `draw` hooks

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An 8-bit RGBA color
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Create an opaque color
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create an opaque color from components in `0.0..=1.0`
    #[must_use]
    pub fn from_rgb_f32(r: f32, g: f32, b: f32) -> Self {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::rgb(channel(r), channel(g), channel(b))
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::rgb(r, g, b)
    }
}

/// Byte order expected by the presentation target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOrder {
    Rgba,
    Bgra,
}

/// A pixel buffer that objects draw into during the `draw` phase.
///
/// Coordinates outside the canvas are clipped silently.
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Canvas {
    /// Create a canvas filled with black
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::BLACK; width as usize * height as usize],
        }
    }

    /// Canvas width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Canvas height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Canvas size as `(width, height)`
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Resize the canvas, clearing it to black if the size changes.
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) == self.size() {
            return;
        }
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels
            .resize(width as usize * height as usize, Color::BLACK);
    }

    /// Fill the whole canvas with one color
    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    /// Read a pixel, `None` if out of bounds
    #[must_use]
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.offset(x, y).map(|i| self.pixels[i])
    }

    /// Write a pixel; out-of-bounds writes are ignored
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(i) = self.offset(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Fill an axis-aligned rectangle with its top-left corner at `(x, y)`
    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Color) {
        let (w, h) = (self.width as i32, self.height as i32);
        let x0 = x.clamp(0, w);
        let y0 = y.clamp(0, h);
        let x1 = x.saturating_add(width as i32).clamp(x0, w);
        let y1 = y.saturating_add(height as i32).clamp(y0, h);

        for row in y0..y1 {
            let start = row as usize * self.width as usize;
            self.pixels[start + x0 as usize..start + x1 as usize].fill(color);
        }
    }

    /// Fill a disc centred on `center`
    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        if radius <= 0.0 {
            return;
        }
        let r2 = radius * radius;
        let min_y = (center.y - radius).floor() as i32;
        let max_y = (center.y + radius).ceil() as i32;

        for y in min_y.max(0)..=max_y.min(self.height as i32 - 1) {
            let dy = y as f32 + 0.5 - center.y;
            let span = r2 - dy * dy;
            if span < 0.0 {
                continue;
            }
            let half = span.sqrt();
            let x0 = (center.x - half).round() as i32;
            let x1 = (center.x + half).round() as i32;
            self.fill_rect(x0, y, (x1 - x0).max(0) as u32, 1, color);
        }
    }

    /// All pixels in row-major order
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Copy the top-left `width` x `height` region as tightly packed bytes.
    #[must_use]
    pub fn region_bytes(&self, width: u32, height: u32, order: ChannelOrder) -> Vec<u8> {
        let width = width.min(self.width) as usize;
        let height = height.min(self.height) as usize;
        let mut bytes = Vec::with_capacity(width * height * 4);

        for row in self.pixels.chunks_exact(self.width.max(1) as usize).take(height) {
            let row: &[u8] = bytemuck::cast_slice(&row[..width]);
            match order {
                ChannelOrder::Rgba => bytes.extend_from_slice(row),
                ChannelOrder::Bgra => {
                    for px in row.chunks_exact(4) {
                        bytes.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
                    }
                }
            }
        }

        bytes
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_and_read() {
        let mut canvas = Canvas::new(4, 3);
        canvas.fill(Color::WHITE);
        assert!(canvas.pixels().iter().all(|&c| c == Color::WHITE));
        assert_eq!(canvas.pixel(3, 2), Some(Color::WHITE));
        assert_eq!(canvas.pixel(4, 0), None);
    }

    #[test]
    fn test_set_pixel_clips() {
        let mut canvas = Canvas::new(2, 2);
        canvas.set_pixel(-1, 0, Color::WHITE);
        canvas.set_pixel(5, 5, Color::WHITE);
        canvas.set_pixel(1, 1, Color::WHITE);

        let lit = canvas.pixels().iter().filter(|&&c| c == Color::WHITE).count();
        assert_eq!(lit, 1);
    }

    #[test]
    fn test_fill_rect_clipped() {
        let mut canvas = Canvas::new(4, 4);
        canvas.fill_rect(-2, 2, 4, 10, Color::WHITE);

        assert_eq!(canvas.pixel(0, 2), Some(Color::WHITE));
        assert_eq!(canvas.pixel(1, 3), Some(Color::WHITE));
        assert_eq!(canvas.pixel(2, 2), Some(Color::BLACK));
        assert_eq!(canvas.pixel(0, 1), Some(Color::BLACK));
    }

    #[test]
    fn test_fill_circle_covers_center_only() {
        let mut canvas = Canvas::new(20, 20);
        canvas.fill_circle(Vec2::new(10.0, 10.0), 3.0, Color::WHITE);

        assert_eq!(canvas.pixel(10, 10), Some(Color::WHITE));
        assert_eq!(canvas.pixel(0, 0), Some(Color::BLACK));
        assert_eq!(canvas.pixel(10, 16), Some(Color::BLACK));
    }

    #[test]
    fn test_region_bytes_channel_order() {
        let mut canvas = Canvas::new(2, 2);
        canvas.fill(Color::rgb(1, 2, 3));

        let rgba = canvas.region_bytes(1, 1, ChannelOrder::Rgba);
        assert_eq!(rgba, vec![1, 2, 3, 255]);

        let bgra = canvas.region_bytes(2, 1, ChannelOrder::Bgra);
        assert_eq!(bgra, vec![3, 2, 1, 255, 3, 2, 1, 255]);
    }

    #[test]
    fn test_resize_clears() {
        let mut canvas = Canvas::new(2, 2);
        canvas.fill(Color::WHITE);
        canvas.resize(3, 1);
        assert_eq!(canvas.size(), (3, 1));
        assert_eq!(canvas.pixels().len(), 3);
        assert_eq!(canvas.pixel(0, 0), Some(Color::BLACK));
    }
}
