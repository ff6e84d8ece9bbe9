use image::{ImageBuffer, Rgb, RgbImage};

use super::math::Color;

/// Rendered pixels. Pixel `(i, j)` is column `i` and row `j`, with `(0, 0)` the
/// bottom left corner of the view (normalized coordinates (-1, -1)).
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Image {
    pub fn new(width: u32, height: u32) -> Image {
        Image {
            width,
            height,
            pixels: vec![Color::zero(); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline(always)]
    fn index(&self, i: u32, j: u32) -> usize {
        assert!(i < self.width && j < self.height, "pixel ({i}, {j}) out of bounds");
        j as usize * self.width as usize + i as usize
    }

    /// Stores a color clamped to the displayable [0, 1] range.
    pub fn set_pixel(&mut self, i: u32, j: u32, color: Color) {
        let index = self.index(i, j);
        self.pixels[index] = display_color(color);
    }

    pub fn get_pixel(&self, i: u32, j: u32) -> Color {
        self.pixels[self.index(i, j)]
    }

    /// Mutable rows, bottom row first, each `width` pixels long. Colors written
    /// here must already be in display range.
    pub(crate) fn rows_mut(&mut self) -> std::slice::ChunksMut<'_, Color> {
        let width = (self.width as usize).max(1);
        self.pixels.chunks_mut(width)
    }

    /// 8 bit copy for encoding, top row first.
    pub fn to_rgb8(&self, gamma_correction: bool) -> RgbImage {
        ImageBuffer::from_fn(self.width, self.height, |x, y| {
            let mut color = self.get_pixel(x, self.height - 1 - y);
            if gamma_correction {
                color = color.map(gamma);
            }
            color.into()
        })
    }
}

pub(crate) fn display_color(color: Color) -> Color {
    // NaN is mapped to black
    color.map(|c| if c.is_nan() { 0.0 } else { c.clamp(0.0, 1.0) })
}

fn gamma(value: f64) -> f64 {
    if value > 0.0 {
        value.powf(1.0 / 2.2)
    } else {
        0.0
    }
}

impl From<Color> for Rgb<u8> {
    fn from(value: Color) -> Self {
        let channel = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgb([channel(value.x), channel(value.y), channel(value.z)])
    }
}
