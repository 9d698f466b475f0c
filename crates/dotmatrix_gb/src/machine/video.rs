use crate::io;
use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

use super::{LcdControl, Memory};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new_rgb(0, 0, 0);
    pub const WHITE: Color = Color::new_rgb(255, 255, 255);

    /// DMG-style grayscale for palette indices 0..=3 (0=white, 3=black).
    pub const DMG_SHADES: [Color; 4] = [
        Color::WHITE,
        Color::new_rgb(0xAA, 0xAA, 0xAA),
        Color::new_rgb(0x55, 0x55, 0x55),
        Color::BLACK,
    ];

    #[inline]
    pub const fn new_rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b }
    }

    #[inline]
    pub const fn rgb(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

/// RGB24 raster of the visible screen, row-major.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FrameBuffer {
    pixels: Vec<u8>,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub const WIDTH: usize = SCREEN_WIDTH;
    pub const HEIGHT: usize = SCREEN_HEIGHT;
    pub const BYTES_PER_PIXEL: usize = 3;

    /// A blank (white) frame.
    pub fn new() -> Self {
        let mut frame = Self {
            pixels: vec![0; Self::WIDTH * Self::HEIGHT * Self::BYTES_PER_PIXEL],
        };
        frame.fill(Color::WHITE);
        frame
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Pixel at `(x, y)`, or `None` outside the screen.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        let idx = Self::offset(x, y)?;
        Some(Color::new_rgb(
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
        ))
    }

    /// Set a pixel; coordinates outside the screen are ignored.
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        if let Some(idx) = Self::offset(x, y) {
            let (r, g, b) = color.rgb();
            self.pixels[idx..idx + Self::BYTES_PER_PIXEL].copy_from_slice(&[r, g, b]);
        }
    }

    pub fn fill(&mut self, color: Color) {
        for chunk in self.pixels.chunks_exact_mut(Self::BYTES_PER_PIXEL) {
            let (r, g, b) = color.rgb();
            chunk.copy_from_slice(&[r, g, b]);
        }
    }

    #[inline]
    fn offset(x: usize, y: usize) -> Option<usize> {
        (x < Self::WIDTH && y < Self::HEIGHT).then(|| (y * Self::WIDTH + x) * Self::BYTES_PER_PIXEL)
    }
}

/// Draws one finished visible line into the frame.
///
/// Called by the driver whenever the scanline timer retires a line below
/// 144. Implementations only read memory.
pub trait LineRenderer {
    fn render_line(&mut self, memory: &Memory, line: u8, frame: &mut FrameBuffer);
}

/// Background-only renderer.
///
/// Honours SCX/SCY, BGP and the LCDC tile map and tile data selects. The
/// window and sprites are not drawn.
#[derive(Clone, Debug)]
pub struct BackgroundRenderer {
    palette: [Color; 4],
}

impl Default for BackgroundRenderer {
    fn default() -> Self {
        Self::new(Color::DMG_SHADES)
    }
}

impl BackgroundRenderer {
    pub fn new(palette: [Color; 4]) -> Self {
        Self { palette }
    }
}

impl LineRenderer for BackgroundRenderer {
    fn render_line(&mut self, memory: &Memory, line: u8, frame: &mut FrameBuffer) {
        let y = line as usize;
        if y >= FrameBuffer::HEIGHT {
            return;
        }

        let lcdc = LcdControl::from_memory(memory);
        // BG disabled: the line is blank.
        if !lcdc.contains(LcdControl::BG_ENABLE) {
            for x in 0..FrameBuffer::WIDTH {
                frame.set_pixel(x, y, self.palette[0]);
            }
            return;
        }

        let scy = memory.read(io::SCY);
        let scx = memory.read(io::SCX);
        let bgp = memory.read(io::BGP);

        let bg_tile_map_base: u16 = if lcdc.contains(LcdControl::BG_TILE_MAP) {
            0x9C00
        } else {
            0x9800
        };
        let tile_data_unsigned = lcdc.contains(LcdControl::TILE_DATA);

        // Scroll-adjusted row in BG space.
        let bg_y = line.wrapping_add(scy);
        let tile_y = (bg_y / 8) as u16;
        let fine_y = (bg_y & 7) as u16;

        for x in 0..FrameBuffer::WIDTH {
            let bg_x = (x as u8).wrapping_add(scx);
            let tile_x = (bg_x / 8) as u16;
            let tile_index = memory.read(bg_tile_map_base + tile_y * 32 + tile_x);

            let tile_base: u16 = if tile_data_unsigned {
                // 0x8000-based, unsigned tile index.
                0x8000 + (tile_index as u16) * 16
            } else {
                // 0x8800-based, signed tile index (0x9000 + signed*16).
                (0x9000i32 + (tile_index as i8 as i32) * 16) as u16
            };

            // Each row is 2 bytes: low bits then high bits.
            let row_addr = tile_base + fine_y * 2;
            let lo = memory.read(row_addr);
            let hi = memory.read(row_addr + 1);
            let bit = 7 - (bg_x & 7);
            let color_index = (((hi >> bit) & 0x01) << 1) | ((lo >> bit) & 0x01);

            let shade = (bgp >> (color_index * 2)) & 0x03;
            frame.set_pixel(x, y, self.palette[shade as usize]);
        }
    }
}
