use bitflags::bitflags;

use crate::cpu::Interrupt;
use crate::io;

use super::Memory;

/// Machine cycles spent on one scanline.
pub const CYCLES_PER_LINE: i64 = 114;
/// First line of vertical blank.
pub const VBLANK_LINE: u8 = 144;
/// Last line before LY wraps to 0.
pub const LAST_LINE: u8 = 153;

const STAT_MODE_MASK: u8 = 0x03;
const STAT_MODE_HBLANK: u8 = 0x00;
const STAT_MODE_VBLANK: u8 = 0x01;
const STAT_COINCIDENCE: u8 = 0x04;
const STAT_COINCIDENCE_IRQ: u8 = 0x40;

bitflags! {
    /// LCD control register (LCDC, 0xFF40).
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct LcdControl: u8 {
        const BG_ENABLE = 0x01;
        const OBJ_ENABLE = 0x02;
        const OBJ_SIZE = 0x04;
        /// Background tile map at 0x9C00 instead of 0x9800.
        const BG_TILE_MAP = 0x08;
        /// Unsigned tile data at 0x8000 instead of signed at 0x9000.
        const TILE_DATA = 0x10;
        const WINDOW_ENABLE = 0x20;
        const WINDOW_TILE_MAP = 0x40;
        const LCD_ENABLE = 0x80;
    }
}

impl LcdControl {
    #[inline]
    pub fn from_memory(memory: &Memory) -> Self {
        Self::from_bits_retain(memory.read(io::LCDC))
    }
}

/// Display timing: turns retired cycles into LY advances.
///
/// Keeps a countdown to the next line. Each line advance adds a full line's
/// worth of cycles back to it, so overshoot from the instruction that
/// crossed the boundary is charged to the next line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScanlineTimer {
    countdown: i64,
}

impl Default for ScanlineTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanlineTimer {
    pub fn new() -> Self {
        Self {
            countdown: CYCLES_PER_LINE,
        }
    }

    /// Cycles left before the next line advance.
    #[inline]
    pub fn countdown(&self) -> i64 {
        self.countdown
    }

    /// Consume `cycles` and advance LY by at most one line.
    ///
    /// Does nothing while the LCD is off. Returns the line that just
    /// finished when LY moved, so the caller can hand it to a renderer.
    pub fn advance(&mut self, memory: &mut Memory, cycles: u32) -> Option<u8> {
        if !LcdControl::from_memory(memory).contains(LcdControl::LCD_ENABLE) {
            return None;
        }

        self.countdown -= i64::from(cycles);
        if self.countdown > 0 {
            return None;
        }
        self.countdown += CYCLES_PER_LINE;

        let finished = memory.read(io::LY);
        let line = if finished >= LAST_LINE { 0 } else { finished + 1 };
        memory.poke(io::LY, line);

        if line == VBLANK_LINE {
            log::debug!("GB LCD: entering vblank");
            Interrupt::VBLANK.request(memory);
        }
        Self::update_stat(memory, line);

        Some(finished)
    }

    /// Refresh STAT's mode and coincidence bits for `line`, requesting the
    /// STAT interrupt on a rising LY=LYC match when it is enabled.
    fn update_stat(memory: &mut Memory, line: u8) {
        let stat = memory.read(io::STAT);
        let mode = if line >= VBLANK_LINE {
            STAT_MODE_VBLANK
        } else {
            STAT_MODE_HBLANK
        };
        let coincidence = line == memory.read(io::LYC);

        let mut next = (stat & !(STAT_MODE_MASK | STAT_COINCIDENCE)) | mode;
        if coincidence {
            next |= STAT_COINCIDENCE;
        }
        memory.poke(io::STAT, next);

        let rising = coincidence && stat & STAT_COINCIDENCE == 0;
        if rising && stat & STAT_COINCIDENCE_IRQ != 0 {
            Interrupt::LCD_STAT.request(memory);
        }
    }
}
