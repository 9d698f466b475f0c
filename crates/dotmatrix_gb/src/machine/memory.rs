use crate::config::MAX_LOAD_WINDOW;
use crate::cpu::Bus;
use crate::error::{GbError, Result};
use crate::io;

use super::MEMORY_SIZE;

const ECHO_START: u16 = 0xE000;
const ECHO_END: u16 = 0xFDFF;
const ECHO_OFFSET: u16 = 0x2000;
const UNUSABLE_START: u16 = 0xFEA0;
const UNUSABLE_END: u16 = 0xFEFE;

/// Flat 64 KiB address space with the DMG's write-side region rules.
///
/// Reads are plain loads everywhere. Writes go through [`Memory::write`],
/// which drops writes to the cartridge window and the unusable block,
/// mirrors echo RAM into work RAM and clears LY.
#[derive(Clone)]
pub struct Memory {
    bytes: Box<[u8]>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memory")
            .field("LCDC", &self.read(io::LCDC))
            .field("STAT", &self.read(io::STAT))
            .field("LY", &self.read(io::LY))
            .field("IF", &self.read(io::IF))
            .field("IE", &self.read(io::IE))
            .finish_non_exhaustive()
    }
}

impl Memory {
    /// Memory at the DMG power-on state.
    pub fn new() -> Self {
        let mut memory = Self {
            bytes: vec![0; MEMORY_SIZE].into_boxed_slice(),
        };
        memory.apply_dmg_initial_io_state();
        memory
    }

    #[inline]
    pub fn read(&self, addr: u16) -> u8 {
        self.bytes[addr as usize]
    }

    /// Store a byte, applying the region rules in order: cartridge window
    /// (dropped), echo RAM (mirrored into 0xC000–0xDDFF), unusable block
    /// (dropped), LY (forced to zero), anything else (plain store).
    pub fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x7FFF => {}
            ECHO_START..=ECHO_END => {
                self.bytes[addr as usize] = value;
                self.bytes[(addr - ECHO_OFFSET) as usize] = value;
            }
            UNUSABLE_START..=UNUSABLE_END => {}
            io::LY => self.bytes[addr as usize] = 0,
            _ => self.bytes[addr as usize] = value,
        }
    }

    /// Little-endian 16-bit load.
    #[inline]
    pub fn read16(&self, addr: u16) -> u16 {
        u16::from_le_bytes([self.read(addr), self.read(addr.wrapping_add(1))])
    }

    /// Little-endian 16-bit store; each byte goes through [`Memory::write`].
    #[inline]
    pub fn write16(&mut self, addr: u16, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.write(addr, lo);
        self.write(addr.wrapping_add(1), hi);
    }

    /// Copy a program image to 0x0000, at most `window` bytes (itself
    /// clamped to the 32 KiB cartridge window). Returns the number of
    /// bytes copied.
    pub fn load_program(&mut self, program: &[u8], window: usize) -> Result<usize> {
        if program.is_empty() {
            return Err(GbError::EmptyProgram);
        }
        let len = program.len().min(window.min(MAX_LOAD_WINDOW));
        self.bytes[..len].copy_from_slice(&program[..len]);
        Ok(len)
    }

    /// Raw store that bypasses the region rules. Hardware-side updates
    /// (LY, STAT, P1) use this; CPU writes never do.
    #[inline]
    pub(crate) fn poke(&mut self, addr: u16, value: u8) {
        self.bytes[addr as usize] = value;
    }

    /// Initialize I/O registers to match the DMG/MGB power-on state left
    /// behind by the boot ROM.
    fn apply_dmg_initial_io_state(&mut self) {
        // Joypad: no group selected.
        self.poke(io::P1, 0xCF);

        // Serial.
        self.poke(0xFF01, 0x00);
        self.poke(0xFF02, 0x7E);

        // Divider / timer.
        self.poke(0xFF04, 0xAB);
        self.poke(0xFF05, 0x00);
        self.poke(0xFF06, 0x00);
        self.poke(0xFF07, 0xF8);

        // The boot ROM leaves a VBlank request pending.
        self.poke(io::IF, 0x01);
        self.poke(io::IE, 0x00);

        // Sound registers (no APU, but the values are visible to software).
        const SOUND: [(u16, u8); 21] = [
            (0xFF10, 0x80),
            (0xFF11, 0xBF),
            (0xFF12, 0xF3),
            (0xFF13, 0xFF),
            (0xFF14, 0xBF),
            (0xFF16, 0x3F),
            (0xFF17, 0x00),
            (0xFF18, 0xFF),
            (0xFF19, 0xBF),
            (0xFF1A, 0x7F),
            (0xFF1B, 0xFF),
            (0xFF1C, 0x9F),
            (0xFF1D, 0xFF),
            (0xFF1E, 0xBF),
            (0xFF20, 0xFF),
            (0xFF21, 0x00),
            (0xFF22, 0x00),
            (0xFF23, 0xBF),
            (0xFF24, 0x77),
            (0xFF25, 0xF3),
            (0xFF26, 0xF1),
        ];
        for (addr, value) in SOUND {
            self.poke(addr, value);
        }

        // LCD.
        self.poke(io::LCDC, 0x91);
        self.poke(io::STAT, 0x85);
        self.poke(io::SCY, 0x00);
        self.poke(io::SCX, 0x00);
        self.poke(io::LY, 0x00);
        self.poke(io::LYC, 0x00);
        self.poke(0xFF46, 0xFF); // DMA
        self.poke(io::BGP, 0xFC);
        // OBP0/OBP1 are officially uninitialized; left at 0.
        self.poke(0xFF4A, 0x00); // WY
        self.poke(0xFF4B, 0x00); // WX
    }
}

impl Bus for Memory {
    fn read8(&mut self, addr: u16) -> u8 {
        self.read(addr)
    }

    fn write8(&mut self, addr: u16, value: u8) {
        self.write(addr, value)
    }
}
