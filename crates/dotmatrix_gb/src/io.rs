//! Addresses of the memory-mapped hardware registers the core models.

/// Joypad select/state (P1).
pub const P1: u16 = 0xFF00;
/// Interrupt flags: pending sources.
pub const IF: u16 = 0xFF0F;
/// LCD control.
pub const LCDC: u16 = 0xFF40;
/// LCD status.
pub const STAT: u16 = 0xFF41;
pub const SCY: u16 = 0xFF42;
pub const SCX: u16 = 0xFF43;
/// Current scanline. Any CPU write resets it to zero.
pub const LY: u16 = 0xFF44;
/// Scanline compare.
pub const LYC: u16 = 0xFF45;
/// Background palette.
pub const BGP: u16 = 0xFF47;
/// Interrupt enable: enabled sources.
pub const IE: u16 = 0xFFFF;
