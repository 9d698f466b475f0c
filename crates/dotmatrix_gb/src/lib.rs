pub mod config;
pub mod cpu;
mod error;
pub mod io;
pub mod machine;

pub use config::{EmulatorConfig, UnassignedOpcodePolicy};
pub use cpu::{Bus, Cpu, Flag, Interrupt, Registers};
pub use error::{GbError, Result};
pub use machine::{
    BackgroundRenderer, Button, CartridgeHeader, Color, FrameBuffer, GameBoy, JoypadInput,
    LcdControl, LineRenderer, Memory, ScanlineTimer,
};

/// Logical screen width in pixels for the Game Boy DMG.
pub const SCREEN_WIDTH: usize = 160;
/// Logical screen height in pixels.
pub const SCREEN_HEIGHT: usize = 144;

/// Machine cycles in one full frame: 154 lines of 114 machine cycles each.
pub const CYCLES_PER_FRAME: u32 = 17_556;
