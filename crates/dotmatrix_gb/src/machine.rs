mod cartridge;
mod gameboy;
mod joypad;
mod memory;
mod scanline;
mod video;

pub use cartridge::CartridgeHeader;
pub use gameboy::GameBoy;
pub use joypad::{Button, JoypadInput};
pub use memory::Memory;
pub use scanline::{LcdControl, ScanlineTimer, CYCLES_PER_LINE, LAST_LINE, VBLANK_LINE};
pub use video::{BackgroundRenderer, Color, FrameBuffer, LineRenderer};

/// Total addressable memory for the Game Boy (64 KiB).
///
/// The address space is kept flat; region behaviour lives in
/// [`Memory::write`].
const MEMORY_SIZE: usize = 0x10000;
