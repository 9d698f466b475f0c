use typed_builder::TypedBuilder;

use crate::machine::Color;
use crate::CYCLES_PER_FRAME;

/// Size of the fixed cartridge window at 0x0000–0x7FFF.
pub const MAX_LOAD_WINDOW: usize = 0x8000;

/// What the dispatcher does with the eleven opcode holes (0xD3, 0xDB, ...).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum UnassignedOpcodePolicy {
    /// Log the opcode and treat it as a zero-cost, zero-effect step.
    #[default]
    Skip,
    /// Abort the step with `GbError::UnassignedOpcode`.
    Fault,
}

/// Construction-time settings for a [`GameBoy`](crate::GameBoy).
#[derive(Clone, Debug, Eq, PartialEq, TypedBuilder)]
pub struct EmulatorConfig {
    /// Budget used by `GameBoy::step_frame`, in machine cycles.
    #[builder(default = CYCLES_PER_FRAME)]
    pub cycles_per_frame: u32,
    /// Number of program bytes copied to 0x0000 on load. Clamped to 0x8000.
    #[builder(default = MAX_LOAD_WINDOW)]
    pub load_window: usize,
    #[builder(default)]
    pub unassigned_opcodes: UnassignedOpcodePolicy,
    /// Log every decoded instruction at trace level.
    #[builder(default = false)]
    pub trace_instructions: bool,
    /// Shades for colour indices 0..=3 after BGP mapping.
    #[builder(default = Color::DMG_SHADES)]
    pub palette: [Color; 4],
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl EmulatorConfig {
    pub(crate) fn effective_load_window(&self) -> usize {
        self.load_window.min(MAX_LOAD_WINDOW)
    }
}
