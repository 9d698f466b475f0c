pub mod alu;
mod bus;
mod cb;
pub mod decode;
mod exec;
mod helpers;
mod init;
mod interrupts;
mod regs;
mod step;

pub use bus::Bus;
pub use interrupts::Interrupt;
pub use regs::{Flag, Registers};

use crate::config::UnassignedOpcodePolicy;

/// Game Boy CPU core (LR35902).
///
/// Owns the register file and the interrupt/low-power control flags. Memory
/// is borrowed per call through [`Bus`], so a `Cpu` value plus a bus is the
/// whole machine state the dispatcher needs.
#[derive(Clone, Debug)]
pub struct Cpu {
    pub regs: Registers,
    /// Interrupt master enable.
    pub ime: bool,
    pub halted: bool,
    /// STOP low-power state; cleared once a joypad line reads low.
    stopped: bool,
    /// HALT bug: the next opcode fetch does not advance PC.
    halt_bug: bool,
    /// Set by EI. Promoted to `ime_enable_delay` once EI itself retires.
    ime_enable_pending: bool,
    /// Promoted to `ime` once the instruction after EI retires.
    ime_enable_delay: bool,
    pub unassigned_opcodes: UnassignedOpcodePolicy,
    pub trace_instructions: bool,
}

impl Cpu {
    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// True while an EI is waiting for its delay slot to retire.
    #[inline]
    pub fn ime_scheduled(&self) -> bool {
        self.ime_enable_pending || self.ime_enable_delay
    }
}

#[cfg(test)]
mod tests;
