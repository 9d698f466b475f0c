use bitflags::bitflags;

use crate::error::{GbError, Result};
use crate::io;

use super::{Bus, Cpu};

/// Machine cycles charged for an interrupt dispatch.
pub const INTERRUPT_CYCLES: u32 = 5;

bitflags! {
    /// Interrupt sources as laid out in IF (0xFF0F) and IE (0xFFFF).
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct Interrupt: u8 {
        const VBLANK = 0x01;
        const LCD_STAT = 0x02;
        const TIMER = 0x04;
        const SERIAL = 0x08;
        const JOYPAD = 0x10;
    }
}

impl Interrupt {
    /// Service order, highest priority first.
    pub const PRIORITY: [Interrupt; 5] = [
        Interrupt::VBLANK,
        Interrupt::LCD_STAT,
        Interrupt::TIMER,
        Interrupt::SERIAL,
        Interrupt::JOYPAD,
    ];

    /// Service address of the lowest source bit in `self`
    /// (0x40, 0x48, 0x50, 0x58, 0x60).
    pub fn vector(self) -> u16 {
        0x0040 + (self.bits().trailing_zeros() as u16) * 8
    }

    /// Set this source's pending bit in IF.
    pub fn request<B: Bus>(self, bus: &mut B) {
        let pending = bus.read8(io::IF);
        bus.write8(io::IF, pending | self.bits());
    }
}

impl Cpu {
    /// Check for a serviceable interrupt and dispatch at most one.
    ///
    /// Runs before every fetch. Returns the cycles spent: 0 when nothing was
    /// serviced, [`INTERRUPT_CYCLES`] otherwise. A HALTed CPU wakes as soon
    /// as any enabled source is pending, whether or not IME is set. A
    /// STOPped CPU services nothing until a joypad line releases it.
    pub fn service_interrupts<B: Bus>(&mut self, bus: &mut B) -> Result<u32> {
        if self.stopped {
            return Ok(0);
        }

        let pending = bus.read8(io::IF);
        let enabled = bus.read8(io::IE);
        let requested = pending & enabled;

        if self.halted && requested & Interrupt::all().bits() != 0 {
            self.halted = false;
        }

        if !self.ime || pending == 0 || enabled == 0 {
            return Ok(0);
        }

        for source in Interrupt::PRIORITY {
            if requested & source.bits() == 0 {
                continue;
            }

            // A dispatch between HALT and its repeated fetch returns to the
            // HALT byte instead.
            let pc = if self.halt_bug {
                self.halt_bug = false;
                self.regs.pc.wrapping_sub(1)
            } else {
                self.regs.pc
            };
            self.push_u16(bus, pc);
            self.regs.pc = source.vector();
            self.ime = false;

            // Re-read IF: the push may have landed on it when SP was low.
            let pending_now = bus.read8(io::IF);
            bus.write8(io::IF, pending_now & !source.bits());

            log::debug!(
                "GB CPU interrupt: {:?} vector=0x{:04X} pc=0x{:04X} sp=0x{:04X} IF=0x{:02X} IE=0x{:02X}",
                source,
                self.regs.pc,
                pc,
                self.regs.sp,
                pending,
                enabled,
            );
            return Ok(INTERRUPT_CYCLES);
        }

        if requested != 0 {
            log::error!(
                "GB CPU interrupt state invalid: IF=0x{pending:02X} IE=0x{enabled:02X} overlap only outside the five sources"
            );
            return Err(GbError::InvalidInterruptState { pending, enabled });
        }

        Ok(0)
    }

    /// Apply the delayed IME change requested by EI.
    ///
    /// Called once after every executed instruction: the first call (at the
    /// end of EI itself) arms the delay, the second (at the end of the
    /// following instruction) sets IME.
    #[inline]
    pub(super) fn apply_ime_delay(&mut self) {
        if self.ime_enable_delay {
            self.ime = true;
            self.ime_enable_delay = false;
        } else if self.ime_enable_pending {
            self.ime_enable_pending = false;
            self.ime_enable_delay = true;
        }
    }
}
