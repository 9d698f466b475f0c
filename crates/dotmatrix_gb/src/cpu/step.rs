use crate::error::{GbError, Result};
use crate::io;

use super::decode::{self, Operand, OperandMode};
use super::{Bus, Cpu};

impl Cpu {
    /// Execute exactly one instruction and return its cost in machine
    /// cycles.
    ///
    /// Interrupt dispatch is not part of this call; the driver runs
    /// [`Cpu::service_interrupts`] before each step. While halted or stopped
    /// the CPU idles for one machine cycle per call.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> Result<u32> {
        // STOP is exited when a joypad input line (P10–P13) goes low.
        if self.stopped {
            if bus.read8(io::P1) & 0x0F == 0x0F {
                return Ok(1);
            }
            log::debug!("GB CPU: leaving STOP on joypad input");
            self.stopped = false;
        }

        if self.halted {
            return Ok(1);
        }

        let pc = self.regs.pc;
        let opcode = self.fetch8(bus);
        let Some(instr) = decode::primary()[opcode as usize] else {
            log::error!("GB CPU: unimplemented opcode 0x{opcode:02X} at pc=0x{pc:04X}");
            return Err(GbError::UnimplementedOpcode {
                opcode,
                pc,
                extended: false,
            });
        };

        let operand = match instr.operand {
            OperandMode::None => Operand::None,
            OperandMode::Imm8 => Operand::Byte(self.fetch8(bus)),
            OperandMode::Rel8 => Operand::Offset(self.fetch_signed(bus)),
            OperandMode::Imm16 => Operand::Word(self.fetch16(bus)),
        };

        if self.trace_instructions {
            log::trace!(
                "{pc:04X}: {:<14} {:?} af={:04X} bc={:04X} de={:04X} hl={:04X} sp={:04X}",
                instr.op.to_string(),
                operand,
                self.regs.af(),
                self.regs.bc(),
                self.regs.de(),
                self.regs.hl(),
                self.regs.sp,
            );
        }

        let cycles = self.execute(bus, &instr, operand)?;
        self.apply_ime_delay();
        Ok(cycles)
    }
}
