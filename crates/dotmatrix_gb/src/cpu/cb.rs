use crate::error::{GbError, Result};

use super::alu;
use super::decode::{self, ExtOp, ShiftOp};
use super::{Bus, Cpu};

impl Cpu {
    /// Fetch and run a CB-prefixed instruction (bit operations, shifts and
    /// rotates). Returns the cycles beyond the prefix itself.
    pub(super) fn execute_extended<B: Bus>(&mut self, bus: &mut B) -> Result<u32> {
        let pc = self.regs.pc;
        let opcode = self.fetch8(bus);
        let Some(instr) = decode::extended()[opcode as usize] else {
            log::error!("GB CPU: unimplemented opcode 0xCB 0x{opcode:02X} at pc=0x{pc:04X}");
            return Err(GbError::UnimplementedOpcode {
                opcode,
                pc,
                extended: true,
            });
        };

        if self.trace_instructions {
            log::trace!("{pc:04X}: {}", instr.op);
        }

        match instr.op {
            ExtOp::Shift(op, loc) => {
                let value = self.read_loc(bus, loc);
                let regs = &mut self.regs;
                let result = match op {
                    ShiftOp::Rlc => alu::rlc(regs, value),
                    ShiftOp::Rrc => alu::rrc(regs, value),
                    ShiftOp::Rl => alu::rl(regs, value),
                    ShiftOp::Rr => alu::rr(regs, value),
                    ShiftOp::Sla => alu::sla(regs, value),
                    ShiftOp::Sra => alu::sra(regs, value),
                    ShiftOp::Swap => alu::swap(regs, value),
                    ShiftOp::Srl => alu::srl(regs, value),
                };
                self.write_loc(bus, loc, result);
            }
            ExtOp::Bit(bit, loc) => {
                let value = self.read_loc(bus, loc);
                alu::bit(&mut self.regs, bit, value);
            }
            ExtOp::Res(bit, loc) => {
                let value = self.read_loc(bus, loc);
                self.write_loc(bus, loc, value & !(1 << bit));
            }
            ExtOp::Set(bit, loc) => {
                let value = self.read_loc(bus, loc);
                self.write_loc(bus, loc, value | (1 << bit));
            }
        }

        Ok(instr.cycles as u32)
    }
}
