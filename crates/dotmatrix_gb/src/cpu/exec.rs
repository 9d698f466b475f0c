use crate::config::UnassignedOpcodePolicy;
use crate::error::{GbError, Result};

use super::alu;
use super::decode::{AluOp, Instruction, Op, Operand};
use super::{Bus, Cpu};

impl Cpu {
    /// Execute one decoded primary instruction.
    ///
    /// PC already points past the opcode and its immediate bytes. Returns
    /// the machine cycles charged, picked from the descriptor depending on
    /// whether a conditional branch was taken.
    pub(super) fn execute<B: Bus>(
        &mut self,
        bus: &mut B,
        instr: &Instruction,
        operand: Operand,
    ) -> Result<u32> {
        let taken = match instr.op {
            Op::Nop => false,
            Op::Stop => {
                log::debug!("GB CPU: STOP at pc=0x{:04X}", self.regs.pc.wrapping_sub(2));
                self.stopped = true;
                false
            }
            Op::Halt => {
                self.halt(bus);
                false
            }
            Op::Di => {
                self.ime = false;
                self.ime_enable_pending = false;
                self.ime_enable_delay = false;
                false
            }
            Op::Ei => {
                if !self.ime {
                    self.ime_enable_pending = true;
                }
                false
            }

            Op::LdRrImm(rr) => {
                self.write_reg16(rr, operand.word());
                false
            }
            Op::LdIndA(ind) => {
                let addr = self.indirect_addr(ind);
                bus.write8(addr, self.regs.a);
                false
            }
            Op::LdAInd(ind) => {
                let addr = self.indirect_addr(ind);
                self.regs.a = bus.read8(addr);
                false
            }
            Op::LdImm16Sp => {
                bus.write16(operand.word(), self.regs.sp);
                false
            }
            Op::Inc16(rr) => {
                let value = self.read_reg16(rr).wrapping_add(1);
                self.write_reg16(rr, value);
                false
            }
            Op::Dec16(rr) => {
                let value = self.read_reg16(rr).wrapping_sub(1);
                self.write_reg16(rr, value);
                false
            }
            Op::AddHl(rr) => {
                let value = self.read_reg16(rr);
                alu::add_hl(&mut self.regs, value);
                false
            }
            Op::Inc8(loc) => {
                let value = self.read_loc(bus, loc);
                let result = alu::inc(&mut self.regs, value);
                self.write_loc(bus, loc, result);
                false
            }
            Op::Dec8(loc) => {
                let value = self.read_loc(bus, loc);
                let result = alu::dec(&mut self.regs, value);
                self.write_loc(bus, loc, result);
                false
            }
            Op::LdImm8(loc) => {
                self.write_loc(bus, loc, operand.byte());
                false
            }

            Op::Rlca => {
                alu::rlca(&mut self.regs);
                false
            }
            Op::Rrca => {
                alu::rrca(&mut self.regs);
                false
            }
            Op::Rla => {
                alu::rla(&mut self.regs);
                false
            }
            Op::Rra => {
                alu::rra(&mut self.regs);
                false
            }
            Op::Daa => {
                alu::daa(&mut self.regs);
                false
            }
            Op::Cpl => {
                alu::cpl(&mut self.regs);
                false
            }
            Op::Scf => {
                alu::scf(&mut self.regs);
                false
            }
            Op::Ccf => {
                alu::ccf(&mut self.regs);
                false
            }

            Op::Ld(dst, src) => {
                let value = self.read_loc(bus, src);
                self.write_loc(bus, dst, value);
                false
            }
            Op::Alu(op, src) => {
                let value = self.read_loc(bus, src);
                self.alu8(op, value);
                false
            }
            Op::AluImm(op) => {
                self.alu8(op, operand.byte());
                false
            }

            Op::Jr(cond) => {
                let taken = cond.map_or(true, |cond| self.condition(cond));
                if taken {
                    self.jump_relative(operand.offset());
                }
                taken
            }
            Op::Jp(cond) => {
                let taken = cond.map_or(true, |cond| self.condition(cond));
                if taken {
                    self.regs.pc = operand.word();
                }
                taken
            }
            Op::JpHl => {
                self.regs.pc = self.regs.hl();
                false
            }
            Op::Call(cond) => {
                let taken = cond.map_or(true, |cond| self.condition(cond));
                if taken {
                    let ret = self.regs.pc;
                    self.push_u16(bus, ret);
                    self.regs.pc = operand.word();
                }
                taken
            }
            Op::Ret(cond) => {
                let taken = cond.map_or(true, |cond| self.condition(cond));
                if taken {
                    self.regs.pc = self.pop_u16(bus);
                }
                taken
            }
            Op::Reti => {
                self.regs.pc = self.pop_u16(bus);
                self.ime = true;
                false
            }
            Op::Rst(vector) => {
                let ret = self.regs.pc;
                self.push_u16(bus, ret);
                self.regs.pc = vector as u16;
                false
            }

            Op::Pop(pair) => {
                let value = self.pop_u16(bus);
                self.write_stack_pair(pair, value);
                false
            }
            Op::Push(pair) => {
                let value = self.read_stack_pair(pair);
                self.push_u16(bus, value);
                false
            }

            Op::LdhImmA => {
                bus.write8(0xFF00 | operand.byte() as u16, self.regs.a);
                false
            }
            Op::LdhAImm => {
                self.regs.a = bus.read8(0xFF00 | operand.byte() as u16);
                false
            }
            Op::LdhCA => {
                bus.write8(0xFF00 | self.regs.c as u16, self.regs.a);
                false
            }
            Op::LdhAC => {
                self.regs.a = bus.read8(0xFF00 | self.regs.c as u16);
                false
            }
            Op::LdImm16A => {
                bus.write8(operand.word(), self.regs.a);
                false
            }
            Op::LdAImm16 => {
                self.regs.a = bus.read8(operand.word());
                false
            }

            Op::AddSpImm => {
                let sp = self.regs.sp;
                self.regs.sp = alu::add_sp_offset(&mut self.regs, sp, operand.byte());
                false
            }
            Op::LdHlSpImm => {
                let sp = self.regs.sp;
                let value = alu::add_sp_offset(&mut self.regs, sp, operand.byte());
                self.regs.set_hl(value);
                false
            }
            Op::LdSpHl => {
                self.regs.sp = self.regs.hl();
                false
            }

            Op::Prefix => {
                let extra = self.execute_extended(bus)?;
                return Ok(instr.cycles as u32 + extra);
            }
            Op::Unassigned => return self.unassigned(instr.opcode),
        };

        let cycles = if taken {
            instr.taken_cycles
        } else {
            instr.cycles
        };
        Ok(cycles as u32)
    }

    fn alu8(&mut self, op: AluOp, value: u8) {
        let regs = &mut self.regs;
        match op {
            AluOp::Add => alu::add(regs, value),
            AluOp::Adc => alu::adc(regs, value),
            AluOp::Sub => alu::sub(regs, value),
            AluOp::Sbc => alu::sbc(regs, value),
            AluOp::And => alu::and(regs, value),
            AluOp::Xor => alu::xor(regs, value),
            AluOp::Or => alu::or(regs, value),
            AluOp::Cp => alu::cp(regs, value),
        }
    }

    /// HALT. With IME clear and an interrupt already pending the CPU does
    /// not halt; instead the next opcode byte is fetched twice.
    fn halt<B: Bus>(&mut self, bus: &mut B) {
        let pending = bus.read8(crate::io::IF) & bus.read8(crate::io::IE) & 0x1F;
        if !self.ime && pending != 0 {
            self.halt_bug = true;
        } else {
            self.halted = true;
        }
    }

    fn unassigned(&mut self, opcode: u8) -> Result<u32> {
        let pc = self.regs.pc.wrapping_sub(1);
        match self.unassigned_opcodes {
            UnassignedOpcodePolicy::Skip => {
                log::warn!("GB CPU: unassigned opcode 0x{opcode:02X} at pc=0x{pc:04X} skipped");
                Ok(0)
            }
            UnassignedOpcodePolicy::Fault => {
                log::error!("GB CPU: unassigned opcode 0x{opcode:02X} at pc=0x{pc:04X}");
                Err(GbError::UnassignedOpcode { opcode, pc })
            }
        }
    }
}
