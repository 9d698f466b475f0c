use super::decode::{Cond, Indirect, Loc8, Reg16, StackPair};
use super::{Bus, Cpu, Flag};

impl Cpu {
    /// Read an 8-bit register or `(HL)`.
    #[inline]
    pub(super) fn read_loc<B: Bus>(&mut self, bus: &mut B, loc: Loc8) -> u8 {
        match loc {
            Loc8::B => self.regs.b,
            Loc8::C => self.regs.c,
            Loc8::D => self.regs.d,
            Loc8::E => self.regs.e,
            Loc8::H => self.regs.h,
            Loc8::L => self.regs.l,
            Loc8::IndHl => bus.read8(self.regs.hl()),
            Loc8::A => self.regs.a,
        }
    }

    /// Write an 8-bit register or `(HL)`.
    #[inline]
    pub(super) fn write_loc<B: Bus>(&mut self, bus: &mut B, loc: Loc8, value: u8) {
        match loc {
            Loc8::B => self.regs.b = value,
            Loc8::C => self.regs.c = value,
            Loc8::D => self.regs.d = value,
            Loc8::E => self.regs.e = value,
            Loc8::H => self.regs.h = value,
            Loc8::L => self.regs.l = value,
            Loc8::IndHl => bus.write8(self.regs.hl(), value),
            Loc8::A => self.regs.a = value,
        }
    }

    #[inline]
    pub(super) fn read_reg16(&self, rr: Reg16) -> u16 {
        match rr {
            Reg16::Bc => self.regs.bc(),
            Reg16::De => self.regs.de(),
            Reg16::Hl => self.regs.hl(),
            Reg16::Sp => self.regs.sp,
        }
    }

    #[inline]
    pub(super) fn write_reg16(&mut self, rr: Reg16, value: u16) {
        match rr {
            Reg16::Bc => self.regs.set_bc(value),
            Reg16::De => self.regs.set_de(value),
            Reg16::Hl => self.regs.set_hl(value),
            Reg16::Sp => self.regs.sp = value,
        }
    }

    #[inline]
    pub(super) fn read_stack_pair(&self, pair: StackPair) -> u16 {
        match pair {
            StackPair::Bc => self.regs.bc(),
            StackPair::De => self.regs.de(),
            StackPair::Hl => self.regs.hl(),
            StackPair::Af => self.regs.af(),
        }
    }

    #[inline]
    pub(super) fn write_stack_pair(&mut self, pair: StackPair, value: u16) {
        match pair {
            StackPair::Bc => self.regs.set_bc(value),
            StackPair::De => self.regs.set_de(value),
            StackPair::Hl => self.regs.set_hl(value),
            StackPair::Af => self.regs.set_af(value),
        }
    }

    /// Resolve a `(BC)`/`(DE)`/`(HL+)`/`(HL-)` pointer, applying the HL
    /// post-increment or post-decrement.
    #[inline]
    pub(super) fn indirect_addr(&mut self, ind: Indirect) -> u16 {
        match ind {
            Indirect::Bc => self.regs.bc(),
            Indirect::De => self.regs.de(),
            Indirect::HlInc => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_add(1));
                hl
            }
            Indirect::HlDec => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_sub(1));
                hl
            }
        }
    }

    #[inline]
    pub(super) fn condition(&self, cond: Cond) -> bool {
        match cond {
            Cond::Nz => !self.regs.get_flag(Flag::Z),
            Cond::Z => self.regs.get_flag(Flag::Z),
            Cond::Nc => !self.regs.get_flag(Flag::C),
            Cond::C => self.regs.get_flag(Flag::C),
        }
    }

    /// Read the byte at PC and advance PC by one.
    #[inline]
    pub fn fetch8<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let value = bus.read8(self.regs.pc);
        if self.halt_bug {
            // HALT bug: the first opcode fetch after the bug does not
            // increment PC. We consume the bug here.
            self.halt_bug = false;
        } else {
            self.regs.pc = self.regs.pc.wrapping_add(1);
        }
        value
    }

    /// Read the little-endian word at PC and advance PC by two.
    #[inline]
    pub fn fetch16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.fetch8(bus);
        let hi = self.fetch8(bus);
        u16::from_le_bytes([lo, hi])
    }

    /// Read the byte at PC as a two's-complement displacement.
    #[inline]
    pub fn fetch_signed<B: Bus>(&mut self, bus: &mut B) -> i8 {
        self.fetch8(bus) as i8
    }

    #[inline]
    pub fn push_u16<B: Bus>(&mut self, bus: &mut B, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        // Stack grows downward. We want memory[SP] = low, memory[SP+1] = high.
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, hi);
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, lo);
    }

    #[inline]
    pub fn pop_u16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let value = bus.read16(self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(2);
        value
    }

    /// PC-relative jump by a signed displacement.
    #[inline]
    pub(super) fn jump_relative(&mut self, offset: i8) {
        self.regs.pc = self.regs.pc.wrapping_add(offset as i16 as u16);
    }
}
