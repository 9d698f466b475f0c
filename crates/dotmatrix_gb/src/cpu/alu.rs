//! 8-bit and 16-bit arithmetic/logic primitives.
//!
//! Each function reads its operands from the register file (and an explicit
//! value for the second operand), writes the result back where the
//! instruction stores it, and sets the flags the instruction defines. None of
//! them touch memory, so the dispatcher can share them between register and
//! `(HL)` forms.

use super::{Flag, Registers};

/// `ADD A,v`.
pub fn add(regs: &mut Registers, value: u8) {
    let a = regs.a;
    let (result, carry) = a.overflowing_add(value);
    let half = (a & 0x0F) + (value & 0x0F) > 0x0F;
    regs.a = result;
    regs.set_flags(result == 0, false, half, carry);
}

/// `ADC A,v`.
///
/// The carry flag is folded into the operand first (wrapping) and the sum
/// is then handed to [`add`], so H and C describe `A + (v + carry)`.
pub fn adc(regs: &mut Registers, value: u8) {
    let folded = value.wrapping_add(regs.flag_bit(Flag::C));
    add(regs, folded);
}

/// `SUB A,v`.
pub fn sub(regs: &mut Registers, value: u8) {
    let a = regs.a;
    regs.a = subtract(regs, a, value);
}

/// `SBC A,v`, folding the carry into the subtrahend like [`adc`].
pub fn sbc(regs: &mut Registers, value: u8) {
    let folded = value.wrapping_add(regs.flag_bit(Flag::C));
    sub(regs, folded);
}

/// `CP v`: flags of `A - v`, A itself untouched.
pub fn cp(regs: &mut Registers, value: u8) {
    let a = regs.a;
    subtract(regs, a, value);
}

fn subtract(regs: &mut Registers, a: u8, value: u8) -> u8 {
    let result = a.wrapping_sub(value);
    let half = (value & 0x0F) > (a & 0x0F);
    let borrow = value > a;
    regs.set_flags(result == 0, true, half, borrow);
    result
}

pub fn and(regs: &mut Registers, value: u8) {
    let result = regs.a & value;
    regs.a = result;
    regs.set_flags(result == 0, false, true, false);
}

pub fn or(regs: &mut Registers, value: u8) {
    let result = regs.a | value;
    regs.a = result;
    regs.set_flags(result == 0, false, false, false);
}

pub fn xor(regs: &mut Registers, value: u8) {
    let result = regs.a ^ value;
    regs.a = result;
    regs.set_flags(result == 0, false, false, false);
}

/// 8-bit increment used by `INC r` and `INC (HL)`. C is preserved.
pub fn inc(regs: &mut Registers, value: u8) -> u8 {
    let result = value.wrapping_add(1);
    regs.set_flag(Flag::Z, result == 0);
    regs.set_flag(Flag::N, false);
    regs.set_flag(Flag::H, (value & 0x0F) == 0x0F);
    result
}

/// 8-bit decrement used by `DEC r` and `DEC (HL)`. C is preserved.
pub fn dec(regs: &mut Registers, value: u8) -> u8 {
    let result = value.wrapping_sub(1);
    regs.set_flag(Flag::Z, result == 0);
    regs.set_flag(Flag::N, true);
    regs.set_flag(Flag::H, (value & 0x0F) == 0);
    result
}

/// Rotate left, bit 7 into both C and bit 0.
pub fn rlc(regs: &mut Registers, value: u8) -> u8 {
    let result = value.rotate_left(1);
    regs.set_flags(result == 0, false, false, value & 0x80 != 0);
    result
}

/// Rotate left through carry.
pub fn rl(regs: &mut Registers, value: u8) -> u8 {
    let result = (value << 1) | regs.flag_bit(Flag::C);
    regs.set_flags(result == 0, false, false, value & 0x80 != 0);
    result
}

/// Rotate right, bit 0 into both C and bit 7.
pub fn rrc(regs: &mut Registers, value: u8) -> u8 {
    let result = value.rotate_right(1);
    regs.set_flags(result == 0, false, false, value & 0x01 != 0);
    result
}

/// Rotate right through carry.
pub fn rr(regs: &mut Registers, value: u8) -> u8 {
    let result = (value >> 1) | (regs.flag_bit(Flag::C) << 7);
    regs.set_flags(result == 0, false, false, value & 0x01 != 0);
    result
}

pub fn sla(regs: &mut Registers, value: u8) -> u8 {
    let result = value << 1;
    regs.set_flags(result == 0, false, false, value & 0x80 != 0);
    result
}

/// Arithmetic shift right; bit 7 is kept.
pub fn sra(regs: &mut Registers, value: u8) -> u8 {
    let result = (value >> 1) | (value & 0x80);
    regs.set_flags(result == 0, false, false, value & 0x01 != 0);
    result
}

pub fn srl(regs: &mut Registers, value: u8) -> u8 {
    let result = value >> 1;
    regs.set_flags(result == 0, false, false, value & 0x01 != 0);
    result
}

pub fn swap(regs: &mut Registers, value: u8) -> u8 {
    let result = value.rotate_left(4);
    regs.set_flags(result == 0, false, false, false);
    result
}

/// `BIT n,v`: Z reflects the complement of the tested bit, C is preserved.
pub fn bit(regs: &mut Registers, index: u8, value: u8) {
    regs.set_flag(Flag::Z, value & (1 << index) == 0);
    regs.set_flag(Flag::N, false);
    regs.set_flag(Flag::H, true);
}

// Accumulator rotates (RLCA/RRCA/RLA/RRA) always clear Z, unlike their
// CB-prefixed counterparts.

pub fn rlca(regs: &mut Registers) {
    let a = regs.a;
    regs.a = rlc(regs, a);
    regs.set_flag(Flag::Z, false);
}

pub fn rrca(regs: &mut Registers) {
    let a = regs.a;
    regs.a = rrc(regs, a);
    regs.set_flag(Flag::Z, false);
}

pub fn rla(regs: &mut Registers) {
    let a = regs.a;
    regs.a = rl(regs, a);
    regs.set_flag(Flag::Z, false);
}

pub fn rra(regs: &mut Registers) {
    let a = regs.a;
    regs.a = rr(regs, a);
    regs.set_flag(Flag::Z, false);
}

/// Decimal adjust accumulator after BCD addition/subtraction.
///
/// - Uses C, H, N, and A to compute a correction value.
/// - Updates A, Z, H, C; leaves N unchanged.
pub fn daa(regs: &mut Registers) {
    let mut a = regs.a;
    let mut adjust: u8 = if regs.get_flag(Flag::C) { 0x60 } else { 0x00 };
    if regs.get_flag(Flag::H) {
        adjust |= 0x06;
    }

    if !regs.get_flag(Flag::N) {
        if (a & 0x0F) > 0x09 {
            adjust |= 0x06;
        }
        if a > 0x99 {
            adjust |= 0x60;
        }
        a = a.wrapping_add(adjust);
    } else {
        a = a.wrapping_sub(adjust);
    }

    regs.set_flag(Flag::C, adjust >= 0x60);
    regs.set_flag(Flag::H, false);
    regs.set_flag(Flag::Z, a == 0);
    regs.a = a;
}

pub fn cpl(regs: &mut Registers) {
    regs.a = !regs.a;
    regs.set_flag(Flag::N, true);
    regs.set_flag(Flag::H, true);
}

pub fn scf(regs: &mut Registers) {
    regs.set_flag(Flag::N, false);
    regs.set_flag(Flag::H, false);
    regs.set_flag(Flag::C, true);
}

pub fn ccf(regs: &mut Registers) {
    let carry = regs.flag_bit(Flag::C);
    regs.set_flag(Flag::N, false);
    regs.set_flag(Flag::H, false);
    regs.set_flag_bit(Flag::C, carry ^ 1);
}

/// `ADD HL,rr`.
///
/// Z is unaffected; N is cleared; H is the carry out of bit 11 and C the
/// carry out of bit 15.
pub fn add_hl(regs: &mut Registers, value: u16) {
    let hl = regs.hl();
    let (result, carry) = hl.overflowing_add(value);

    regs.set_flag(Flag::N, false);
    regs.set_flag(Flag::H, (hl & 0x0FFF) + (value & 0x0FFF) > 0x0FFF);
    regs.set_flag(Flag::C, carry);

    regs.set_hl(result);
}

/// Signed 8-bit offset added to a 16-bit base, for `ADD SP,e8` and
/// `LD HL,SP+e8`.
///
/// Z and N are cleared; H and C come from the unsigned low-byte addition.
pub fn add_sp_offset(regs: &mut Registers, base: u16, offset: u8) -> u16 {
    let signed = offset as i8 as i16 as u16;
    regs.set_flags(
        false,
        false,
        (base & 0x000F) + (signed & 0x000F) > 0x000F,
        (base & 0x00FF) + (signed & 0x00FF) > 0x00FF,
    );
    base.wrapping_add(signed)
}
