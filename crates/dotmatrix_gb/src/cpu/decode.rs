//! Opcode descriptor tables.
//!
//! Both opcode maps are decoded once into 256-entry tables of
//! [`Instruction`] / [`ExtInstruction`] descriptors. A descriptor carries
//! the operation, how many immediate bytes to fetch, and the machine-cycle
//! cost; the executor never re-derives any of that from the opcode byte.
//!
//! The LR35902 encodes most instructions as `xx yyy zzz`, so the decoders
//! below split the opcode the same way (`x = op >> 6`, `y = (op >> 3) & 7`,
//! `z = op & 7`, `p = y >> 1`, `q = y & 1`).

use std::fmt;

use lazy_static::lazy_static;

/// 8-bit operand location: a register or the byte at `(HL)`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Loc8 {
    B,
    C,
    D,
    E,
    H,
    L,
    IndHl,
    A,
}

impl Loc8 {
    /// Standard register order used by the opcode tables:
    /// 0=B, 1=C, 2=D, 3=E, 4=H, 5=L, 6=(HL), 7=A.
    pub const fn from_index(index: u8) -> Self {
        match index & 0x07 {
            0 => Loc8::B,
            1 => Loc8::C,
            2 => Loc8::D,
            3 => Loc8::E,
            4 => Loc8::H,
            5 => Loc8::L,
            6 => Loc8::IndHl,
            _ => Loc8::A,
        }
    }

    #[inline]
    pub const fn is_memory(self) -> bool {
        matches!(self, Loc8::IndHl)
    }
}

/// Register pairs addressed by `LD rr,d16`, `INC rr`, `DEC rr`, `ADD HL,rr`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Reg16 {
    Bc,
    De,
    Hl,
    Sp,
}

impl Reg16 {
    const fn from_index(index: u8) -> Self {
        match index & 0x03 {
            0 => Reg16::Bc,
            1 => Reg16::De,
            2 => Reg16::Hl,
            _ => Reg16::Sp,
        }
    }
}

/// Register pairs addressed by `PUSH`/`POP` (AF replaces SP).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StackPair {
    Bc,
    De,
    Hl,
    Af,
}

impl StackPair {
    const fn from_index(index: u8) -> Self {
        match index & 0x03 {
            0 => StackPair::Bc,
            1 => StackPair::De,
            2 => StackPair::Hl,
            _ => StackPair::Af,
        }
    }
}

/// Pointer forms of `LD (rr),A` / `LD A,(rr)`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Indirect {
    Bc,
    De,
    HlInc,
    HlDec,
}

impl Indirect {
    const fn from_index(index: u8) -> Self {
        match index & 0x03 {
            0 => Indirect::Bc,
            1 => Indirect::De,
            2 => Indirect::HlInc,
            _ => Indirect::HlDec,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Cond {
    Nz,
    Z,
    Nc,
    C,
}

impl Cond {
    const fn from_index(index: u8) -> Self {
        match index & 0x03 {
            0 => Cond::Nz,
            1 => Cond::Z,
            2 => Cond::Nc,
            _ => Cond::C,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

impl AluOp {
    const fn from_index(index: u8) -> Self {
        match index & 0x07 {
            0 => AluOp::Add,
            1 => AluOp::Adc,
            2 => AluOp::Sub,
            3 => AluOp::Sbc,
            4 => AluOp::And,
            5 => AluOp::Xor,
            6 => AluOp::Or,
            _ => AluOp::Cp,
        }
    }
}

/// Rotate/shift group of the extended table.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ShiftOp {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Swap,
    Srl,
}

impl ShiftOp {
    const fn from_index(index: u8) -> Self {
        match index & 0x07 {
            0 => ShiftOp::Rlc,
            1 => ShiftOp::Rrc,
            2 => ShiftOp::Rl,
            3 => ShiftOp::Rr,
            4 => ShiftOp::Sla,
            5 => ShiftOp::Sra,
            6 => ShiftOp::Swap,
            _ => ShiftOp::Srl,
        }
    }
}

/// Immediate bytes that follow the opcode.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OperandMode {
    None,
    Imm8,
    /// Signed 8-bit displacement.
    Rel8,
    Imm16,
}

impl OperandMode {
    pub const fn byte_len(self) -> u16 {
        match self {
            OperandMode::None => 0,
            OperandMode::Imm8 | OperandMode::Rel8 => 1,
            OperandMode::Imm16 => 2,
        }
    }
}

/// Immediate operand fetched according to an [`OperandMode`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Operand {
    None,
    Byte(u8),
    Offset(i8),
    Word(u16),
}

impl Operand {
    #[inline]
    pub fn byte(self) -> u8 {
        match self {
            Operand::Byte(value) => value,
            Operand::Offset(value) => value as u8,
            Operand::Word(value) => value as u8,
            Operand::None => 0,
        }
    }

    #[inline]
    pub fn offset(self) -> i8 {
        self.byte() as i8
    }

    #[inline]
    pub fn word(self) -> u16 {
        match self {
            Operand::Word(value) => value,
            Operand::Byte(value) => value as u16,
            Operand::Offset(value) => value as u8 as u16,
            Operand::None => 0,
        }
    }
}

/// Operations of the primary opcode map.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Op {
    Nop,
    Stop,
    Halt,
    Di,
    Ei,
    /// `LD rr,d16`
    LdRrImm(Reg16),
    /// `LD (rr),A`
    LdIndA(Indirect),
    /// `LD A,(rr)`
    LdAInd(Indirect),
    /// `LD (a16),SP`
    LdImm16Sp,
    Inc16(Reg16),
    Dec16(Reg16),
    AddHl(Reg16),
    Inc8(Loc8),
    Dec8(Loc8),
    /// `LD r,d8`
    LdImm8(Loc8),
    Rlca,
    Rrca,
    Rla,
    Rra,
    Daa,
    Cpl,
    Scf,
    Ccf,
    Jr(Option<Cond>),
    /// `LD dst,src`
    Ld(Loc8, Loc8),
    Alu(AluOp, Loc8),
    AluImm(AluOp),
    Ret(Option<Cond>),
    Reti,
    Pop(StackPair),
    Push(StackPair),
    Jp(Option<Cond>),
    JpHl,
    Call(Option<Cond>),
    Rst(u8),
    /// `LDH (a8),A`
    LdhImmA,
    /// `LDH A,(a8)`
    LdhAImm,
    /// `LD (C),A`
    LdhCA,
    /// `LD A,(C)`
    LdhAC,
    /// `LD (a16),A`
    LdImm16A,
    /// `LD A,(a16)`
    LdAImm16,
    AddSpImm,
    LdHlSpImm,
    LdSpHl,
    /// 0xCB: continue in the extended table.
    Prefix,
    /// One of the eleven opcode holes with no defined instruction.
    Unassigned,
}

/// Primary-table descriptor.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Instruction {
    pub opcode: u8,
    pub op: Op,
    pub operand: OperandMode,
    /// Machine cycles when no branch is taken (or for unconditional forms).
    pub cycles: u8,
    /// Machine cycles when a conditional branch/call/return is taken.
    pub taken_cycles: u8,
}

impl Instruction {
    const fn new(opcode: u8, op: Op, operand: OperandMode, cycles: u8) -> Self {
        Self {
            opcode,
            op,
            operand,
            cycles,
            taken_cycles: cycles,
        }
    }

    const fn branch(opcode: u8, op: Op, operand: OperandMode, cycles: u8, taken: u8) -> Self {
        Self {
            opcode,
            op,
            operand,
            cycles,
            taken_cycles: taken,
        }
    }

    /// Instruction length in bytes including the opcode.
    pub const fn byte_len(&self) -> u16 {
        1 + self.operand.byte_len()
    }
}

/// Operations of the extended (0xCB-prefixed) map.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExtOp {
    Shift(ShiftOp, Loc8),
    Bit(u8, Loc8),
    Res(u8, Loc8),
    Set(u8, Loc8),
}

/// Extended-table descriptor.
///
/// `cycles` excludes the prefix fetch, which the primary table's 0xCB entry
/// already charges.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ExtInstruction {
    pub opcode: u8,
    pub op: ExtOp,
    pub cycles: u8,
}

lazy_static! {
    static ref PRIMARY: [Option<Instruction>; 256] =
        std::array::from_fn(|opcode| decode_primary(opcode as u8));
    static ref EXTENDED: [Option<ExtInstruction>; 256] =
        std::array::from_fn(|opcode| decode_extended(opcode as u8));
}

/// The primary opcode table. `None` marks an opcode with no modeled
/// behaviour.
pub fn primary() -> &'static [Option<Instruction>; 256] {
    &PRIMARY
}

/// The 0xCB-prefixed opcode table.
pub fn extended() -> &'static [Option<ExtInstruction>; 256] {
    &EXTENDED
}

fn decode_primary(opcode: u8) -> Option<Instruction> {
    use OperandMode::{Imm16, Imm8, None as NoImm, Rel8};

    let x = opcode >> 6;
    let y = (opcode >> 3) & 0x07;
    let z = opcode & 0x07;
    let p = y >> 1;
    let q = y & 0x01;

    let instr = match (x, z) {
        (0, 0) => match y {
            0 => Instruction::new(opcode, Op::Nop, NoImm, 1),
            1 => Instruction::new(opcode, Op::LdImm16Sp, Imm16, 5),
            2 => Instruction::new(opcode, Op::Stop, Imm8, 1),
            3 => Instruction::new(opcode, Op::Jr(None), Rel8, 3),
            _ => Instruction::branch(opcode, Op::Jr(Some(Cond::from_index(y - 4))), Rel8, 2, 3),
        },
        (0, 1) if q == 0 => Instruction::new(opcode, Op::LdRrImm(Reg16::from_index(p)), Imm16, 3),
        (0, 1) => Instruction::new(opcode, Op::AddHl(Reg16::from_index(p)), NoImm, 2),
        (0, 2) if q == 0 => Instruction::new(opcode, Op::LdIndA(Indirect::from_index(p)), NoImm, 2),
        (0, 2) => Instruction::new(opcode, Op::LdAInd(Indirect::from_index(p)), NoImm, 2),
        (0, 3) if q == 0 => Instruction::new(opcode, Op::Inc16(Reg16::from_index(p)), NoImm, 2),
        (0, 3) => Instruction::new(opcode, Op::Dec16(Reg16::from_index(p)), NoImm, 2),
        (0, 4) | (0, 5) => {
            let loc = Loc8::from_index(y);
            let op = if z == 4 { Op::Inc8(loc) } else { Op::Dec8(loc) };
            Instruction::new(opcode, op, NoImm, if loc.is_memory() { 3 } else { 1 })
        }
        (0, 6) => {
            let loc = Loc8::from_index(y);
            Instruction::new(opcode, Op::LdImm8(loc), Imm8, if loc.is_memory() { 3 } else { 2 })
        }
        (0, _) => {
            let op = match y {
                0 => Op::Rlca,
                1 => Op::Rrca,
                2 => Op::Rla,
                3 => Op::Rra,
                4 => Op::Daa,
                5 => Op::Cpl,
                6 => Op::Scf,
                _ => Op::Ccf,
            };
            Instruction::new(opcode, op, NoImm, 1)
        }
        (1, _) if opcode == 0x76 => Instruction::new(opcode, Op::Halt, NoImm, 1),
        (1, _) => {
            let dst = Loc8::from_index(y);
            let src = Loc8::from_index(z);
            let cycles = if dst.is_memory() || src.is_memory() { 2 } else { 1 };
            Instruction::new(opcode, Op::Ld(dst, src), NoImm, cycles)
        }
        (2, _) => {
            let src = Loc8::from_index(z);
            let cycles = if src.is_memory() { 2 } else { 1 };
            Instruction::new(opcode, Op::Alu(AluOp::from_index(y), src), NoImm, cycles)
        }
        _ => decode_primary_block3(opcode, y, z, p, q),
    };
    Some(instr)
}

/// Opcodes 0xC0–0xFF: control flow, stack, high-page loads and the holes.
fn decode_primary_block3(opcode: u8, y: u8, z: u8, p: u8, q: u8) -> Instruction {
    use OperandMode::{Imm16, Imm8, None as NoImm, Rel8};

    match z {
        0 => match y {
            0..=3 => Instruction::branch(opcode, Op::Ret(Some(Cond::from_index(y))), NoImm, 2, 5),
            4 => Instruction::new(opcode, Op::LdhImmA, Imm8, 3),
            5 => Instruction::new(opcode, Op::AddSpImm, Rel8, 4),
            6 => Instruction::new(opcode, Op::LdhAImm, Imm8, 3),
            _ => Instruction::new(opcode, Op::LdHlSpImm, Rel8, 3),
        },
        1 if q == 0 => Instruction::new(opcode, Op::Pop(StackPair::from_index(p)), NoImm, 3),
        1 => match p {
            0 => Instruction::new(opcode, Op::Ret(None), NoImm, 4),
            1 => Instruction::new(opcode, Op::Reti, NoImm, 4),
            2 => Instruction::new(opcode, Op::JpHl, NoImm, 1),
            _ => Instruction::new(opcode, Op::LdSpHl, NoImm, 2),
        },
        2 => match y {
            0..=3 => Instruction::branch(opcode, Op::Jp(Some(Cond::from_index(y))), Imm16, 3, 4),
            4 => Instruction::new(opcode, Op::LdhCA, NoImm, 2),
            5 => Instruction::new(opcode, Op::LdImm16A, Imm16, 4),
            6 => Instruction::new(opcode, Op::LdhAC, NoImm, 2),
            _ => Instruction::new(opcode, Op::LdAImm16, Imm16, 4),
        },
        3 => match y {
            0 => Instruction::new(opcode, Op::Jp(None), Imm16, 4),
            1 => Instruction::new(opcode, Op::Prefix, NoImm, 1),
            6 => Instruction::new(opcode, Op::Di, NoImm, 1),
            7 => Instruction::new(opcode, Op::Ei, NoImm, 1),
            _ => Instruction::new(opcode, Op::Unassigned, NoImm, 0),
        },
        4 => match y {
            0..=3 => Instruction::branch(opcode, Op::Call(Some(Cond::from_index(y))), Imm16, 3, 6),
            _ => Instruction::new(opcode, Op::Unassigned, NoImm, 0),
        },
        5 if q == 0 => Instruction::new(opcode, Op::Push(StackPair::from_index(p)), NoImm, 4),
        5 if p == 0 => Instruction::new(opcode, Op::Call(None), Imm16, 6),
        5 => Instruction::new(opcode, Op::Unassigned, NoImm, 0),
        6 => Instruction::new(opcode, Op::AluImm(AluOp::from_index(y)), Imm8, 2),
        _ => Instruction::new(opcode, Op::Rst(y * 8), NoImm, 4),
    }
}

fn decode_extended(opcode: u8) -> Option<ExtInstruction> {
    let x = opcode >> 6;
    let y = (opcode >> 3) & 0x07;
    let loc = Loc8::from_index(opcode);

    let (op, cycles) = match x {
        0 => (ExtOp::Shift(ShiftOp::from_index(y), loc), 1),
        1 => (ExtOp::Bit(y, loc), 1),
        2 => (ExtOp::Res(y, loc), 1),
        _ => (ExtOp::Set(y, loc), 1),
    };
    // (HL) forms add the memory read (and write-back, except for BIT).
    let cycles = match (op, loc.is_memory()) {
        (_, false) => cycles,
        (ExtOp::Bit(..), true) => cycles + 1,
        (_, true) => cycles + 2,
    };

    Some(ExtInstruction { opcode, op, cycles })
}

impl fmt::Display for Loc8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Loc8::B => "B",
            Loc8::C => "C",
            Loc8::D => "D",
            Loc8::E => "E",
            Loc8::H => "H",
            Loc8::L => "L",
            Loc8::IndHl => "(HL)",
            Loc8::A => "A",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Reg16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Reg16::Bc => "BC",
            Reg16::De => "DE",
            Reg16::Hl => "HL",
            Reg16::Sp => "SP",
        })
    }
}

impl fmt::Display for StackPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StackPair::Bc => "BC",
            StackPair::De => "DE",
            StackPair::Hl => "HL",
            StackPair::Af => "AF",
        })
    }
}

impl fmt::Display for Indirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Indirect::Bc => "(BC)",
            Indirect::De => "(DE)",
            Indirect::HlInc => "(HL+)",
            Indirect::HlDec => "(HL-)",
        })
    }
}

impl fmt::Display for Cond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Cond::Nz => "NZ",
            Cond::Z => "Z",
            Cond::Nc => "NC",
            Cond::C => "C",
        })
    }
}

impl fmt::Display for AluOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AluOp::Add => "ADD A,",
            AluOp::Adc => "ADC A,",
            AluOp::Sub => "SUB ",
            AluOp::Sbc => "SBC A,",
            AluOp::And => "AND ",
            AluOp::Xor => "XOR ",
            AluOp::Or => "OR ",
            AluOp::Cp => "CP ",
        })
    }
}

impl fmt::Display for ShiftOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShiftOp::Rlc => "RLC",
            ShiftOp::Rrc => "RRC",
            ShiftOp::Rl => "RL",
            ShiftOp::Rr => "RR",
            ShiftOp::Sla => "SLA",
            ShiftOp::Sra => "SRA",
            ShiftOp::Swap => "SWAP",
            ShiftOp::Srl => "SRL",
        })
    }
}

fn with_cond(f: &mut fmt::Formatter<'_>, name: &str, cond: Option<Cond>, rest: &str) -> fmt::Result {
    match (cond, rest.is_empty()) {
        (Some(cond), true) => write!(f, "{name} {cond}"),
        (Some(cond), false) => write!(f, "{name} {cond},{rest}"),
        (None, true) => f.write_str(name),
        (None, false) => write!(f, "{name} {rest}"),
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Op::Nop => f.write_str("NOP"),
            Op::Stop => f.write_str("STOP"),
            Op::Halt => f.write_str("HALT"),
            Op::Di => f.write_str("DI"),
            Op::Ei => f.write_str("EI"),
            Op::LdRrImm(rr) => write!(f, "LD {rr},d16"),
            Op::LdIndA(ind) => write!(f, "LD {ind},A"),
            Op::LdAInd(ind) => write!(f, "LD A,{ind}"),
            Op::LdImm16Sp => f.write_str("LD (a16),SP"),
            Op::Inc16(rr) => write!(f, "INC {rr}"),
            Op::Dec16(rr) => write!(f, "DEC {rr}"),
            Op::AddHl(rr) => write!(f, "ADD HL,{rr}"),
            Op::Inc8(loc) => write!(f, "INC {loc}"),
            Op::Dec8(loc) => write!(f, "DEC {loc}"),
            Op::LdImm8(loc) => write!(f, "LD {loc},d8"),
            Op::Rlca => f.write_str("RLCA"),
            Op::Rrca => f.write_str("RRCA"),
            Op::Rla => f.write_str("RLA"),
            Op::Rra => f.write_str("RRA"),
            Op::Daa => f.write_str("DAA"),
            Op::Cpl => f.write_str("CPL"),
            Op::Scf => f.write_str("SCF"),
            Op::Ccf => f.write_str("CCF"),
            Op::Jr(cond) => with_cond(f, "JR", cond, "r8"),
            Op::Ld(dst, src) => write!(f, "LD {dst},{src}"),
            Op::Alu(op, src) => write!(f, "{op}{src}"),
            Op::AluImm(op) => write!(f, "{op}d8"),
            Op::Ret(cond) => with_cond(f, "RET", cond, ""),
            Op::Reti => f.write_str("RETI"),
            Op::Pop(pair) => write!(f, "POP {pair}"),
            Op::Push(pair) => write!(f, "PUSH {pair}"),
            Op::Jp(cond) => with_cond(f, "JP", cond, "a16"),
            Op::JpHl => f.write_str("JP HL"),
            Op::Call(cond) => with_cond(f, "CALL", cond, "a16"),
            Op::Rst(vector) => write!(f, "RST {vector:02X}H"),
            Op::LdhImmA => f.write_str("LDH (a8),A"),
            Op::LdhAImm => f.write_str("LDH A,(a8)"),
            Op::LdhCA => f.write_str("LD (C),A"),
            Op::LdhAC => f.write_str("LD A,(C)"),
            Op::LdImm16A => f.write_str("LD (a16),A"),
            Op::LdAImm16 => f.write_str("LD A,(a16)"),
            Op::AddSpImm => f.write_str("ADD SP,r8"),
            Op::LdHlSpImm => f.write_str("LD HL,SP+r8"),
            Op::LdSpHl => f.write_str("LD SP,HL"),
            Op::Prefix => f.write_str("PREFIX CB"),
            Op::Unassigned => f.write_str("???"),
        }
    }
}

impl fmt::Display for ExtOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ExtOp::Shift(op, loc) => write!(f, "{op} {loc}"),
            ExtOp::Bit(bit, loc) => write!(f, "BIT {bit},{loc}"),
            ExtOp::Res(bit, loc) => write!(f, "RES {bit},{loc}"),
            ExtOp::Set(bit, loc) => write!(f, "SET {bit},{loc}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_primary_opcode_is_modeled() {
        assert!(primary().iter().all(Option::is_some));
    }

    #[test]
    fn every_extended_opcode_is_modeled() {
        assert!(extended().iter().all(Option::is_some));
    }

    #[test]
    fn exactly_eleven_opcode_holes() {
        let holes: Vec<u8> = primary()
            .iter()
            .flatten()
            .filter(|instr| instr.op == Op::Unassigned)
            .map(|instr| instr.opcode)
            .collect();
        assert_eq!(
            holes,
            vec![0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD]
        );
    }

    #[test]
    fn assigned_costs_stay_in_range() {
        for instr in primary().iter().flatten() {
            if instr.op == Op::Unassigned {
                assert_eq!(instr.cycles, 0);
                continue;
            }
            assert!((1..=6).contains(&instr.cycles), "{:02X}", instr.opcode);
            assert!((1..=6).contains(&instr.taken_cycles), "{:02X}", instr.opcode);
        }
    }

    #[test]
    fn spot_check_descriptors() {
        let table = primary();
        let ld_bc = table[0x01].unwrap();
        assert_eq!(ld_bc.op, Op::LdRrImm(Reg16::Bc));
        assert_eq!(ld_bc.operand, OperandMode::Imm16);
        assert_eq!(ld_bc.cycles, 3);
        assert_eq!(ld_bc.byte_len(), 3);

        let call_nz = table[0xC4].unwrap();
        assert_eq!(call_nz.op, Op::Call(Some(Cond::Nz)));
        assert_eq!((call_nz.cycles, call_nz.taken_cycles), (3, 6));

        let jr = table[0x18].unwrap();
        assert_eq!(jr.operand, OperandMode::Rel8);
        assert_eq!(jr.byte_len(), 2);
        assert_eq!(table[0xE8].unwrap().operand, OperandMode::Rel8);
        assert_eq!(Operand::Offset(-2).byte(), 0xFE);
        assert_eq!(Operand::Byte(0xFE).offset(), -2);

        assert_eq!(table[0x36].unwrap().op, Op::LdImm8(Loc8::IndHl));
        assert_eq!(table[0x36].unwrap().cycles, 3);
        assert_eq!(table[0x76].unwrap().op, Op::Halt);
        assert_eq!(table[0xFF].unwrap().op, Op::Rst(0x38));
        assert_eq!(table[0xE8].unwrap().cycles, 4);
        assert_eq!(table[0xF8].unwrap().cycles, 3);
    }

    #[test]
    fn extended_costs_follow_operand_kind() {
        let table = extended();
        assert_eq!(table[0x00].unwrap().op, ExtOp::Shift(ShiftOp::Rlc, Loc8::B));
        assert_eq!(table[0x00].unwrap().cycles, 1);
        assert_eq!(table[0x06].unwrap().cycles, 3);
        assert_eq!(table[0x46].unwrap().op, ExtOp::Bit(0, Loc8::IndHl));
        assert_eq!(table[0x46].unwrap().cycles, 2);
        assert_eq!(table[0xFE].unwrap().op, ExtOp::Set(7, Loc8::IndHl));
        assert_eq!(table[0xFE].unwrap().cycles, 3);
        assert_eq!(table[0x37].unwrap().op, ExtOp::Shift(ShiftOp::Swap, Loc8::A));
    }

    #[test]
    fn mnemonics_render() {
        let table = primary();
        assert_eq!(table[0x7E].unwrap().op.to_string(), "LD A,(HL)");
        assert_eq!(table[0x20].unwrap().op.to_string(), "JR NZ,r8");
        assert_eq!(table[0xC9].unwrap().op.to_string(), "RET");
        assert_eq!(table[0xAF].unwrap().op.to_string(), "XOR A");
        assert_eq!(extended()[0x7C].unwrap().op.to_string(), "BIT 7,H");
    }
}
