use thiserror::Error;

/// Faults raised by the core.
///
/// Every variant is terminal for the run that produced it: the machine
/// latches the fault and refuses to step again until it is reset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GbError {
    #[error("unimplemented opcode 0x{opcode:02X} (extended={extended}) at PC=0x{pc:04X}")]
    UnimplementedOpcode { opcode: u8, pc: u16, extended: bool },

    #[error("unassigned opcode 0x{opcode:02X} at PC=0x{pc:04X}")]
    UnassignedOpcode { opcode: u8, pc: u16 },

    #[error("invalid interrupt state: IF=0x{pending:02X} IE=0x{enabled:02X} overlap outside the five sources")]
    InvalidInterruptState { pending: u8, enabled: u8 },

    #[error("program image is empty")]
    EmptyProgram,
}

pub type Result<T> = std::result::Result<T, GbError>;
