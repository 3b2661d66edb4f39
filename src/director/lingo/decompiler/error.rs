use thiserror::Error;

/// Every failure raised while turning LNAM/LSCR bytes into a `Script`.
#[derive(Debug, Error)]
pub enum DecompileError {
    #[error("unknown opcode {opcode:#04x} at offset {offset:#x}")]
    UnknownOpcode { offset: usize, opcode: u8 },

    #[error("unknown opcode pair {prefix:#04x} {sub:#04x} at offset {offset:#x}")]
    UnknownOpcodePair { offset: usize, prefix: u8, sub: u8 },

    #[error("truncated instruction {opcode:#04x} at offset {offset:#x}")]
    TruncatedInstruction { offset: usize, opcode: u8 },

    #[error("stack underflow in opcode {opcode:#04x} at offset {offset:#x}")]
    StackUnderflow { offset: usize, opcode: u8 },

    #[error("{table} index {index} out of range in opcode {opcode:#04x} at offset {offset:#x}")]
    IndexOutOfRange {
        offset: usize,
        opcode: u8,
        table: &'static str,
        index: usize,
    },

    #[error("unexpected operand for opcode {opcode:#04x} at offset {offset:#x}: {reason}")]
    UnexpectedOperand {
        offset: usize,
        opcode: u8,
        reason: String,
    },

    #[error("tell end without an open tell at offset {offset:#x}")]
    UnmatchedTellEnd { offset: usize },

    #[error("jump at {position:#x} to {address:#x} could not be resolved")]
    UnresolvedJump { position: usize, address: usize },

    #[error("malformed chunk: {0}")]
    MalformedChunk(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DecompileError {
    /// Byte offset of the failing instruction, when the error has one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            DecompileError::UnknownOpcode { offset, .. }
            | DecompileError::UnknownOpcodePair { offset, .. }
            | DecompileError::TruncatedInstruction { offset, .. }
            | DecompileError::StackUnderflow { offset, .. }
            | DecompileError::IndexOutOfRange { offset, .. }
            | DecompileError::UnexpectedOperand { offset, .. }
            | DecompileError::UnmatchedTellEnd { offset } => Some(*offset),
            DecompileError::UnresolvedJump { position, .. } => Some(*position),
            DecompileError::MalformedChunk(_) | DecompileError::Io(_) => None,
        }
    }

    pub fn opcode(&self) -> Option<u8> {
        match self {
            DecompileError::UnknownOpcode { opcode, .. }
            | DecompileError::TruncatedInstruction { opcode, .. }
            | DecompileError::StackUnderflow { opcode, .. }
            | DecompileError::IndexOutOfRange { opcode, .. }
            | DecompileError::UnexpectedOperand { opcode, .. } => Some(*opcode),
            DecompileError::UnknownOpcodePair { prefix, .. } => Some(*prefix),
            _ => None,
        }
    }
}

impl From<String> for DecompileError {
    fn from(message: String) -> Self {
        DecompileError::MalformedChunk(message)
    }
}
