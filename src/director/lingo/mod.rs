pub mod constants;
pub mod decompiler;
pub mod opcode;
