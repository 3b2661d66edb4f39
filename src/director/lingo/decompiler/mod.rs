// Lingo bytecode decompiler
//
// LSCR bytecode plus its LNAM name table go in; a statement tree comes out and
// is rendered either as Lingo or as JavaScript.

pub mod ast;
pub mod code_writer;
pub mod context;
pub mod control_flow;
pub mod enums;
pub mod error;
pub mod handler;
pub mod js_writer;
pub mod lingo_writer;

pub use error::DecompileError;
pub use handler::{decompile_handler, decompile_script};
pub use js_writer::{generate_js, generate_js_with_indent};
pub use lingo_writer::{generate_lingo, generate_lingo_with_indent};
