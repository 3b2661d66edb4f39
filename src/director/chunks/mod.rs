pub mod script_names;
pub mod script;
pub mod literal;
pub mod handler;

pub use script::ScriptChunk;
pub use script_names::ScriptNamesChunk;
