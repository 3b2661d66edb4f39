pub mod config;
pub mod director;
pub mod io;
pub mod js_api;
pub mod utils;

use log::debug;
use wasm_bindgen::prelude::*;

pub use config::{DecompilerConfig, OutputTarget};
pub use director::chunks::{ScriptChunk, ScriptNamesChunk};
pub use director::lingo::decompiler::ast::Script;
pub use director::lingo::decompiler::{
    generate_js, generate_js_with_indent, generate_lingo, generate_lingo_with_indent,
    DecompileError,
};
pub use js_api::{decompile_to_js, decompile_to_lingo};

/// Decodes an LNAM/LSCR pair and decompiles every handler of the script.
pub fn decompile(lnam: &[u8], lscr: &[u8]) -> Result<Script, DecompileError> {
    let names = ScriptNamesChunk::from_bytes(lnam)?;
    let chunk = ScriptChunk::from_bytes(lscr)?;
    debug!(
        "decompiling script type {} with {} names and {} handlers",
        chunk.header.script_type,
        names.names.len(),
        chunk.handlers.len()
    );
    director::lingo::decompiler::decompile_script(&names, &chunk)
}

/// Like [`decompile`], then applies the configured factory name.
pub fn decompile_with(
    lnam: &[u8],
    lscr: &[u8],
    config: &DecompilerConfig,
) -> Result<Script, DecompileError> {
    let mut script = decompile(lnam, lscr)?;
    if let Some(factory) = &config.factory {
        script.set_factory(factory.clone());
    }
    Ok(script)
}

/// Renders a decompiled script in the configured target language and indentation.
pub fn render(script: &Script, config: &DecompilerConfig) -> String {
    let indent = config.indent_unit();
    match config.target {
        OutputTarget::Lingo => generate_lingo_with_indent(script, &indent),
        OutputTarget::Js => generate_js_with_indent(script, &indent),
    }
}

#[wasm_bindgen(start)]
pub fn main() {
    utils::set_panic_hook();
    #[cfg(target_arch = "wasm32")]
    utils::init_console_logger(log::Level::Warn);
}
