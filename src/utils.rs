use log::Level;

pub fn set_panic_hook() {
    // When the `console_error_panic_hook` feature is enabled, we can call the
    // `set_panic_hook` function at least once during initialization, and then
    // we will get better error messages if our code ever panics.
    //
    // For more details see
    // https://github.com/rustwasm/console_error_panic_hook#readme
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Maps a textual level from the config onto the `log` crate's levels.
pub fn parse_log_level(value: &str) -> Option<Level> {
    value.parse::<Level>().ok()
}

/// Routes `log` output to the browser console. Safe to call more than once.
#[cfg(target_arch = "wasm32")]
pub fn init_console_logger(level: Level) {
    let _ = console_log::init_with_level(level);
}

#[cfg(not(target_arch = "wasm32"))]
pub fn init_console_logger(level: Level) {
    let _ = env_logger::Builder::new()
        .filter_level(level.to_level_filter())
        .parse_default_env()
        .try_init();
}
