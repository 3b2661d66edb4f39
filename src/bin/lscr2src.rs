use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};

use lingo_decompiler::config::CONFIG_ENV_VAR;
use lingo_decompiler::utils::parse_log_level;
use lingo_decompiler::{decompile_with, render, DecompileError, DecompilerConfig, OutputTarget};

#[derive(Parser, Debug)]
#[command(
    name = "lscr2src",
    about = "Decompile a Director LSCR chunk to Lingo or JavaScript source."
)]
struct Args {
    /// Name table chunk (LNAM) the script refers to.
    #[arg(long, value_name = "PATH")]
    lnam: PathBuf,

    /// Compiled script chunk (LSCR).
    #[arg(long, value_name = "PATH")]
    lscr: PathBuf,

    /// Output language: lingo or js.
    #[arg(long)]
    target: Option<OutputTarget>,

    /// Render the script as a factory with this name.
    #[arg(long, value_name = "NAME")]
    factory: Option<String>,

    /// TOML config file (defaults to $LSCR2SRC_CONFIG when set).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write the source here instead of stdout.
    #[arg(long, value_name = "PATH")]
    out: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<DecompilerConfig> {
    let mut config = match &args.config {
        Some(path) => DecompilerConfig::load(path)?,
        None => DecompilerConfig::from_env()
            .with_context(|| format!("loading config named by {}", CONFIG_ENV_VAR))?,
    };
    if let Some(target) = args.target {
        config.target = target;
    }
    if let Some(factory) = &args.factory {
        config.factory = Some(factory.clone());
    }
    Ok(config)
}

fn init_logger(config: &DecompilerConfig) {
    let mut builder = env_logger::Builder::new();
    if let Some(level) = config.log_level.as_deref().and_then(parse_log_level) {
        builder.filter_level(level.to_level_filter());
    }
    // RUST_LOG wins over the config file.
    builder.parse_default_env();
    let _ = builder.try_init();
}

fn describe(err: &DecompileError) -> String {
    match (err.offset(), err.opcode()) {
        (Some(offset), Some(opcode)) => format!("offset {:#x}, opcode {:#04x}", offset, opcode),
        (Some(offset), None) => format!("offset {:#x}", offset),
        _ => "while reading chunk headers".to_string(),
    }
}

fn run(args: &Args, config: &DecompilerConfig) -> Result<()> {
    let lnam = fs::read(&args.lnam).with_context(|| format!("reading {}", args.lnam.display()))?;
    let lscr = fs::read(&args.lscr).with_context(|| format!("reading {}", args.lscr.display()))?;

    let script = match decompile_with(&lnam, &lscr, config) {
        Ok(script) => script,
        Err(err) => {
            let location = describe(&err);
            return Err(anyhow::Error::new(err)
                .context(format!("decompiling {} ({})", args.lscr.display(), location)));
        }
    };
    info!(
        "decompiled {} handlers from {}",
        script.functions.len(),
        args.lscr.display()
    );

    let source = render(&script, config);
    match &args.out {
        Some(path) => {
            fs::write(path, source).with_context(|| format!("writing {}", path.display()))?
        }
        None => print!("{}", source),
    }
    Ok(())
}

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(err) => {
            init_logger(&DecompilerConfig::default());
            error!("{:#}", err);
            return ExitCode::FAILURE;
        }
    };
    init_logger(&config);

    match run(&args, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
