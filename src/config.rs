use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::director::lingo::decompiler::code_writer::DEFAULT_INDENT;

/// Environment variable naming a config file to use when none is given.
pub const CONFIG_ENV_VAR: &str = "LSCR2SRC_CONFIG";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputTarget {
    #[default]
    Lingo,
    Js,
}

impl std::str::FromStr for OutputTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lingo" | "ls" => Ok(OutputTarget::Lingo),
            "js" | "javascript" => Ok(OutputTarget::Js),
            other => Err(format!("unknown target '{}' (expected lingo or js)", other)),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Rendering options shared by the CLI and the library entry points.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecompilerConfig {
    pub indent_width: usize,
    pub target: OutputTarget,
    /// Renders the script as a Director 4 factory with this name.
    pub factory: Option<String>,
    pub log_level: Option<String>,
}

impl Default for DecompilerConfig {
    fn default() -> Self {
        DecompilerConfig {
            indent_width: DEFAULT_INDENT.len(),
            target: OutputTarget::default(),
            factory: None,
            log_level: None,
        }
    }
}

impl DecompilerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Loads the file named by `LSCR2SRC_CONFIG`, falling back to defaults when it is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn indent_unit(&self) -> String {
        " ".repeat(self.indent_width)
    }

    pub fn with_factory(mut self, name: impl Into<String>) -> Self {
        self.factory = Some(name.into());
        self
    }

    pub fn with_target(mut self, target: OutputTarget) -> Self {
        self.target = target;
        self
    }
}
