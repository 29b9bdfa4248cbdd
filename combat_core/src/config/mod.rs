//! Rule selection loaded from TOML

mod rules;

pub use rules::{
    default_rules_config, load_rules_config, parse_rules_config, RulesConfig,
    DEFAULT_ROUND_DURATION,
};

use std::path::PathBuf;
use thiserror::Error;

/// Rule configuration error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse rule selection: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid rule selection: {0}")]
    Invalid(String),
}
