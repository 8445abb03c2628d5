// config lets you read a separate config file
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_CORPUS_PATH: &str = "data/spells.json";
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8088";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Settings {
    pub corpus_path: String,
    pub bind_address: String,
    pub log_filter: String,
}

impl Settings {
    /// Built-in defaults, overridden by an optional `spellfall.{toml,json,yaml,...}`
    /// in the working directory, overridden by `SPELLFALL_*` environment variables.
    pub fn load() -> Result<Self> {
        Self::load_from("spellfall")
    }
    /// Same layering, reading the file `name` (with any extension `config` knows).
    pub fn load_from(name: &str) -> Result<Self> {
        let settings = Config::builder()
            .set_default("corpus_path", DEFAULT_CORPUS_PATH)?
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default("log_filter", DEFAULT_LOG_FILTER)?
            .add_source(File::with_name(name).required(false))
            .add_source(Environment::with_prefix("SPELLFALL"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            corpus_path: String::from(DEFAULT_CORPUS_PATH),
            bind_address: String::from(DEFAULT_BIND_ADDRESS),
            log_filter: String::from(DEFAULT_LOG_FILTER),
        }
    }
}
