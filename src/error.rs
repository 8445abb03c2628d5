use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpellfallError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Parse error in '{clause}': {message}")]
    Parse { clause: String, message: String },
    #[error("Unknown field '{alias}'")]
    UnknownField { alias: String },
    #[error("'{operator}' is not a valid operator for '{field}'")]
    InvalidOperator { operator: String, field: String },
    #[error("Invalid value '{value}' for field '{field}': {reason}")]
    InvalidValue { value: String, field: String, reason: String },
    #[error("Data contract violated by record '{record}': {message}")]
    DataContract { record: String, message: String },
    #[error("I/O error: {0}")]
    Io(String),
    #[error("Lock poisoned: {0}")]
    Lock(String),
}

impl SpellfallError {
    /// True for errors caused by the query text itself, as opposed to the corpus or the host.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Parse { .. }
                | Self::UnknownField { .. }
                | Self::InvalidOperator { .. }
                | Self::InvalidValue { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SpellfallError>;

// Helper conversions
impl From<std::io::Error> for SpellfallError {
    fn from(e: std::io::Error) -> Self { Self::Io(e.to_string()) }
}
impl From<serde_json::Error> for SpellfallError {
    fn from(e: serde_json::Error) -> Self {
        Self::DataContract { record: String::from("<corpus>"), message: e.to_string() }
    }
}
impl From<config::ConfigError> for SpellfallError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
impl From<regex::Error> for SpellfallError {
    fn from(e: regex::Error) -> Self { Self::Config(format!("invalid extraction pattern: {e}")) }
}
