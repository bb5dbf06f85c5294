use thiserror::Error;

#[derive(Error, Debug)]
pub enum SdkError {
    #[error("plugin file not found: {0}")]
    NotFound(String),
    #[error("failed to open plugin {name}: {reason}")]
    LoadError { name: String, reason: String },
    #[error("plugin does not export required symbol: {0}")]
    MissingEntryPoint(String),
    #[error("symbol {symbol} has wrong signature: expected {expected}, found {found}")]
    SignatureMismatch {
        symbol: String,
        expected: String,
        found: String,
    },
    #[error("contract violation: {0}")]
    ContractViolation(String),
    #[error("validation error: {0}")]
    ValidationError(String),
    #[error("invalid config path: path traversal detected")]
    PathTraversal,
    #[error("config error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SdkError>;
