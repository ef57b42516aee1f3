use crate::composer::ComposerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Operation failed: {0}")]
    OperationFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Composer(#[from] ComposerError),
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        // {:#} keeps the context chain on one line
        CliError::OperationFailed(format!("{:#}", err))
    }
}
