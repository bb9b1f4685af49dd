use std::path::PathBuf;

use thiserror::Error;

/// Problems with the run configuration. These are detected before any document is read.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("A file name is required")]
    MissingFilename,

    #[error("custom code generation requires a template")]
    MissingTemplate,

    #[error("unknown generation mode '{0}', expected one of: node, angular, custom")]
    UnknownMode(String),

    #[error("failed to load template '{}': {source}", path.display())]
    Template {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The stage that failed during a single pipeline invocation.
#[derive(Error, Debug)]
pub enum ErrorKind {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to resolve references: {0:#}")]
    Resolve(anyhow::Error),

    #[error("validator failed: {0:#}")]
    Validator(anyhow::Error),

    #[error("The Swagger schema is invalid")]
    Invalid,

    #[error("code generation failed: {0:#}")]
    Emit(anyhow::Error),

    #[error("failed to write output: {0:#}")]
    Output(anyhow::Error),
}

/// Every fatal condition of an [crate::Executor] run surfaces as this single tagged error.
#[derive(Error, Debug)]
#[error("[swagpipe] {0}")]
pub struct Error(#[from] ErrorKind);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }
}

impl From<ConfigError> for Error {
    fn from(value: ConfigError) -> Self {
        Self(ErrorKind::Config(value))
    }
}
