use std::fmt;

use switchboard_persist::PersistError;
use thiserror::Error;

/// Coarse fault classes exposed to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    InvalidInput,
    NotFound,
    Storage,
    Generation,
    Configuration,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::NotFound => "not_found",
            Self::Storage => "storage",
            Self::Generation => "generation",
            Self::Configuration => "configuration",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum ChatError {
    /// Blank user id or message; raised before any side effect
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An explicit lookup that must succeed did not
    #[error("Thread not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] PersistError),

    /// The completion call failed or returned no text
    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ChatError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput(_) => ErrorCategory::InvalidInput,
            Self::NotFound(_) => ErrorCategory::NotFound,
            Self::Storage(_) => ErrorCategory::Storage,
            Self::Generation(_) => ErrorCategory::Generation,
            Self::Configuration(_) => ErrorCategory::Configuration,
        }
    }

    pub(crate) fn generation(err: anyhow::Error) -> Self {
        Self::Generation(format!("{:#}", err))
    }
}

pub type Result<T> = std::result::Result<T, ChatError>;
