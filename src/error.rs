use thiserror::Error;

/// Errors raised by the analysis core when a caller breaks an input contract.
///
/// Low-scoring content is never an error; these only cover input the core
/// cannot meaningfully analyze.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SeoError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl SeoError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, SeoError>;
