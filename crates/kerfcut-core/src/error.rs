use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KerfcutError {
    #[error("Invalid board spec: {0}")]
    InvalidBoardSpec(String),
    #[error("Invalid demand item #{index}: {reason}")]
    InvalidDemand { index: usize, reason: String },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, KerfcutError>;
