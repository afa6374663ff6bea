//! Error types for state management

use thiserror::Error;

use rc_slot::SlotError;

/// State error type
#[derive(Error, Debug)]
pub enum StateError {
    #[error("Slot error: {0}")]
    Slot(#[from] SlotError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// Result type alias
pub type StateResult<T> = Result<T, StateError>;
