use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("arrival manifest error: {0}")]
    Manifest(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ModelResult<T> = Result<T, ModelError>;

/// Why an external decision could not be used.  Always recovered by falling
/// back to the default policy.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecisionError {
    #[error("decision maker made no choice")]
    NoChoice,

    #[error("choice {choice} is outside the observation (size {size})")]
    OutOfRange { choice: i32, size: usize },

    #[error("choice {0} points at an empty observation slot")]
    EmptySlot(usize),
}
