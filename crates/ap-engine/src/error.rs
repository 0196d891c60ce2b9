use ap_core::{CoreError, SimTime};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// `pop` on an empty queue.  Only valid as loop termination.
    #[error("event queue is empty")]
    EmptyQueue,

    /// The queue drained while the model still reported pending work: the
    /// model failed to keep scheduling future events.
    #[error("event queue drained at {at} but the model is not complete")]
    Stalled { at: SimTime },

    /// A handler received an event that contradicts the model's state.
    #[error("invalid event at {at}: {reason}")]
    InvalidEvent { at: SimTime, reason: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type EngineResult<T> = Result<T, EngineError>;
