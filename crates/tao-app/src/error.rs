//! Errors surfaced by the control surface.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("simulation already running")]
    AlreadyRunning,
    #[error("simulation not started")]
    NotStarted,
    #[error("game loop has stopped")]
    LoopDisconnected,
    #[error("shared state lock poisoned")]
    LockPoisoned,
    #[error("failed to spawn game loop thread: {0}")]
    Spawn(#[from] std::io::Error),
}

impl<T> From<std::sync::PoisonError<T>> for AppError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        AppError::LockPoisoned
    }
}
