use crate::config::ConfigError;
use crate::session::SessionMode;

/// Target detection failures. Expected while the operator moves the board.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DetectError {
    #[error("calibration target not found")]
    NotFound,
    #[error("incomplete target detection ({found} of {expected} corners)")]
    Incomplete { found: usize, expected: usize },
}

/// Errors reported by an external calibration solver.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    #[error("degenerate sample geometry: {0}")]
    Degenerate(String),
    #[error("solver failed: {0}")]
    Failed(String),
}

/// Errors reported by the upload collaborator.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("calibration upload rejected: {0}")]
pub struct PublishError(pub String);

/// Errors returned by session operations.
#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error("no samples collected yet")]
    InsufficientSamples,
    #[error("session is not calibrated")]
    NotCalibrated,
    #[error("session is already calibrated")]
    AlreadyCalibrated,
    #[error("rectification scale must be in [0, 1], got {0}")]
    InvalidAlpha(f64),
    #[error("{frame:?} frame offered to a {session:?} session")]
    ModeMismatch {
        session: SessionMode,
        frame: SessionMode,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Solver(#[from] SolverError),
    #[error(transparent)]
    Publish(#[from] PublishError),
    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}
