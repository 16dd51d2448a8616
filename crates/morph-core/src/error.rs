/// Errors raised by the morph pipeline.
///
/// `UnknownShape`, `LengthMismatch` and `InvalidConfig` are fatal at startup.
/// `Initialization` is surfaced on the status line while visuals keep running.
/// `TransientFrame` never leaves the gesture tick.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MorphError {
    #[error("unknown shape: {0}")]
    UnknownShape(String),

    #[error("particle sets differ in length: source {source_len}, target {target_len}")]
    LengthMismatch { source_len: usize, target_len: usize },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("initialization failed: {0}")]
    Initialization(String),

    #[error("skipped frame: {0}")]
    TransientFrame(String),
}

impl MorphError {
    /// Whether the error should stop the session from starting.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            MorphError::UnknownShape(_)
                | MorphError::LengthMismatch { .. }
                | MorphError::InvalidConfig(_)
        )
    }
}
