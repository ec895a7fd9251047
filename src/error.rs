use thiserror::Error;

use crate::buffer::Direction;
use crate::digest::Digest128;

/// What went wrong inside a single engine call.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineFault {
    #[error("engine returned status {0}")]
    Status(i32),
    #[error("engine reported {reported} bytes written into a {capacity}-byte destination")]
    Overrun { reported: u64, capacity: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranscodeError {
    #[error("lepton {direction} failed: {fault}")]
    EngineFailure {
        direction: Direction,
        fault: EngineFault,
    },
    #[error("round trip mismatch: source digest {expected}, reconstructed digest {actual}")]
    IntegrityMismatch {
        expected: Digest128,
        actual: Digest128,
    },
    #[error("no lepton engine installed (build with the `native` feature or call engine::install)")]
    EngineUnavailable,
    #[error("invalid concurrency {0}: must be between 1 and {max}", max = i32::MAX)]
    InvalidConcurrency(i64),
    #[error("invalid digest {0:?}: expected 32 hex characters")]
    InvalidDigest(String),
}

impl TranscodeError {
    /// Raw engine status, when the failure came from a non-zero engine return code.
    pub fn status_code(&self) -> Option<i32> {
        match self {
            Self::EngineFailure {
                fault: EngineFault::Status(code),
                ..
            } => Some(*code),
            _ => None,
        }
    }

    pub fn is_engine_failure(&self) -> bool {
        matches!(self, Self::EngineFailure { .. })
    }

    pub fn is_integrity_mismatch(&self) -> bool {
        matches!(self, Self::IntegrityMismatch { .. })
    }
}
