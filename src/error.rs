//! Error types for the spatialization pipeline.

use thiserror::Error;

/// Errors surfaced by rendering and encoding.
///
/// Numerically degenerate but finite inputs never produce an error; they are
/// handled inside the stage that sees them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpatialError {
    /// Settings were rejected before any rendering work began.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("invalid sample buffer: {0}")]
    InvalidBuffer(String),

    /// A working buffer could not be reserved. No partial output is returned.
    #[error("failed to allocate buffer of {samples} samples")]
    AllocationFailure { samples: usize },

    #[error("render cancelled")]
    Cancelled,

    #[error("invalid PCM container: {0}")]
    InvalidContainer(String),
}

pub type Result<T> = std::result::Result<T, SpatialError>;

/// Reserve a zeroed sample buffer, reporting allocation failure instead of aborting.
pub(crate) fn zeroed(samples: usize) -> Result<Vec<f32>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(samples)
        .map_err(|_| SpatialError::AllocationFailure { samples })?;
    buffer.resize(samples, 0.0);
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeroed_has_requested_length() {
        let buffer = zeroed(16).unwrap();
        assert_eq!(buffer.len(), 16);
        assert!(buffer.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_zeroed_reports_impossible_allocation() {
        let err = zeroed(usize::MAX).unwrap_err();
        assert_eq!(err, SpatialError::AllocationFailure { samples: usize::MAX });
    }
}
