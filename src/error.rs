//! Error types for voxel cave generation

use std::fmt;

/// Errors that can occur during cave generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaveError {
    /// Configuration validation failed
    InvalidConfig(String),
    /// Pruning removed every open region, so there is no main room
    ///
    /// Recoverable: retry with a lower `room_threshold_size`, a lower
    /// `fill_percent` or a different seed.
    NoSurvivingRoom,
    /// The room connector could not find a candidate for a room that still
    /// needs to be connected to the main room
    InternalInvariant(String),
}

impl fmt::Display for CaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaveError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            CaveError::NoSurvivingRoom => {
                write!(f, "generation failed: no open region survived pruning")
            }
            CaveError::InternalInvariant(msg) => write!(f, "internal invariant violated: {}", msg),
        }
    }
}

impl std::error::Error for CaveError {}

/// Result type alias for cave operations
pub type Result<T> = std::result::Result<T, CaveError>;
