//! Error types for PetalSonic Acoustics

use crate::bands::BandLayout;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AcousticsError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Frame size mismatch: expected {expected} samples, got {actual}")]
    FrameSizeMismatch { expected: usize, actual: usize },

    #[error("Channel count mismatch: expected {expected} channels, got {actual}")]
    ChannelCountMismatch { expected: usize, actual: usize },

    #[error("Band model mismatch: expected {expected:?}, got {actual:?}")]
    BandModelMismatch {
        expected: BandLayout,
        actual: BandLayout,
    },

    #[error("Compute device error: {0}")]
    Device(String),

    #[error("Allocation error: {0}")]
    Allocation(String),

    #[error("Simulation error: {0}")]
    Simulation(String),
}

pub type Result<T> = std::result::Result<T, AcousticsError>;
