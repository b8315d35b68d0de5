use crate::error::{AcousticsError, Result};

/// Format of the audio stream an effect processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioSettings {
    /// Samples per second.
    pub sampling_rate: u32,
    /// Samples per channel in every frame passed to an effect.
    pub frame_size: usize,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            sampling_rate: 48000,
            frame_size: 1024,
        }
    }
}

impl AudioSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sampling_rate(mut self, rate: u32) -> Self {
        self.sampling_rate = rate;
        self
    }

    pub fn frame_size(mut self, size: usize) -> Self {
        self.frame_size = size;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.sampling_rate == 0 {
            return Err(AcousticsError::Configuration(
                "Sampling rate must be positive".into(),
            ));
        }
        if self.frame_size == 0 {
            return Err(AcousticsError::Configuration(
                "Frame size must be positive".into(),
            ));
        }
        Ok(())
    }
}
