use crate::bands::{BandLayout, Bands};
use crate::error::{AcousticsError, Result};

/// Shape of a reverb effect instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReverbEffectSettings {
    /// Output channels; each gets its own decorrelated tail.
    pub num_channels: usize,
    pub band_layout: BandLayout,
}

impl Default for ReverbEffectSettings {
    fn default() -> Self {
        Self {
            num_channels: 2,
            band_layout: BandLayout::default(),
        }
    }
}

impl ReverbEffectSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_channels(mut self, channels: usize) -> Self {
        self.num_channels = channels;
        self
    }

    pub fn band_layout(mut self, layout: BandLayout) -> Self {
        self.band_layout = layout;
        self
    }

    pub fn bands(&self) -> Bands {
        Bands::new(self.band_layout)
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_channels == 0 {
            return Err(AcousticsError::Configuration(
                "Reverb needs at least one channel".into(),
            ));
        }
        Ok(())
    }
}
