//! Late reverberation: estimating decay times from simulated energy and
//! rendering them as a real-time effect.

mod effect;
mod estimator;

pub use effect::{EffectState, MAX_DECAY_TIME, ReverbEffect};
pub use estimator::{AirAbsorption, ReverbEstimator};

use crate::bands::{BandLayout, Bands};
use crate::error::{AcousticsError, Result};

/// Per-band reverberation times.
#[derive(Debug, Clone, PartialEq)]
pub struct ReverbParams {
    band_layout: BandLayout,
    /// Seconds for the energy in each band to fall by 60 dB. 0 disables the band.
    decay_times: Vec<f32>,
}

impl ReverbParams {
    /// Fails when `decay_times` does not have one entry per band of `layout`.
    pub fn new(band_layout: BandLayout, decay_times: Vec<f32>) -> Result<Self> {
        let expected = Bands::new(band_layout).num_bands();
        if decay_times.len() != expected {
            return Err(AcousticsError::Configuration(format!(
                "Expected {} decay times for {:?}, got {}",
                expected,
                band_layout,
                decay_times.len()
            )));
        }
        Ok(Self {
            band_layout,
            decay_times,
        })
    }

    /// The same decay time in every band.
    pub fn uniform(band_layout: BandLayout, decay_time: f32) -> Self {
        Self {
            band_layout,
            decay_times: vec![decay_time; Bands::new(band_layout).num_bands()],
        }
    }

    pub fn band_layout(&self) -> BandLayout {
        self.band_layout
    }

    pub fn bands(&self) -> Bands {
        Bands::new(self.band_layout)
    }

    pub fn decay_times(&self) -> &[f32] {
        &self.decay_times
    }

    pub fn decay_time(&self, band: usize) -> f32 {
        self.decay_times[band]
    }

    /// Longest decay time across bands.
    pub fn max_decay_time(&self) -> f32 {
        self.decay_times
            .iter()
            .copied()
            .filter(|t| t.is_finite())
            .fold(0.0, f32::max)
    }
}
