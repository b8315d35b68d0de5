use super::ReverbParams;
use crate::bands::Bands;
use crate::energy_field::{BIN_DURATION, EnergyHistogram};
use crate::error::Result;

/// Energy below this in a band means the band has no reverb.
const MIN_TOTAL_ENERGY: f32 = 1e-4;

/// Range of the normalized decay curve, in log10 units (-5 dB to -25 dB),
/// used for the line fit.
const FIT_RANGE: std::ops::RangeInclusive<f32> = -2.5..=-0.5;

/// Frequency-dependent attenuation of sound travelling through air.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirAbsorption {
    /// Exponential decay per metre at [low, mid, high].
    pub coefficients: [f32; 3],
}

impl Default for AirAbsorption {
    fn default() -> Self {
        Self {
            coefficients: [0.0002, 0.0017, 0.0182],
        }
    }
}

impl AirAbsorption {
    pub fn new(coefficients: [f32; 3]) -> Self {
        Self { coefficients }
    }

    /// Fraction of energy left after `distance` metres in `band`.
    pub fn evaluate(&self, distance: f32, bands: &Bands, band: usize) -> f32 {
        (-self.coefficients[bands.reference_band(band)] * distance).exp()
    }
}

/// Derives per-band decay times from a simulated energy field.
///
/// For every band, the omnidirectional energy is integrated backwards into
/// a Schroeder decay curve, a line is fitted to the part of the curve between
/// -5 and -25 dB, and the time for that line to fall by 60 dB is reported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbEstimator {
    air_absorption: Option<AirAbsorption>,
    speed_of_sound: f32,
}

impl Default for ReverbEstimator {
    fn default() -> Self {
        Self {
            air_absorption: None,
            speed_of_sound: 343.0,
        }
    }
}

impl ReverbEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Weights each bin by the air absorption over the distance sound
    /// travels in that bin's arrival time.
    pub fn air_absorption(mut self, air_absorption: AirAbsorption) -> Self {
        self.air_absorption = Some(air_absorption);
        self
    }

    pub fn speed_of_sound(mut self, speed: f32) -> Self {
        self.speed_of_sound = speed;
        self
    }

    /// # Errors
    ///
    /// Returns [`AcousticsError::BandModelMismatch`](crate::AcousticsError::BandModelMismatch)
    /// if `histogram` was recorded with a different band layout than `bands`.
    pub fn estimate(&self, histogram: &EnergyHistogram, bands: &Bands) -> Result<ReverbParams> {
        bands.ensure_compatible(&histogram.bands())?;

        let decay_times = (0..bands.num_bands())
            .map(|band| self.decay_time(histogram.band(band, 0), bands, band))
            .collect();

        let params = ReverbParams::new(bands.layout(), decay_times)?;
        log::debug!("Estimated decay times: {:?}", params.decay_times());
        Ok(params)
    }

    fn weight(&self, bin: usize, bands: &Bands, band: usize) -> f32 {
        match &self.air_absorption {
            Some(air) => {
                let time = (bin as f32 + 0.5) * BIN_DURATION;
                air.evaluate(time * self.speed_of_sound, bands, band)
            }
            None => 1.0,
        }
    }

    fn decay_time(&self, histogram: &[f32], bands: &Bands, band: usize) -> f32 {
        let total: f32 = histogram
            .iter()
            .enumerate()
            .map(|(bin, &e)| e * self.weight(bin, bands, band))
            .sum();

        if total < MIN_TOTAL_ENERGY {
            return 0.0;
        }

        let mut remaining = 0.0f32;
        let (mut n, mut sum_x, mut sum_y, mut sum_xx, mut sum_xy) = (0.0f32, 0.0, 0.0, 0.0, 0.0);

        for (bin, &e) in histogram.iter().enumerate().rev() {
            remaining += e * self.weight(bin, bands, band);
            if remaining <= 0.0 {
                continue;
            }

            let y = (remaining / total).log10();
            if FIT_RANGE.contains(&y) {
                let x = bin as f32 * BIN_DURATION;
                n += 1.0;
                sum_x += x;
                sum_y += y;
                sum_xx += x * x;
                sum_xy += x * y;
            }
        }

        let numerator = n * sum_xy - sum_x * sum_y;
        let denominator = n * sum_xx - sum_x * sum_x;

        if n < 2.0 || numerator.abs() <= f32::MIN_POSITIVE || denominator <= 0.0 {
            return 0.0;
        }

        // T is where the fitted line reaches -6 (60 dB in log10 energy).
        (-6.0 * denominator / numerator).max(0.0)
    }
}
