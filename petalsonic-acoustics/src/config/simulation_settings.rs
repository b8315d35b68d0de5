use crate::bands::{BandLayout, Bands};
use crate::energy_field::EnergyFieldSettings;
use crate::error::{AcousticsError, Result};

/// Parameters of a reflection simulation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationSettings {
    /// Length of the simulated impulse response, in seconds.
    pub duration: f32,
    /// Spherical harmonic order of the directional terms.
    pub order: u32,
    pub band_layout: BandLayout,
    /// Rays traced from the listener per simulation.
    pub num_rays: usize,
    /// Maximum reflections followed per ray.
    pub num_bounces: usize,
    /// Worker threads; 1 traces on the calling thread.
    pub num_threads: usize,
    /// Metres per second.
    pub speed_of_sound: f32,
    /// Seed of the per-ray random streams. Equal seeds give equal results.
    pub seed: u64,
    /// Distances below this are clamped when applying distance attenuation.
    pub min_distance: f32,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            duration: 2.0,
            order: 1,
            band_layout: BandLayout::default(),
            num_rays: 4096,
            num_bounces: 16,
            num_threads: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            speed_of_sound: 343.0,
            seed: 0,
            min_distance: 1.0,
        }
    }
}

impl SimulationSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duration(mut self, seconds: f32) -> Self {
        self.duration = seconds;
        self
    }

    pub fn order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }

    pub fn band_layout(mut self, layout: BandLayout) -> Self {
        self.band_layout = layout;
        self
    }

    pub fn num_rays(mut self, rays: usize) -> Self {
        self.num_rays = rays;
        self
    }

    pub fn num_bounces(mut self, bounces: usize) -> Self {
        self.num_bounces = bounces;
        self
    }

    pub fn num_threads(mut self, threads: usize) -> Self {
        self.num_threads = threads;
        self
    }

    pub fn speed_of_sound(mut self, speed: f32) -> Self {
        self.speed_of_sound = speed;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn min_distance(mut self, distance: f32) -> Self {
        self.min_distance = distance;
        self
    }

    pub fn bands(&self) -> Bands {
        Bands::new(self.band_layout)
    }

    /// Settings for an energy field that can hold this simulation's output.
    pub fn energy_field_settings(&self) -> EnergyFieldSettings {
        EnergyFieldSettings::new(self.duration, self.order, self.band_layout)
    }

    pub fn validate(&self) -> Result<()> {
        self.energy_field_settings().validate()?;

        if self.num_rays == 0 {
            return Err(AcousticsError::Configuration(
                "At least one ray is required".into(),
            ));
        }
        if self.num_threads == 0 {
            return Err(AcousticsError::Configuration(
                "At least one thread is required".into(),
            ));
        }
        if !self.speed_of_sound.is_finite() || self.speed_of_sound <= 0.0 {
            return Err(AcousticsError::Configuration(format!(
                "Speed of sound must be positive, got {}",
                self.speed_of_sound
            )));
        }
        if !self.min_distance.is_finite() || self.min_distance <= 0.0 {
            return Err(AcousticsError::Configuration(format!(
                "Minimum distance must be positive, got {}",
                self.min_distance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let settings = SimulationSettings::new()
            .duration(1.5)
            .order(2)
            .band_layout(BandLayout::Octave)
            .num_rays(100)
            .num_bounces(4)
            .num_threads(2)
            .seed(42);
        assert!(settings.validate().is_ok());

        let field = settings.energy_field_settings();
        assert_eq!(field.duration, 1.5);
        assert_eq!(field.order, 2);
        assert_eq!(field.num_terms(), 9);
        assert_eq!(settings.bands().num_bands(), 10);
    }

    #[test]
    fn test_validation() {
        assert!(SimulationSettings::default().validate().is_ok());
        assert!(SimulationSettings::new().num_rays(0).validate().is_err());
        assert!(SimulationSettings::new().num_threads(0).validate().is_err());
        assert!(SimulationSettings::new().speed_of_sound(0.0).validate().is_err());
        assert!(SimulationSettings::new().duration(0.0).validate().is_err());
        assert!(SimulationSettings::new().order(4).validate().is_err());
        assert!(SimulationSettings::new().min_distance(-1.0).validate().is_err());
    }
}
