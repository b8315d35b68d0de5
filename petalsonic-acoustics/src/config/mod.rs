//! Configuration for PetalSonic Acoustics

mod audio_settings;
mod reverb_settings;
mod simulation_settings;

pub use audio_settings::AudioSettings;
pub use reverb_settings::ReverbEffectSettings;
pub use simulation_settings::SimulationSettings;
