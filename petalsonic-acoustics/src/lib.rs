//! # PetalSonic Acoustics
//!
//! Room acoustics for the PetalSonic spatial audio stack: ray-traced energy
//! simulation, reverberation time estimation and a real-time multi-band
//! reverb.
//!
//! ## Quick Start
//!
//! ```no_run
//! use petalsonic_acoustics::*;
//! use petalsonic_acoustics::geometry::Aabb;
//! use petalsonic_acoustics::math::Vec3;
//!
//! // A 6 x 4 x 3 m room with plaster walls.
//! let materials = MaterialTable::with_presets();
//! let mut scene = MeshScene::new();
//! scene.add_box(Aabb::new(Vec3::ZERO, Vec3::new(6.0, 4.0, 3.0)), 7)?;
//!
//! // Trace reflections into an energy field.
//! let settings = SimulationSettings::default().num_rays(8192);
//! let simulator = ReflectionSimulator::new(settings.clone())?;
//! let field = EnergyFieldFactory::create(
//!     settings.energy_field_settings(),
//!     SceneType::Default,
//!     None,
//! )?;
//! let source = SourceDesc::new(Vec3::new(1.5, 1.2, 1.5));
//! simulator.simulate(&scene, &materials, &source, Vec3::new(4.0, 2.0, 1.7), field.as_ref())?;
//!
//! // Estimate decay times and render them.
//! let histogram = field.finalize();
//! let params = ReverbEstimator::new().estimate(&histogram, &settings.bands())?;
//!
//! let audio = AudioSettings::default();
//! let mut reverb = ReverbEffect::new(&audio, &ReverbEffectSettings::default())?;
//! let input = AudioBuffer::new(1, audio.frame_size);
//! let mut output = AudioBuffer::new(2, audio.frame_size);
//! reverb.apply(&params, &input, &mut output)?;
//! # Ok::<(), AcousticsError>(())
//! ```
//!
//! ## Key Components
//!
//! - **[`RayTracer`]**: Scene query trait; [`MeshScene`] is the built-in triangle mesh tracer
//! - **[`ReflectionSimulator`]**: Multi-threaded stochastic ray tracer filling an [`EnergyField`]
//! - **[`EnergyFieldFactory`]**: Chooses between CPU and device-resident energy fields
//! - **[`ReverbEstimator`]**: Turns an [`EnergyHistogram`] into per-band decay times
//! - **[`ReverbEffect`]**: Frame-based multi-band reverb driven by [`ReverbParams`]
//!
//! ## Frequency Bands
//!
//! Every band-sized object is built from a [`BandLayout`] and checks it at
//! its boundaries. Mixing a three-band energy field with an octave-band
//! reverb is reported as [`AcousticsError::BandModelMismatch`] rather than
//! silently misreading data.

pub mod bands;
pub mod config;
pub mod directivity;
pub mod dsp;
pub mod energy_field;
pub mod error;
pub mod geometry;
pub mod math;
pub mod reverb;
pub mod scene;
pub mod sh;
pub mod simulation;

pub use bands::{BandLayout, Bands};
pub use config::{AudioSettings, ReverbEffectSettings, SimulationSettings};
pub use directivity::Directivity;
pub use dsp::AudioBuffer;
pub use energy_field::{
    EnergyField, EnergyFieldBackend, EnergyFieldFactory, EnergyFieldSettings, EnergyHistogram,
};
pub use error::{AcousticsError, Result};
pub use reverb::{AirAbsorption, EffectState, ReverbEffect, ReverbEstimator, ReverbParams};
pub use scene::{AcousticMaterial, MaterialTable, MeshScene, RayHit, RayTracer, SceneType};
pub use simulation::{ReflectionSimulator, SimulationStats, SourceDesc};
