//! Propagation simulation: fills energy fields by tracing rays through a
//! scene.

mod reflection;

pub use reflection::{ReflectionSimulator, SimulationStats, SourceDesc};
