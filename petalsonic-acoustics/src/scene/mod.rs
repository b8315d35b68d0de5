//! Scene description for acoustic simulation: surfaces, their materials and
//! the ray tracer that queries them.

pub mod material;
pub mod mesh_scene;
pub mod ray_tracer;

pub use material::{AcousticMaterial, MaterialTable};
pub use mesh_scene::MeshScene;
pub use ray_tracer::{RayHit, RayTracer};

/// Which ray tracing backend a scene uses. Also decides where energy fields
/// for the scene are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SceneType {
    /// The built-in [`MeshScene`] tracer.
    #[default]
    Default,
    /// A user-supplied [`RayTracer`].
    Custom,
    /// Tracing on a compute device.
    Accelerated,
}
