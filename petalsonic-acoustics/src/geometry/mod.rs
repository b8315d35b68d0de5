//! Geometric primitives used by the ray tracer.
//!
//! Everything here is plain data plus intersection math. None of these types
//! carry hidden state, so they can be shared freely between ray-tracing
//! worker threads.

mod aabb;
mod mesh;
mod ray;
mod sphere;

pub use aabb::Aabb;
pub use mesh::{Mesh, Triangle};
pub use ray::Ray;
pub use sphere::Sphere;
