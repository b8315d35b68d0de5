//! Ray tracing interface used by the reflection simulator.

use crate::math::Vec3;

/// Closest intersection found along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub hit: bool,

    /// Distance from the ray origin to the hit point. Only meaningful if
    /// `hit` is true.
    pub distance: f32,

    /// Index into the [`MaterialTable`](super::MaterialTable) of the surface
    /// that was hit.
    pub material_index: u8,

    /// Unit surface normal at the hit point.
    pub normal: Vec3,
}

impl RayHit {
    pub fn miss() -> Self {
        Self {
            hit: false,
            distance: f32::INFINITY,
            material_index: 0,
            normal: Vec3::ZERO,
        }
    }

    pub fn new(distance: f32, material_index: u8, normal: Vec3) -> Self {
        Self {
            hit: true,
            distance,
            material_index,
            normal,
        }
    }
}

impl Default for RayHit {
    fn default() -> Self {
        Self::miss()
    }
}

/// Scene geometry queries.
///
/// Implementations are shared between simulation worker threads, so they
/// must be `Send + Sync` and answer queries through `&self`.
///
/// # Example
///
/// ```
/// use petalsonic_acoustics::math::Vec3;
/// use petalsonic_acoustics::scene::{RayHit, RayTracer};
///
/// /// An infinite floor at y = 0.
/// struct Floor;
///
/// impl RayTracer for Floor {
///     fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> RayHit {
///         if direction.y >= 0.0 {
///             return RayHit::miss();
///         }
///         let t = -origin.y / direction.y;
///         if t > max_distance {
///             return RayHit::miss();
///         }
///         RayHit::new(t, 0, Vec3::Y)
///     }
/// }
///
/// let hit = Floor.cast_ray(Vec3::new(0.0, 2.0, 0.0), -Vec3::Y, 10.0);
/// assert!(hit.hit);
/// assert_eq!(hit.distance, 2.0);
/// ```
pub trait RayTracer: Send + Sync {
    /// Closest hit along `direction` (unit length) within `max_distance`.
    ///
    /// Normals should face the side the ray arrived from or outward; the
    /// simulator flips them as needed.
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> RayHit;

    /// Whether any geometry lies strictly between `from` and `to`.
    fn is_occluded(&self, from: Vec3, to: Vec3) -> bool {
        let delta = to - from;
        let distance = delta.length();
        if distance <= f32::EPSILON {
            return false;
        }
        self.cast_ray(from, delta / distance, distance).hit
    }
}
