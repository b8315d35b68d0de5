use super::{Aabb, Mesh, Sphere};
use crate::math::Vec3;

/// A half-line with a unit-length direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        debug_assert!(
            (direction.length_squared() - 1.0).abs() < 1e-3,
            "ray direction must be unit length, got {direction}"
        );
        Self { origin, direction }
    }

    /// Builds a ray pointing from `from` towards `to`. Returns `None` when
    /// the two points coincide.
    pub fn between(from: Vec3, to: Vec3) -> Option<Self> {
        let direction = (to - from).try_normalize()?;
        Some(Self {
            origin: from,
            direction,
        })
    }

    /// `origin + t * direction`. `t` is not clamped.
    pub fn point_at_distance(&self, t: f32) -> Vec3 {
        self.origin + t * self.direction
    }

    /// Moller-Trumbore ray/triangle test. Returns the hit distance along the
    /// ray, which may be negative when the triangle lies behind the origin.
    pub fn intersect_triangle(&self, mesh: &Mesh, triangle: usize) -> Option<f32> {
        let v0 = mesh.triangle_vertex(triangle, 0);
        let v1 = mesh.triangle_vertex(triangle, 1);
        let v2 = mesh.triangle_vertex(triangle, 2);

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        let p = self.direction.cross(edge2);
        let determinant = edge1.dot(p);

        // Parallel to the triangle's plane (or degenerate triangle).
        if determinant == 0.0 {
            return None;
        }

        let inverse_determinant = 1.0 / determinant;
        let t = self.origin - v0;

        let u = t.dot(p) * inverse_determinant;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = t.cross(edge1);
        let v = self.direction.dot(q) * inverse_determinant;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        Some(edge2.dot(q) * inverse_determinant)
    }

    /// Slab test against a box, restricted to `[t_min, t_max]`.
    ///
    /// Returns the entry and exit distances of the overlap, if any.
    pub fn intersect_aabb(&self, aabb: &Aabb, t_min: f32, t_max: f32) -> Option<(f32, f32)> {
        let inverse = self.direction.recip();
        let t0 = (aabb.min - self.origin) * inverse;
        let t1 = (aabb.max - self.origin) * inverse;

        let near = t0.min(t1);
        let far = t0.max(t1);

        // NaN components (0 * inf on a slab boundary) are skipped by f32::max/min.
        let enter = t_min.max(near.x).max(near.y).max(near.z);
        let exit = t_max.min(far.x).min(far.y).min(far.z);

        (enter <= exit).then_some((enter, exit))
    }

    /// Distance to the first intersection with a sphere, which is negative
    /// when the origin lies inside the sphere.
    pub fn intersect_sphere(&self, sphere: &Sphere) -> Option<f32> {
        let v = self.origin - sphere.center;
        let b = 2.0 * v.dot(self.direction);
        let c = v.length_squared() - sphere.radius * sphere.radius;
        let discriminant = b * b - 4.0 * c;

        if discriminant < 0.0 {
            return None;
        }

        Some(-0.5 * (b + discriminant.sqrt()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Triangle;

    #[test]
    fn test_point_at_distance_is_at_distance() {
        let origin = Vec3::new(1.0, -2.0, 0.5);
        let direction = Vec3::new(0.3, 0.4, -1.2).normalize();
        let ray = Ray::new(origin, direction);

        for t in [0.0, 0.25, 1.0, 7.5, 100.0] {
            let p = ray.point_at_distance(t);
            assert!((p.distance(origin) - t).abs() <= 1e-4 * t.max(1.0));
        }
    }

    #[test]
    fn test_between_coincident_points() {
        assert!(Ray::between(Vec3::ONE, Vec3::ONE).is_none());
        let ray = Ray::between(Vec3::ZERO, Vec3::new(0.0, 0.0, 4.0)).unwrap();
        assert_eq!(ray.direction, Vec3::Z);
    }

    #[test]
    fn test_triangle_hit_and_miss() {
        let mesh = Mesh::new(
            vec![
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(1.0, -1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            vec![Triangle::new(0, 1, 2)],
        )
        .unwrap();

        let hit = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z);
        let t = hit.intersect_triangle(&mesh, 0).unwrap();
        assert!((t - 5.0).abs() < 1e-5);

        let miss = Ray::new(Vec3::new(3.0, 0.0, 5.0), -Vec3::Z);
        assert!(miss.intersect_triangle(&mesh, 0).is_none());

        let parallel = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::X);
        assert!(parallel.intersect_triangle(&mesh, 0).is_none());
    }

    #[test]
    fn test_aabb_slab() {
        let aabb = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));

        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
        let (enter, exit) = ray.intersect_aabb(&aabb, 0.0, f32::INFINITY).unwrap();
        assert!((enter - 4.0).abs() < 1e-5);
        assert!((exit - 6.0).abs() < 1e-5);

        // Box out of range.
        assert!(ray.intersect_aabb(&aabb, 0.0, 3.0).is_none());

        let away = Ray::new(Vec3::new(-5.0, 0.0, 0.0), -Vec3::X);
        assert!(away.intersect_aabb(&aabb, 0.0, f32::INFINITY).is_none());

        let inside = Ray::new(Vec3::ZERO, Vec3::Y);
        let (enter, exit) = inside.intersect_aabb(&aabb, 0.0, f32::INFINITY).unwrap();
        assert_eq!(enter, 0.0);
        assert!((exit - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_sphere() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -10.0), 2.0);
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        assert!((ray.intersect_sphere(&sphere).unwrap() - 8.0).abs() < 1e-4);

        let miss = Ray::new(Vec3::new(5.0, 0.0, 0.0), -Vec3::Z);
        assert!(miss.intersect_sphere(&sphere).is_none());
    }
}
