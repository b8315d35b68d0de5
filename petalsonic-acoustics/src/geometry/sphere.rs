use crate::math::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        debug_assert!(radius >= 0.0, "negative sphere radius {radius}");
        Self {
            center,
            radius: radius.max(0.0),
        }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        (point - self.center).length_squared() <= self.radius * self.radius
    }

    /// Smallest sphere enclosing both `a` and `b`.
    pub fn bounding(a: &Sphere, b: &Sphere) -> Sphere {
        let between = a.center - b.center;
        let dist_sq = between.length_squared();
        let radii_diff = a.radius - b.radius;

        // One sphere already encloses the other.
        if dist_sq <= radii_diff * radii_diff {
            return if a.radius >= b.radius { *a } else { *b };
        }

        let radius = (a.radius + b.radius + dist_sq.sqrt()) * 0.5;
        let axis = between.normalize();
        Sphere {
            center: b.center + axis * (radius - b.radius),
            radius,
        }
    }
}

impl Default for Sphere {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            radius: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains() {
        let s = Sphere::new(Vec3::new(1.0, 0.0, 0.0), 2.0);
        assert!(s.contains(Vec3::new(3.0, 0.0, 0.0)));
        assert!(s.contains(Vec3::new(1.0, 1.0, 1.0)));
        assert!(!s.contains(Vec3::new(-1.5, 0.0, 0.0)));
    }

    #[test]
    fn test_bounding_disjoint() {
        let a = Sphere::new(Vec3::new(-2.0, 0.0, 0.0), 1.0);
        let b = Sphere::new(Vec3::new(2.0, 0.0, 0.0), 1.0);
        let s = Sphere::bounding(&a, &b);
        assert!((s.radius - 3.0).abs() < 1e-5);
        assert!(s.center.length() < 1e-5);
    }

    #[test]
    fn test_bounding_nested() {
        let big = Sphere::new(Vec3::ZERO, 5.0);
        let small = Sphere::new(Vec3::new(1.0, 0.0, 0.0), 1.0);
        assert_eq!(Sphere::bounding(&small, &big), big);
        assert_eq!(Sphere::bounding(&big, &small), big);
    }
}
