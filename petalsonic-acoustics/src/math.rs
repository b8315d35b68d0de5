//! Math types for PetalSonic Acoustics

pub use glam::{Quat, Vec3};

/// Right-handed Cartesian frame: `right` is local +x, `up` is local +y and
/// `ahead` is local -z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateSpace {
    pub right: Vec3,
    pub up: Vec3,
    pub ahead: Vec3,
    pub origin: Vec3,
}

impl CoordinateSpace {
    /// Canonical frame placed at `origin`.
    pub fn from_origin(origin: Vec3) -> Self {
        Self {
            right: Vec3::X,
            up: Vec3::Y,
            ahead: -Vec3::Z,
            origin,
        }
    }

    /// Builds a frame from two perpendicular unit vectors.
    pub fn new(ahead: Vec3, up: Vec3, origin: Vec3) -> Self {
        Self {
            right: ahead.cross(up),
            up,
            ahead,
            origin,
        }
    }

    /// Picks one of the frames that have `ahead` as an axis.
    ///
    /// Uses the Hughes-Moller construction, which avoids dividing by a small
    /// component of `ahead`.
    pub fn from_ahead(ahead: Vec3, origin: Vec3) -> Self {
        let right = if ahead.x.abs() > ahead.z.abs() {
            Vec3::new(-ahead.y, ahead.x, 0.0).normalize_or_zero()
        } else {
            Vec3::new(0.0, -ahead.z, ahead.y).normalize_or_zero()
        };

        Self {
            right,
            up: right.cross(ahead),
            ahead,
            origin,
        }
    }

    /// Frame of an object placed at `position` and rotated by `rotation`.
    pub fn from_pose(position: Vec3, rotation: Quat) -> Self {
        Self {
            right: rotation * Vec3::X,
            up: rotation * Vec3::Y,
            ahead: rotation * (-Vec3::Z),
            origin: position,
        }
    }

    pub fn direction_to_local(&self, direction: Vec3) -> Vec3 {
        Vec3::new(
            direction.dot(self.right),
            direction.dot(self.up),
            -direction.dot(self.ahead),
        )
    }

    pub fn direction_to_world(&self, direction: Vec3) -> Vec3 {
        direction.x * self.right + direction.y * self.up - direction.z * self.ahead
    }
}

/// Direction `index` of `count` spread evenly over the unit sphere along a
/// Fibonacci spiral.
pub fn fibonacci_sphere_direction(index: usize, count: usize) -> Vec3 {
    let golden_angle = std::f32::consts::PI * (3.0 - 5.0f32.sqrt());
    let z = 1.0 - (2.0 * index as f32 + 1.0) / count as f32;
    let radius = (1.0 - z * z).max(0.0).sqrt();
    let (sin, cos) = (golden_angle * index as f32).sin_cos();
    Vec3::new(radius * cos, radius * sin, z)
}

impl Default for CoordinateSpace {
    fn default() -> Self {
        Self::from_origin(Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_canonical_frame_round_trip() {
        let frame = CoordinateSpace::default();
        let d = Vec3::new(0.3, -0.2, 0.9).normalize();
        assert!(approx_eq(frame.direction_to_local(d), d));
        assert!(approx_eq(frame.direction_to_world(d), d));
    }

    #[test]
    fn test_from_ahead_is_orthonormal() {
        let ahead = Vec3::new(1.0, 2.0, -0.5).normalize();
        let frame = CoordinateSpace::from_ahead(ahead, Vec3::ZERO);
        assert!(frame.right.dot(frame.up).abs() < 1e-5);
        assert!(frame.right.dot(frame.ahead).abs() < 1e-5);
        assert!((frame.up.length() - 1.0).abs() < 1e-5);

        // Ahead maps to local -z.
        assert!(approx_eq(frame.direction_to_local(ahead), -Vec3::Z));
    }

    #[test]
    fn test_from_pose_matches_rotation() {
        let rotation = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let frame = CoordinateSpace::from_pose(Vec3::ONE, rotation);
        assert!(approx_eq(frame.ahead, rotation * -Vec3::Z));
        let local = frame.direction_to_local(frame.ahead);
        assert!(approx_eq(local, -Vec3::Z));
        assert!(approx_eq(frame.direction_to_world(local), frame.ahead));
    }

    #[test]
    fn test_fibonacci_directions_are_unit_and_balanced() {
        let count = 1000;
        let mut sum = Vec3::ZERO;
        for i in 0..count {
            let d = fibonacci_sphere_direction(i, count);
            assert!((d.length() - 1.0).abs() < 1e-4);
            sum += d;
        }
        assert!(sum.length() / (count as f32) < 0.01);
    }
}
