use crate::math::Vec3;

/// An axis-aligned box given by its minimum and maximum corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        debug_assert!(
            min.cmple(max).all(),
            "box corners out of order: min {min}, max {max}"
        );
        Self { min, max }
    }

    /// A box that contains no points: min at +inf, max at -inf.
    ///
    /// Growing an empty box by a point yields the degenerate box around that point.
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    pub fn grow(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn extents(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn surface_area(&self) -> f32 {
        let e = self.extents();
        2.0 * (e.x * e.y + e.y * e.z + e.z * e.x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_cube() {
        let cube = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert_eq!(cube.surface_area(), 6.0);
        assert_eq!(cube.center(), Vec3::splat(0.5));
        assert_eq!(cube.extents(), Vec3::ONE);
    }

    #[test]
    fn test_offset_box() {
        let b = Aabb::new(Vec3::new(-1.0, 2.0, 3.0), Vec3::new(1.0, 5.0, 4.0));
        assert_eq!(b.center(), Vec3::new(0.0, 3.5, 3.5));
        assert_eq!(b.extents(), Vec3::new(2.0, 3.0, 1.0));
        // 2 * (2*3 + 3*1 + 1*2)
        assert_eq!(b.surface_area(), 22.0);
        assert!(b.surface_area() >= 0.0);
    }

    #[test]
    fn test_flat_box_has_non_negative_area() {
        let b = Aabb::new(Vec3::ZERO, Vec3::new(4.0, 0.0, 2.0));
        assert_eq!(b.surface_area(), 16.0);

        let point = Aabb::new(Vec3::ONE, Vec3::ONE);
        assert_eq!(point.surface_area(), 0.0);
    }

    #[test]
    fn test_empty_and_grow() {
        let mut b = Aabb::empty();
        assert!(b.is_empty());
        assert!(!b.contains(Vec3::ZERO));

        b.grow(Vec3::new(1.0, -1.0, 0.0));
        b.grow(Vec3::new(-1.0, 1.0, 2.0));
        assert!(!b.is_empty());
        assert_eq!(b.min, Vec3::new(-1.0, -1.0, 0.0));
        assert_eq!(b.max, Vec3::new(1.0, 1.0, 2.0));
        assert!(b.contains(Vec3::new(0.0, 0.0, 1.0)));
        assert!(!b.contains(Vec3::new(0.0, 0.0, 3.0)));
    }
}
