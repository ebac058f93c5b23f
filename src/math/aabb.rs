use glam::{Mat4, Vec3};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AABB {
    pub min: Vec3,
    pub max: Vec3,
}

impl AABB {
    /// Inverted box that any union or extend replaces
    pub const EMPTY: AABB = AABB {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        points
            .into_iter()
            .fold(Self::EMPTY, |bounds, p| bounds.extended(p))
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn union(&self, other: &AABB) -> AABB {
        AABB {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn extended(&self, point: Vec3) -> AABB {
        AABB {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn contains_point(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    pub fn intersects(&self, other: &AABB) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }

    /// Axis-aligned bounds of this box after an affine transform
    pub fn transformed(&self, matrix: &Mat4) -> AABB {
        if self.is_empty() {
            return *self;
        }
        AABB::from_points(self.corners().map(|c| matrix.transform_point3(c)))
    }
}

impl Default for AABB {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_center() {
        let aabb = AABB::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(aabb.center(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_aabb_union_non_overlapping() {
        let aabb1 = AABB::new(Vec3::ZERO, Vec3::ONE);
        let aabb2 = AABB::new(Vec3::splat(2.0), Vec3::splat(3.0));
        let union = aabb1.union(&aabb2);
        assert_eq!(union.min, Vec3::ZERO);
        assert_eq!(union.max, Vec3::splat(3.0));
    }

    #[test]
    fn test_empty_is_identity_for_union() {
        let aabb = AABB::new(Vec3::new(-1.0, 0.0, 2.0), Vec3::new(1.0, 3.0, 4.0));
        assert_eq!(AABB::EMPTY.union(&aabb), aabb);
        assert!(AABB::EMPTY.is_empty());
        assert!(!aabb.is_empty());
    }

    #[test]
    fn test_from_center_size() {
        let aabb = AABB::from_center_size(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.5, 1.0, 0.5));
        assert_eq!(aabb.min, Vec3::new(-0.25, 0.5, -0.25));
        assert_eq!(aabb.max, Vec3::new(0.25, 1.5, 0.25));
    }

    #[test]
    fn test_intersects_touching_and_apart() {
        let a = AABB::new(Vec3::ZERO, Vec3::ONE);
        let touching = AABB::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        let apart = AABB::new(Vec3::new(1.5, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        assert!(a.intersects(&touching));
        assert!(!a.intersects(&apart));
    }

    #[test]
    fn test_transformed_by_rotation_grows_box() {
        let aabb = AABB::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let rotated = aabb.transformed(&Mat4::from_rotation_y(std::f32::consts::FRAC_PI_4));
        let expected = std::f32::consts::SQRT_2;
        assert!((rotated.max.x - expected).abs() < 1e-5);
        assert!((rotated.max.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_transformed_by_translation() {
        let aabb = AABB::new(Vec3::ZERO, Vec3::ONE);
        let moved = aabb.transformed(&Mat4::from_translation(Vec3::new(5.0, 0.0, -2.0)));
        assert_eq!(moved.min, Vec3::new(5.0, 0.0, -2.0));
        assert_eq!(moved.max, Vec3::new(6.0, 1.0, -1.0));
    }
}
