use glam::Vec3;

use super::AABB;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Distance to the box along the ray, `None` on a miss
    pub fn hit_aabb(&self, bounds: &AABB) -> Option<f32> {
        let t = intersect_aabb(self.origin, self.direction, bounds.min, bounds.max);
        (t >= 0.0).then_some(t)
    }
}

/// Slab test; returns the entry distance, the exit distance when the origin is
/// inside, or -1.0 on a miss
pub fn intersect_aabb(ray_origin: Vec3, ray_dir: Vec3, box_min: Vec3, box_max: Vec3) -> f32 {
    const EPSILON: f32 = 1e-8;

    // Near-zero components are clamped so the slab bounds go to +/- infinity
    let inv_dir = Vec3::new(
        if ray_dir.x.abs() < EPSILON { 1.0 / EPSILON.copysign(ray_dir.x) } else { 1.0 / ray_dir.x },
        if ray_dir.y.abs() < EPSILON { 1.0 / EPSILON.copysign(ray_dir.y) } else { 1.0 / ray_dir.y },
        if ray_dir.z.abs() < EPSILON { 1.0 / EPSILON.copysign(ray_dir.z) } else { 1.0 / ray_dir.z },
    );

    let t_min = (box_min - ray_origin) * inv_dir;
    let t_max = (box_max - ray_origin) * inv_dir;

    let t1 = t_min.min(t_max);
    let t2 = t_min.max(t_max);

    let t_near = t1.x.max(t1.y).max(t1.z);
    let t_far = t2.x.min(t2.y).min(t2.z);

    if t_near > t_far || t_far < 0.0 {
        return -1.0;
    }

    if t_near < 0.0 {
        if t_far > 0.001 {
            t_far
        } else {
            -1.0
        }
    } else {
        t_near
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersect_aabb_hit() {
        let t = intersect_aabb(
            Vec3::ZERO,
            Vec3::X,
            Vec3::new(5.0, -1.0, -1.0),
            Vec3::new(10.0, 1.0, 1.0),
        );
        assert!((t - 5.0).abs() < 0.01);
    }

    #[test]
    fn test_intersect_aabb_miss() {
        let t = intersect_aabb(
            Vec3::ZERO,
            Vec3::X,
            Vec3::new(5.0, 2.0, 2.0),
            Vec3::new(10.0, 3.0, 3.0),
        );
        assert!(t < 0.0);
    }

    #[test]
    fn test_ray_hit_aabb_option() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -2.0));
        let bounds = AABB::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let t = ray.hit_aabb(&bounds).unwrap();
        assert!((t - 9.0).abs() < 1e-4);
        assert!((ray.at(t).z - 1.0).abs() < 1e-4);

        let away = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::Z);
        assert!(away.hit_aabb(&bounds).is_none());
    }
}
