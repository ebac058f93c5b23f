use glam::{Quat, Vec3};

use crate::math::Easing;

/// Values a tween can interpolate
pub trait Lerp: Copy {
    fn lerp_to(self, other: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp_to(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for Vec3 {
    fn lerp_to(self, other: Self, t: f32) -> Self {
        self.lerp(other, t)
    }
}

impl Lerp for Quat {
    fn lerp_to(self, other: Self, t: f32) -> Self {
        self.slerp(other, t)
    }
}

/// Eased interpolation from one value to another over a fixed duration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween<T: Lerp> {
    pub from: T,
    pub to: T,
    pub elapsed: f32,
    pub duration: f32,
    pub easing: Easing,
}

impl<T: Lerp> Tween<T> {
    pub fn new(from: T, to: T, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            elapsed: 0.0,
            duration,
            easing,
        }
    }

    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }

    pub fn value(&self) -> T {
        self.from.lerp_to(self.to, self.easing.apply(self.progress()))
    }

    /// Advances and returns the eased value
    pub fn step(&mut self, delta: f32) -> T {
        self.elapsed += delta;
        self.value()
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tween_reaches_target() {
        let mut tween = Tween::new(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 2.0, Easing::ExponentialInOut);
        tween.step(1.0);
        assert!((tween.value().x - 5.0).abs() < 1e-4);
        tween.step(1.5);
        assert!(tween.is_finished());
        assert_eq!(tween.value(), Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_zero_duration_is_done() {
        let tween = Tween::new(1.0f32, 3.0, 0.0, Easing::Linear);
        assert!(tween.is_finished());
        assert_eq!(tween.value(), 3.0);
    }

    #[test]
    fn test_quaternion_tween_ends_exactly() {
        let target = Quat::from_rotation_y(1.2);
        let mut tween = Tween::new(Quat::IDENTITY, target, 0.3, Easing::QuadraticInOut);
        tween.step(0.4);
        assert!(tween.value().abs_diff_eq(target, 1e-5));
    }
}
