use std::f32::consts::PI;

/// Easing curves used by tweens, all mapping [0, 1] onto [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    QuadraticInOut,
    CubicOut,
    ExponentialInOut,
    SineInOut,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadraticInOut => quadratic_in_out(t),
            Easing::CubicOut => ease_out_cubic(t),
            Easing::ExponentialInOut => exponential_in_out(t),
            Easing::SineInOut => 0.5 * (1.0 - (PI * t).cos()),
        }
    }
}

pub fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

pub fn quadratic_in_out(t: f32) -> f32 {
    let t = t * 2.0;
    if t < 1.0 {
        0.5 * t * t
    } else {
        let t = t - 1.0;
        -0.5 * (t * (t - 2.0) - 1.0)
    }
}

pub fn exponential_in_out(t: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let t = t * 2.0;
    if t < 1.0 {
        0.5 * 1024f32.powf(t - 1.0)
    } else {
        0.5 * (2.0 - 2f32.powf(-10.0 * (t - 1.0)))
    }
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 5] = [
        Easing::Linear,
        Easing::QuadraticInOut,
        Easing::CubicOut,
        Easing::ExponentialInOut,
        Easing::SineInOut,
    ];

    #[test]
    fn test_endpoints_are_fixed() {
        for easing in ALL {
            assert!(easing.apply(0.0).abs() < 1e-3, "{:?} at 0", easing);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-3, "{:?} at 1", easing);
        }
    }

    #[test]
    fn test_in_out_curves_cross_half_at_midpoint() {
        assert!((quadratic_in_out(0.5) - 0.5).abs() < 1e-6);
        assert!((exponential_in_out(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_ease_out_cubic_front_loaded() {
        assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-6);
    }

    #[test]
    fn test_apply_clamps_input() {
        assert_eq!(Easing::Linear.apply(2.0), 1.0);
        assert_eq!(Easing::Linear.apply(-1.0), 0.0);
    }
}
