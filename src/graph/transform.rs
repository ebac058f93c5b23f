use glam::{Mat3, Mat4, Quat, Vec3};

/// Local translation, rotation and scale of a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        Self::from_translation(Vec3::new(x, y, z))
    }

    pub fn from_matrix(matrix: &Mat4) -> Self {
        let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
        Self {
            translation,
            rotation,
            scale,
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// This transform rotated by `rotation` about `pivot`, both in parent space
    pub fn rotated_about(&self, pivot: Vec3, rotation: Quat) -> Transform {
        Transform {
            translation: pivot + rotation * (self.translation - pivot),
            rotation: (rotation * self.rotation).normalize(),
            scale: self.scale,
        }
    }

    /// Orients local +Z toward `target`
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        let forward = target - self.translation;
        if forward.length_squared() < f32::EPSILON {
            return;
        }
        let z = forward.normalize();
        let x = match up.cross(z).try_normalize() {
            Some(x) => x,
            None => z.any_orthonormal_vector(),
        };
        let y = z.cross(x);
        self.rotation = Quat::from_mat3(&Mat3::from_cols(x, y, z));
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_matrix_round_trip_keeps_components() {
        let t = Transform::from_xyz(1.0, 2.0, 3.0)
            .with_rotation(Quat::from_rotation_y(0.5))
            .with_scale(Vec3::splat(2.0));
        let back = Transform::from_matrix(&t.to_matrix());
        assert!(back.translation.abs_diff_eq(t.translation, 1e-5));
        assert!(back.scale.abs_diff_eq(t.scale, 1e-5));
        assert!(back.rotation.abs_diff_eq(t.rotation, 1e-5));
    }

    #[test]
    fn test_rotated_about_pivot_moves_translation() {
        let t = Transform::from_xyz(1.0, 0.0, 0.0);
        let rotated = t.rotated_about(Vec3::ZERO, Quat::from_rotation_y(FRAC_PI_2));
        assert!(rotated.translation.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-5));
    }

    #[test]
    fn test_rotated_about_own_position_only_rotates() {
        let t = Transform::from_xyz(4.0, 1.0, -2.0);
        let rotated = t.rotated_about(t.translation, Quat::from_rotation_x(1.0));
        assert!(rotated.translation.abs_diff_eq(t.translation, 1e-6));
        assert!(rotated.rotation.abs_diff_eq(Quat::from_rotation_x(1.0), 1e-6));
    }

    #[test]
    fn test_look_at_points_z_axis_at_target() {
        let mut t = Transform::from_xyz(0.0, 0.0, 5.0);
        t.look_at(Vec3::ZERO, Vec3::Y);
        let z = t.rotation * Vec3::Z;
        assert!(z.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-5));
    }
}
