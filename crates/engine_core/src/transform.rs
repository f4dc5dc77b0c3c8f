//! Transform component and utilities for spatial positioning.

use glam::{Mat3, Quat, Vec3};

/// Directions shorter than this are treated as degenerate.
const MIN_DIRECTION_LENGTH_SQ: f32 = 1.0e-8;

/// A 3D transform representing position, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform with position and rotation.
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Create a new transform with a uniform scale (planets, moons).
    pub fn from_position_scale(position: Vec3, scale: f32) -> Self {
        Self {
            position,
            scale: Vec3::splat(scale),
            ..Default::default()
        }
    }

    /// Get the forward direction (negative Z in right-handed coordinates).
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// Get the right direction (positive X).
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Get the up direction (positive Y).
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }
}

/// Rotation whose forward axis (-Z) points along `forward` and whose up axis
/// (+Y) is as close to `up` as possible.
///
/// Returns `None` for a zero-length `forward`. When `forward` is parallel to
/// `up`, an arbitrary perpendicular up is used instead.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Option<Quat> {
    if forward.length_squared() < MIN_DIRECTION_LENGTH_SQ {
        return None;
    }
    let f = forward.normalize();
    let mut right = f.cross(up);
    if right.length_squared() < MIN_DIRECTION_LENGTH_SQ {
        right = f.cross(f.any_orthonormal_vector());
    }
    let right = right.normalize();
    let true_up = right.cross(f);
    Some(Quat::from_mat3(&Mat3::from_cols(right, true_up, -f)).normalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1.0e-4
    }

    #[test]
    fn identity_axes() {
        let t = Transform::default();
        assert!(approx(t.forward(), -Vec3::Z));
        assert!(approx(t.right(), Vec3::X));
        assert!(approx(t.up(), Vec3::Y));
    }

    #[test]
    fn look_rotation_default_forward_is_identity() {
        let q = look_rotation(-Vec3::Z, Vec3::Y).unwrap();
        assert!(q.angle_between(Quat::IDENTITY) < 1.0e-4);
    }

    #[test]
    fn look_rotation_points_forward_and_keeps_up() {
        let dir = Vec3::new(1.0, 0.0, 1.0).normalize();
        let q = look_rotation(dir, Vec3::Y).unwrap();
        assert!(approx(q * -Vec3::Z, dir));
        assert!(approx(q * Vec3::Y, Vec3::Y));
    }

    #[test]
    fn look_rotation_parallel_up_still_points_forward() {
        let q = look_rotation(Vec3::Y, Vec3::Y).unwrap();
        assert!(approx(q * -Vec3::Z, Vec3::Y));
    }

    #[test]
    fn look_rotation_rejects_zero_forward() {
        assert!(look_rotation(Vec3::ZERO, Vec3::Y).is_none());
    }
}
