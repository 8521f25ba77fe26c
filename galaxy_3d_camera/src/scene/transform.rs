/// Local TRS transform of a scene node.

use glam::{Mat3, Mat4, Quat, Vec3};

/// Translation / rotation / scale, composed as T * R * S.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self { translation, ..Self::IDENTITY }
    }

    /// Transform placed at `eye` whose forward axis (-Z) points at `target`.
    ///
    /// `up` must not be parallel to `target - eye`.
    pub fn looking_at(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        // The view matrix rotation is the inverse (transpose) of the world rotation
        let view = Mat4::look_at_rh(eye, target, up);
        let rotation = Quat::from_mat3(&Mat3::from_mat4(view).transpose()).normalize();
        Self { translation: eye, rotation, scale: Vec3::ONE }
    }

    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Local forward axis (-Z) after rotation.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
