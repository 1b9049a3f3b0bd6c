/*!
Core math types shared by the synchronization modules.

This module intentionally contains no synchronization logic. It defines the data exchanged
between:
- transform owners (scene-side local matrices and derived world poses)
- the pose cache (last committed world poses)
- the backend (Rapier body translation/rotation)
- reprojection (world delta -> local matrix)

Conventions
- Column vectors: a point is transformed as `M * p`, and a local matrix composes as
  `T * R * S` (scale first, then rotation, then translation).
- World poses carry no scale. Scale only ever lives in local matrices.
*/

use nalgebra as na;

/// Common math aliases for clarity and consistency.
pub type Vec3 = na::Vector3<f32>;
pub type Quat = na::UnitQuaternion<f32>;
pub type Mat4 = na::Matrix4<f32>;
pub type Iso = na::Isometry3<f32>;

/// A world-space position and orientation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldPose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl WorldPose {
    #[inline]
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    #[inline]
    pub fn identity() -> Self {
        Self::new(Vec3::zeros(), Quat::identity())
    }

    /// Extract the world pose of a composed (final) transform matrix.
    ///
    /// Translation is the last column. Rotation comes from the upper-left 3x3 with each
    /// column normalized, which strips positive scale. Shear (rotated parents with
    /// non-uniform scale) is not representable and is approximated.
    pub fn from_matrix(m: &Mat4) -> Self {
        let position = translation_of(m);

        let mut linear: na::Matrix3<f32> = m.fixed_view::<3, 3>(0, 0).into_owned();
        for mut column in linear.column_iter_mut() {
            column.normalize_mut();
        }
        let rotation =
            Quat::from_rotation_matrix(&na::Rotation3::from_matrix_unchecked(linear));

        Self { position, rotation }
    }

    /// Convert to nalgebra `Isometry3` for use with Rapier.
    #[inline]
    pub fn iso(&self) -> Iso {
        Iso::from_parts(na::Translation3::from(self.position), self.rotation)
    }
}

impl From<&Iso> for WorldPose {
    fn from(iso: &Iso) -> Self {
        Self::new(iso.translation.vector, iso.rotation)
    }
}

/// Build a local matrix `T * R * S` from its parts.
#[inline]
pub fn compose_local(translation: Vec3, rotation: Quat, scale: Vec3) -> Mat4 {
    Mat4::new_translation(&translation)
        * rotation.to_homogeneous()
        * Mat4::new_nonuniform_scaling(&scale)
}

/// Translation column of an affine matrix.
#[inline]
pub fn translation_of(m: &Mat4) -> Vec3 {
    Vec3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)])
}

/// Per-axis scale of an affine matrix (lengths of the basis columns).
#[inline]
pub fn scale_of(m: &Mat4) -> Vec3 {
    let linear = m.fixed_view::<3, 3>(0, 0);
    Vec3::new(
        linear.column(0).norm(),
        linear.column(1).norm(),
        linear.column(2).norm(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn from_matrix_strips_non_uniform_scale() {
        let rotation = Quat::from_euler_angles(0.1, 0.7, -0.3);
        let m = compose_local(Vec3::new(1.0, 2.0, 3.0), rotation, Vec3::new(2.0, 0.5, 3.0));

        let pose = WorldPose::from_matrix(&m);

        assert_relative_eq!(pose.position, Vec3::new(1.0, 2.0, 3.0), epsilon = 1.0e-6);
        assert!(pose.rotation.angle_to(&rotation) < 1.0e-3);
    }

    #[test]
    fn scale_of_reads_basis_lengths() {
        let m = compose_local(
            Vec3::zeros(),
            Quat::from_axis_angle(&Vec3::y_axis(), 1.2),
            Vec3::new(2.0, 1.0, 0.25),
        );
        assert_relative_eq!(scale_of(&m), Vec3::new(2.0, 1.0, 0.25), epsilon = 1.0e-6);
    }
}
