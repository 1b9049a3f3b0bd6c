use crate::types::{Mat4, Quat, Vec3, translation_of};

/// Fold a world-space pose change produced by the simulation back into a local matrix.
///
/// Steps, in this exact order:
/// 1. strip the local translation,
/// 2. remove the original world rotation (`R_orig⁻¹`),
/// 3. apply the new world rotation (`R_new`),
/// 4. re-apply the original local translation plus the world delta
///    `new_position - original_position`.
///
/// `new_local = T(t_local + delta) · R_new · R_orig⁻¹ · L_stripped`
///
/// The rotation change is applied on the outside of the stripped local matrix, so the local
/// scale (applied first) survives verbatim, non-uniform or not. No parent transform is
/// needed: for parents that only translate, the owner's world pose after the write equals
/// `(new_position, new_rotation)` exactly. Rotated or scaled parents are approximated.
///
/// Reordering these steps changes the result and accumulates drift frame over frame.
pub fn reproject(
    local: &Mat4,
    original_rotation: &Quat,
    original_position: &Vec3,
    new_rotation: &Quat,
    new_position: &Vec3,
) -> Mat4 {
    let local_translation = translation_of(local);

    let mut stripped = *local;
    stripped.fixed_view_mut::<3, 1>(0, 3).fill(0.0);

    let reoriented = new_rotation.to_homogeneous()
        * original_rotation.inverse().to_homogeneous()
        * stripped;

    let delta = new_position - original_position;
    Mat4::new_translation(&(local_translation + delta)) * reoriented
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{WorldPose, compose_local, scale_of};
    use approx::assert_relative_eq;

    #[test]
    fn unchanged_pose_leaves_local_untouched() {
        let local = compose_local(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_euler_angles(0.2, 0.4, -0.1),
            Vec3::new(2.0, 1.0, 0.5),
        );
        let rotation = Quat::from_euler_angles(0.5, -0.3, 0.9);
        let position = Vec3::new(4.0, 5.0, 6.0);

        let out = reproject(&local, &rotation, &position, &rotation, &position);

        assert_relative_eq!(out, local, epsilon = 1.0e-5);
    }

    #[test]
    fn translation_delta_is_added_to_local_offset() {
        // Parent sits at (10, 0, 0); local offset (1, 2, 3) puts the owner at (11, 2, 3).
        let local = Mat4::new_translation(&Vec3::new(1.0, 2.0, 3.0));
        let original = Vec3::new(11.0, 2.0, 3.0);
        let moved = Vec3::new(11.0, 1.5, 3.25);

        let out = reproject(&local, &Quat::identity(), &original, &Quat::identity(), &moved);

        assert_relative_eq!(
            translation_of(&out),
            Vec3::new(1.0, 1.5, 3.25),
            epsilon = 1.0e-6
        );
    }

    #[test]
    fn non_uniform_scale_survives_rotation_change() {
        let scale = Vec3::new(3.0, 0.5, 2.0);
        let local_rotation = Quat::from_axis_angle(&Vec3::x_axis(), 0.3);
        let local = compose_local(Vec3::new(0.0, 1.0, 0.0), local_rotation, scale);
        let new_rotation = local_rotation * Quat::from_axis_angle(&Vec3::z_axis(), 0.7);

        let out = reproject(
            &local,
            &local_rotation,
            &Vec3::new(0.0, 1.0, 0.0),
            &new_rotation,
            &Vec3::new(0.0, 1.0, 0.0),
        );

        assert_relative_eq!(scale_of(&out), scale, epsilon = 1.0e-5);
        let pose = WorldPose::from_matrix(&out);
        assert!(pose.rotation.angle_to(&new_rotation) < 1.0e-3);
    }

    #[test]
    fn translating_parent_yields_exact_world_pose() {
        let parent = Mat4::new_translation(&Vec3::new(-4.0, 2.0, 7.0));
        let local = compose_local(
            Vec3::new(1.0, 0.0, 0.0),
            Quat::from_axis_angle(&Vec3::y_axis(), 0.4),
            Vec3::new(1.0, 2.0, 1.0),
        );
        let original = WorldPose::from_matrix(&(parent * local));
        let target = WorldPose::new(
            Vec3::new(-2.5, 1.0, 7.5),
            Quat::from_euler_angles(0.1, 0.9, 0.2),
        );

        let out = reproject(
            &local,
            &original.rotation,
            &original.position,
            &target.rotation,
            &target.position,
        );
        let world = WorldPose::from_matrix(&(parent * out));

        assert_relative_eq!(world.position, target.position, epsilon = 1.0e-5);
        assert!(world.rotation.angle_to(&target.rotation) < 1.0e-3);
    }
}
