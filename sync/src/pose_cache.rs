/*!
Per-body cache of the last committed world pose, plus the override predicates that read it.

The cache is the only signal that separates "the simulation moved this body" from
"something external moved the owner": if the owner's world pose still matches what the
engine committed at the end of last frame, physics is trusted; otherwise the external pose
wins and is written into the body.

Lifecycle
- Cleared in full right after pre-step reconciliation.
- Refilled from the post-step body poses during reprojection.
- A missing entry means "no prior frame observed" and always counts as an override.
*/

use std::collections::HashMap;

use crate::constants::OVERRIDE_EPSILON;
use crate::registry::BodyId;
use crate::types::{Quat, Vec3, WorldPose};

#[derive(Debug, Default)]
pub struct PoseCache {
    poses: HashMap<BodyId, WorldPose>,
}

impl PoseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: BodyId) -> Option<&WorldPose> {
        self.poses.get(&id)
    }

    pub fn insert(&mut self, id: BodyId, pose: WorldPose) {
        self.poses.insert(id, pose);
    }

    pub fn remove(&mut self, id: BodyId) -> Option<WorldPose> {
        self.poses.remove(&id)
    }

    pub fn clear(&mut self) {
        self.poses.clear();
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }
}

/// Orientation closeness proxy: `1 - dot(normalize(a), normalize(b))` over the raw quaternion
/// components.
///
/// 0 when identical, approaching 2 for opposite quaternions. This is not an angle, and `q`
/// vs `-q` reads as far apart even though they are the same rotation; see
/// [`same_hemisphere`]. The override epsilon is tuned against exactly this value.
#[inline]
pub fn rotation_closeness(a: &Quat, b: &Quat) -> f32 {
    1.0 - a.quaternion().normalize().dot(&b.quaternion().normalize())
}

/// Does the owner's current world position count as an external override?
#[inline]
pub fn position_overridden(cached: Option<&Vec3>, current: &Vec3) -> bool {
    match cached {
        None => true,
        Some(last) => (current - last).norm_squared() > OVERRIDE_EPSILON,
    }
}

/// `q` or `-q`, whichever lies in the same hemisphere as `reference`.
///
/// Rapier integrates its own quaternion while owner rotations are re-extracted from
/// matrices, so the two sides of a comparison may carry opposite signs for the same
/// rotation.
#[inline]
pub fn same_hemisphere(reference: &Quat, q: &Quat) -> Quat {
    if reference.coords.dot(&q.coords) < 0.0 {
        Quat::new_unchecked(-q.into_inner())
    } else {
        *q
    }
}

/// Does the owner's current world rotation count as an external override?
///
/// `current` is brought into the cached quaternion's hemisphere before measuring closeness.
#[inline]
pub fn rotation_overridden(cached: Option<&Quat>, current: &Quat) -> bool {
    match cached {
        None => true,
        Some(last) => {
            rotation_closeness(last, &same_hemisphere(last, current)) > OVERRIDE_EPSILON
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_entry_always_overrides() {
        assert!(position_overridden(None, &Vec3::zeros()));
        assert!(rotation_overridden(None, &Quat::identity()));
    }

    #[test]
    fn position_threshold_is_on_squared_distance() {
        let last = Vec3::new(1.0, 2.0, 3.0);

        // 0.011^2 = 1.21e-4 > 1e-4
        assert!(position_overridden(Some(&last), &(last + Vec3::new(0.011, 0.0, 0.0))));
        // 0.009^2 = 8.1e-5 <= 1e-4
        assert!(!position_overridden(Some(&last), &(last + Vec3::new(0.0, 0.009, 0.0))));
        assert!(!position_overridden(Some(&last), &last));
    }

    #[test]
    fn closeness_is_zero_for_identical_and_two_for_negated() {
        let q = Quat::from_euler_angles(0.3, -0.2, 1.1);
        assert!(rotation_closeness(&q, &q).abs() < 1.0e-6);

        let negated = Quat::new_unchecked(-q.into_inner());
        assert!((rotation_closeness(&q, &negated) - 2.0).abs() < 1.0e-6);
    }

    #[test]
    fn rotation_threshold_uses_closeness_metric() {
        let last = Quat::identity();
        // 1 - cos(angle / 2) ~= angle^2 / 8, so the threshold sits near 0.028 rad.
        let small = Quat::from_axis_angle(&Vec3::y_axis(), 0.02);
        let large = Quat::from_axis_angle(&Vec3::y_axis(), 0.04);

        assert!(!rotation_overridden(Some(&last), &small));
        assert!(rotation_overridden(Some(&last), &large));
    }

    #[test]
    fn sign_flipped_rotation_is_not_an_override() {
        let last = Quat::from_euler_angles(0.0, 2.0, 0.0);
        let flipped = Quat::new_unchecked(-last.into_inner());

        assert!(!rotation_overridden(Some(&last), &flipped));
        assert_eq!(same_hemisphere(&last, &flipped).coords, last.coords);

        let turned = Quat::from_euler_angles(0.0, 2.5, 0.0);
        let turned_flipped = Quat::new_unchecked(-turned.into_inner());
        assert!(rotation_overridden(Some(&last), &turned_flipped));
    }

    #[test]
    fn cache_clear_forgets_every_body() {
        let mut cache = PoseCache::new();
        cache.insert(BodyId(0), WorldPose::identity());
        cache.insert(BodyId(1), WorldPose::identity());
        assert_eq!(cache.len(), 2);

        cache.clear();

        assert!(cache.is_empty());
        assert!(cache.get(BodyId(0)).is_none());
    }
}
