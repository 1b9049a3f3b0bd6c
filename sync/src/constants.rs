/// Threshold shared by both override tests in pre-step reconciliation.
///
/// - Position: compared against the squared distance (meters^2) between the cached
///   last-frame world position and the owner's current world position.
/// - Rotation: compared against `1 - dot(q_cached, q_current)` of the normalized quaternions,
///   with `q_current` taken in the hemisphere of `q_cached`.
///
/// The value was tuned against exactly these two metrics. Do not swap either metric for a
/// "real" distance/angle without re-tuning.
pub const OVERRIDE_EPSILON: f32 = 1.0e-4;

/// Gravity magnitude in meters per second squared (positive value).
///
/// The default world gravity is `(0, -GRAVITY_MPS2, 0)`.
pub const GRAVITY_MPS2: f32 = 9.81;

/// Collider density used when a body definition does not provide one (kg/m^3).
pub const DEFAULT_DENSITY: f32 = 1.0;
