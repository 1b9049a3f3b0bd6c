use thiserror::Error;

use crate::owner::OwnerId;

/// Errors surfaced by the synchronization engine.
///
/// Everything else (NaN poses, solver divergence) is a caller contract violation and is not
/// detected here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyncError {
    /// The owner is already paired with a body.
    #[error("owner {0} is already registered")]
    DuplicateOwner(OwnerId),
    /// No body is registered for this owner.
    #[error("owner {0} is not registered")]
    UnknownOwner(OwnerId),
    /// Elapsed time must be finite and non-negative.
    #[error("invalid time step: {0}s")]
    InvalidTimeStep(f32),
}
