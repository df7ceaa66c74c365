//! Error taxonomy for the surface.

use thiserror::Error;

use crate::config::StyleError;

/// Errors reported by [`crate::surface::EditableSurface`].
///
/// Key commands that nothing handles are not errors; they fall through as
/// not-handled. These cover contract violations: malformed host events and
/// lifecycle misuse.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// A host event envelope failed validation: unknown event name or a
    /// detail payload that does not decode. Reported instead of crashing;
    /// the event is skipped and later events still apply.
    #[error("invalid host event `{name}`: {reason}")]
    InvalidHostEvent { name: String, reason: String },

    /// The host supplied style options that fail validation.
    #[error("invalid style options: {0}")]
    InvalidStyles(#[from] StyleError),

    /// An operation that requires a mounted surface was called before
    /// mount or after unmount.
    #[error("surface `{id}` is not mounted")]
    NotMounted { id: String },
}
