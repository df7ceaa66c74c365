// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. state::EditorState)
    clippy::module_name_repetitions
)]

//! # Editpane
//!
//! An embeddable code-editing pane that stays synchronized with a
//! host-owned text buffer.
//!
//! The pane owns an immutable editing snapshot ([`state::EditorState`])
//! that is replaced wholesale on every change. A host supplies initial
//! content and styling through a [`host::HostProxy`], receives the full
//! plain text after every local edit, and can push content replacements
//! and file attachments back into the pane as named events.
//!
//! ## Architecture
//!
//! The surface uses The Elm Architecture (TEA) pattern:
//! - **Model**: editing state plus mount-time styles
//! - **Message**: key bindings, paste, and host events
//! - **Update**: pure state transitions
//! - **View**: render to a ratatui frame
//!
//! ## Modules
//!
//! - [`surface`]: The pane component and its lifecycle
//! - [`state`]: Immutable editing-state snapshots
//! - [`code`]: Code-aware key behaviors (indent, dedent, auto-indent return)
//! - [`host`]: The host proxy contract and event envelopes
//! - [`config`]: Style options
//! - [`error`]: Error taxonomy

pub mod code;
pub mod config;
pub mod error;
pub mod host;
pub mod state;
pub mod surface;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::StyleOptions;
    pub use crate::host::{HostEvent, HostProxy, ScratchHost};
    pub use crate::state::EditorState;
    pub use crate::surface::{EditableSurface, Propagation, SurfaceInput};
}
