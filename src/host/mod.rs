//! The host side of the pane.
//!
//! A host owns the authoritative plain-text buffer and the styling; the pane
//! owns the editing session. [`HostProxy`] is the only channel between them:
//! the pane reads styles and content once at mount, pushes plain text outward
//! through [`HostProxy::update_content`], and receives host-originated events
//! through a subscription created at mount and dropped at unmount.
//!
//! Events travel as named envelopes with a JSON detail payload (the shape
//! hosts naturally produce) and are validated into typed [`HostEvent`]s
//! before they touch editing state.

mod scratch;

pub use scratch::ScratchHost;

use std::sync::mpsc::Receiver;

use serde::{Deserialize, Serialize};

use crate::config::StyleOptions;
use crate::error::SurfaceError;

/// Event name for whole-content replacement.
pub const CONTENT_CHANGE: &str = "content-change";

/// Event name for file attachment.
pub const FILE_ATTACH: &str = "file-attach";

/// A raw named event as dispatched by a host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostEventEnvelope {
    pub name: String,
    pub detail: serde_json::Value,
}

/// A validated host event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// The host replaced the buffer out-of-band; the pane must follow.
    ContentChange { new_content: String },
    /// The host attached files; their markdown links get inserted at the
    /// selection.
    FileAttach { markdown_links: Vec<String> },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentChangeDetail {
    new_content: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileAttachDetail {
    markdown_links: Vec<String>,
}

impl HostEvent {
    /// The envelope name this event travels under.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ContentChange { .. } => CONTENT_CHANGE,
            Self::FileAttach { .. } => FILE_ATTACH,
        }
    }

    /// Validate a raw envelope into a typed event.
    ///
    /// # Errors
    /// Returns [`SurfaceError::InvalidHostEvent`] for an unknown name or a
    /// detail payload that does not decode.
    pub fn from_envelope(envelope: &HostEventEnvelope) -> Result<Self, SurfaceError> {
        let invalid = |reason: String| SurfaceError::InvalidHostEvent {
            name: envelope.name.clone(),
            reason,
        };
        match envelope.name.as_str() {
            CONTENT_CHANGE => {
                let detail: ContentChangeDetail =
                    serde_json::from_value(envelope.detail.clone())
                        .map_err(|e| invalid(e.to_string()))?;
                Ok(Self::ContentChange {
                    new_content: detail.new_content,
                })
            }
            FILE_ATTACH => {
                let detail: FileAttachDetail = serde_json::from_value(envelope.detail.clone())
                    .map_err(|e| invalid(e.to_string()))?;
                Ok(Self::FileAttach {
                    markdown_links: detail.markdown_links,
                })
            }
            _ => Err(invalid("unknown event name".to_string())),
        }
    }

    /// Wrap the event in the envelope a host would dispatch.
    pub fn into_envelope(self) -> HostEventEnvelope {
        match self {
            Self::ContentChange { new_content } => HostEventEnvelope {
                name: CONTENT_CHANGE.to_string(),
                detail: serde_json::json!({ "newContent": new_content }),
            },
            Self::FileAttach { markdown_links } => HostEventEnvelope {
                name: FILE_ATTACH.to_string(),
                detail: serde_json::json!({ "markdownLinks": markdown_links }),
            },
        }
    }
}

/// A live event subscription held by a mounted pane.
///
/// Dropping it unsubscribes: the host prunes the dead channel on its next
/// dispatch, and nothing is delivered to an unmounted pane.
#[derive(Debug)]
pub struct HostSubscription {
    rx: Receiver<HostEventEnvelope>,
}

impl HostSubscription {
    /// Create a subscription from the receiving half of an event channel.
    pub const fn new(rx: Receiver<HostEventEnvelope>) -> Self {
        Self { rx }
    }

    /// Take the next pending envelope, if any. Never blocks.
    pub fn try_next(&self) -> Option<HostEventEnvelope> {
        self.rx.try_recv().ok()
    }

    /// Drain all pending envelopes in arrival order. Never blocks.
    pub fn drain(&self) -> Vec<HostEventEnvelope> {
        let mut out = Vec::new();
        while let Some(envelope) = self.try_next() {
            out.push(envelope);
        }
        out
    }
}

/// The pane's view of its host.
///
/// Implementations are externally owned and externally synchronized; the
/// pane never assumes exclusive access to the underlying buffer, and learns
/// about out-of-band changes only through `content-change` events.
pub trait HostProxy {
    /// Style configuration, read once at mount.
    fn styles(&self) -> StyleOptions;

    /// Current plain-text content, read once at mount.
    fn content(&self) -> String;

    /// Called after every local edit with the full current plain text.
    fn update_content(&self, text: &str);

    /// Register a new event listener and return its subscription.
    fn subscribe(&self) -> HostSubscription;
}
