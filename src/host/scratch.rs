use std::path::Path;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};

use super::{HostEvent, HostEventEnvelope, HostProxy, HostSubscription};
use crate::config::StyleOptions;

/// An in-process host backed by a plain string buffer.
///
/// This is the reference [`HostProxy`] implementation: the demo binary edits
/// files through it and the test suites use it to observe the pane's
/// outbound sync. Clones share the same buffer and listener registry.
#[derive(Debug, Clone)]
pub struct ScratchHost {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug)]
struct Inner {
    content: String,
    styles: StyleOptions,
    listeners: Vec<Sender<HostEventEnvelope>>,
    update_count: u64,
}

impl ScratchHost {
    /// Create a host with empty content.
    pub fn new(styles: StyleOptions) -> Self {
        Self::with_content("", styles)
    }

    /// Create a host with initial content.
    pub fn with_content(content: &str, styles: StyleOptions) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                content: content.to_string(),
                styles,
                listeners: Vec::new(),
                update_count: 0,
            })),
        }
    }

    /// Create a host whose buffer is loaded from a file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read.
    pub fn load(path: &Path, styles: StyleOptions) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Self::with_content(&content, styles))
    }

    /// Write the current buffer to a file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.content();
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Replace the buffer out-of-band and notify listeners, as a native
    /// editor would when its own widget changes.
    pub fn set_content(&self, text: &str) -> usize {
        self.lock().content = text.to_string();
        self.dispatch(HostEvent::ContentChange {
            new_content: text.to_string(),
        })
    }

    /// Dispatch a typed event to all live listeners.
    ///
    /// Returns the number of listeners the event reached. Disconnected
    /// listeners (dropped subscriptions) are pruned.
    pub fn dispatch(&self, event: HostEvent) -> usize {
        self.dispatch_envelope(event.into_envelope())
    }

    /// Dispatch a raw envelope to all live listeners.
    pub fn dispatch_envelope(&self, envelope: HostEventEnvelope) -> usize {
        let mut inner = self.lock();
        inner
            .listeners
            .retain(|listener| listener.send(envelope.clone()).is_ok());
        inner.listeners.len()
    }

    /// How many times the pane has pushed content to this host.
    pub fn update_count(&self) -> u64 {
        self.lock().update_count
    }

    /// Number of registered listeners, including ones whose subscription
    /// has been dropped but not yet pruned by a dispatch.
    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock means a panic mid-update; the string buffer has no
        // invalid intermediate states, so recover the guard.
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl HostProxy for ScratchHost {
    fn styles(&self) -> StyleOptions {
        self.lock().styles.clone()
    }

    fn content(&self) -> String {
        self.lock().content.clone()
    }

    fn update_content(&self, text: &str) {
        let mut inner = self.lock();
        inner.content = text.to_string();
        inner.update_count += 1;
    }

    fn subscribe(&self) -> HostSubscription {
        let (tx, rx) = mpsc::channel();
        self.lock().listeners.push(tx);
        HostSubscription::new(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_update_content_replaces_buffer_and_counts() {
        let host = ScratchHost::with_content("before", StyleOptions::default());
        host.update_content("after");
        assert_eq!(host.content(), "after");
        assert_eq!(host.update_count(), 1);
    }

    #[test]
    fn test_dispatch_reaches_all_subscribers_in_order() {
        let host = ScratchHost::new(StyleOptions::default());
        let a = host.subscribe();
        let b = host.subscribe();

        host.dispatch(HostEvent::ContentChange {
            new_content: "one".to_string(),
        });
        host.dispatch(HostEvent::ContentChange {
            new_content: "two".to_string(),
        });

        for sub in [&a, &b] {
            let drained = sub.drain();
            assert_eq!(drained.len(), 2);
            assert_eq!(drained[0].detail["newContent"], "one");
            assert_eq!(drained[1].detail["newContent"], "two");
        }
    }

    #[test]
    fn test_dropped_subscription_is_pruned_on_dispatch() {
        let host = ScratchHost::new(StyleOptions::default());
        let sub = host.subscribe();
        assert_eq!(host.listener_count(), 1);

        drop(sub);
        let delivered = host.dispatch(HostEvent::ContentChange {
            new_content: String::new(),
        });
        assert_eq!(delivered, 0);
        assert_eq!(host.listener_count(), 0);
    }

    #[test]
    fn test_set_content_notifies_listeners() {
        let host = ScratchHost::with_content("old", StyleOptions::default());
        let sub = host.subscribe();
        host.set_content("new");
        assert_eq!(host.content(), "new");
        let envelope = sub.try_next().expect("listener notified");
        assert_eq!(envelope.name, super::super::CONTENT_CHANGE);
        assert_eq!(envelope.detail["newContent"], "new");
    }

    #[test]
    fn test_load_and_save_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("buffer.txt");
        std::fs::write(&path, "fn main() {}\n").unwrap();

        let host = ScratchHost::load(&path, StyleOptions::default()).unwrap();
        assert_eq!(host.content(), "fn main() {}\n");

        host.update_content("fn main() { run(); }\n");
        host.save(&path).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "fn main() { run(); }\n"
        );
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.txt");
        assert!(ScratchHost::load(&missing, StyleOptions::default()).is_err());
    }
}
