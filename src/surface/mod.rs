//! The editable surface component.
//!
//! [`EditableSurface`] wires one editing session to a host buffer:
//! - [`Model`]: editing state plus the styles read at mount
//! - [`Message`]: every input and host event that can reach the state
//! - [`update`]: pure state transitions
//! - the surface itself owns the mount/unmount lifecycle, the outbound
//!   content sync, and the inbound event pump

mod keymap;
mod render;

pub use keymap::{EditorCommand, KeyBinding, bind_key};

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use tracing::{debug, trace, warn};

use crate::code;
use crate::config::StyleOptions;
use crate::error::SurfaceError;
use crate::host::{HostEvent, HostEventEnvelope, HostProxy, HostSubscription};
use crate::state::{ChangeKind, EditorState};

/// Raw input reaching the surface from the surrounding UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceInput {
    KeyDown(KeyEvent),
    KeyUp(KeyEvent),
    Paste(String),
}

/// Whether an input should continue to ancestor handlers.
///
/// The surface is a leaf editing region: key-up and paste never propagate,
/// and key-downs propagate only when nothing binds them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Stop,
    Continue,
}

/// The surface's state: an editing snapshot plus render state.
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub state: EditorState,
    pub styles: StyleOptions,
    /// First visible line when overflow is `Scroll`.
    pub scroll_top: usize,
}

/// Everything that can change the editing state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// A bound key press.
    Key(KeyBinding),
    /// Text pasted into the surface.
    Paste(String),
    /// Host replaced the whole content.
    HostContentChange(String),
    /// Host attached files as markdown links.
    HostFileAttach(Vec<String>),
}

/// Pure state transition: apply a message to the model.
///
/// Always replaces the state value; a message that changes nothing leaves
/// the revision untouched so the caller can tell nothing happened.
pub fn update(mut model: Model, msg: Message) -> Model {
    let state = &model.state;
    model.state = match msg {
        Message::Key(KeyBinding::HandleReturn) => code::handle_return(state),
        Message::Key(KeyBinding::HandleTab { dedent }) => code::handle_tab(state, dedent),
        Message::Key(KeyBinding::Command(cmd)) => apply_command(state, cmd),
        Message::Paste(text) => state.replace_selection(&text, ChangeKind::Insert),
        Message::HostContentChange(text) => state.replace_all(&text),
        Message::HostFileAttach(links) => {
            state.replace_selection(&links.join(" "), ChangeKind::HostFileAttach)
        }
    };
    model
}

fn apply_command(state: &EditorState, cmd: EditorCommand) -> EditorState {
    match cmd {
        EditorCommand::InsertChar(c) => state.insert_char(c),
        // Code-aware backspace first; fall through to the default when it
        // does not produce a new state.
        EditorCommand::Backspace => {
            code::handle_backspace(state).unwrap_or_else(|| state.delete_back())
        }
        EditorCommand::Delete => state.delete_forward(),
        EditorCommand::Move { direction, extend } => state.move_caret(direction, extend),
        EditorCommand::Home { extend } => state.move_home(extend),
        EditorCommand::End { extend } => state.move_end(extend),
        EditorCommand::WordLeft { extend } => state.move_word_left(extend),
        EditorCommand::WordRight { extend } => state.move_word_right(extend),
        EditorCommand::DocStart { extend } => state.move_to_start(extend),
        EditorCommand::DocEnd { extend } => state.move_to_end(extend),
    }
}

/// A rich-text editing pane synchronized bidirectionally with a host buffer.
///
/// While mounted, every local edit is pushed to the host as plain text, and
/// host events arriving on the subscription are applied in arrival order by
/// [`Self::pump_host_events`]. Unmounting drops the subscription; nothing
/// else is torn down.
pub struct EditableSurface<H: HostProxy> {
    id: String,
    host: H,
    model: Model,
    subscription: Option<HostSubscription>,
    last_pushed: Option<u64>,
}

impl<H: HostProxy> EditableSurface<H> {
    /// Create an unmounted surface bound to a host.
    pub fn new(id: impl Into<String>, host: H) -> Self {
        Self {
            id: id.into(),
            host,
            model: Model::default(),
            subscription: None,
            last_pushed: None,
        }
    }

    /// The surface identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether the surface currently holds a host subscription.
    pub const fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    /// The current editing state.
    pub const fn state(&self) -> &EditorState {
        &self.model.state
    }

    /// The plain-text projection of the current state.
    pub fn plain_text(&self) -> String {
        self.model.state.plain_text()
    }

    /// The styles read at the last mount.
    pub const fn styles(&self) -> &StyleOptions {
        &self.model.styles
    }

    /// Mount the surface: read styles and content from the host, install
    /// the initial state, subscribe to host events, and push the initial
    /// plain text outward.
    ///
    /// Mounting an already-mounted surface drops the old subscription
    /// first, so handlers are never registered twice.
    ///
    /// # Errors
    /// Returns [`SurfaceError::InvalidStyles`] when the host's style
    /// options fail validation.
    pub fn mount(&mut self) -> Result<(), SurfaceError> {
        self.subscription = None;
        let styles = self.host.styles().validated()?;
        let content = self.host.content();
        debug!(id = %self.id, chars = content.chars().count(), "mount surface");
        self.model = Model {
            state: EditorState::with_text(&content),
            styles,
            scroll_top: 0,
        };
        self.last_pushed = None;
        self.subscription = Some(self.host.subscribe());
        self.sync_host();
        Ok(())
    }

    /// Unmount the surface, dropping the host subscription.
    pub fn unmount(&mut self) {
        debug!(id = %self.id, "unmount surface");
        self.subscription = None;
    }

    /// Feed one input to the surface.
    ///
    /// Key-up and paste always report [`Propagation::Stop`]; key-downs stop
    /// only when a binding handled them. Inputs on an unmounted surface are
    /// ignored and propagate.
    pub fn handle_input(&mut self, input: SurfaceInput) -> Propagation {
        if !self.is_mounted() {
            trace!(id = %self.id, "input on unmounted surface ignored");
            return Propagation::Continue;
        }
        match input {
            // Leaf editing region: keystroke fallout stays inside.
            SurfaceInput::KeyUp(_) => Propagation::Stop,
            SurfaceInput::Paste(text) => {
                self.apply(Message::Paste(text));
                Propagation::Stop
            }
            SurfaceInput::KeyDown(key) => match bind_key(&key) {
                Some(binding) => {
                    self.apply(Message::Key(binding));
                    Propagation::Stop
                }
                None => Propagation::Continue,
            },
        }
    }

    /// Apply one raw host event envelope.
    ///
    /// # Errors
    /// Returns [`SurfaceError::NotMounted`] before mount or after unmount,
    /// and [`SurfaceError::InvalidHostEvent`] for an envelope that fails
    /// validation; the state is untouched in both cases.
    pub fn apply_envelope(&mut self, envelope: &HostEventEnvelope) -> Result<(), SurfaceError> {
        if !self.is_mounted() {
            return Err(SurfaceError::NotMounted {
                id: self.id.clone(),
            });
        }
        let msg = match HostEvent::from_envelope(envelope)? {
            HostEvent::ContentChange { new_content } => Message::HostContentChange(new_content),
            HostEvent::FileAttach { markdown_links } => Message::HostFileAttach(markdown_links),
        };
        self.apply(msg);
        Ok(())
    }

    /// Drain and apply all pending host events in arrival order.
    ///
    /// Invalid envelopes are reported at warn level and skipped; later
    /// events still apply. Returns the number of events applied.
    pub fn pump_host_events(&mut self) -> usize {
        let Some(subscription) = &self.subscription else {
            return 0;
        };
        let envelopes = subscription.drain();
        let mut applied = 0;
        for envelope in envelopes {
            match self.apply_envelope(&envelope) {
                Ok(()) => applied += 1,
                Err(err) => {
                    warn!(id = %self.id, event = %envelope.name, %err, "host event rejected");
                }
            }
        }
        applied
    }

    /// Render the pane into `area`, styled per the mount-time options.
    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        render::render(&mut self.model, frame, area);
    }

    fn apply(&mut self, msg: Message) {
        self.model = update(std::mem::take(&mut self.model), msg);
        self.sync_host();
    }

    /// Push the plain text to the host if the state was replaced since the
    /// last push. Runs after every applied message and once at mount.
    fn sync_host(&mut self) {
        let revision = self.model.state.revision();
        if self.last_pushed == Some(revision) {
            return;
        }
        let text = self.model.state.plain_text();
        trace!(id = %self.id, revision, chars = text.chars().count(), "sync content to host");
        self.host.update_content(&text);
        self.last_pushed = Some(revision);
    }
}

#[cfg(test)]
mod tests;
