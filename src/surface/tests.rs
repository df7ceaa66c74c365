use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use super::{EditableSurface, Propagation, SurfaceInput};
use crate::config::{BorderKind, Dimension, StyleOptions};
use crate::error::SurfaceError;
use crate::host::{HostEvent, HostEventEnvelope, HostProxy, ScratchHost};
use crate::state::Selection;

fn key_down(code: KeyCode) -> SurfaceInput {
    SurfaceInput::KeyDown(KeyEvent::new(code, KeyModifiers::NONE))
}

fn key_down_mod(code: KeyCode, modifiers: KeyModifiers) -> SurfaceInput {
    SurfaceInput::KeyDown(KeyEvent::new(code, modifiers))
}

fn mounted(content: &str) -> (EditableSurface<ScratchHost>, ScratchHost) {
    let host = ScratchHost::with_content(content, StyleOptions::default());
    let mut surface = EditableSurface::new("pane", host.clone());
    surface.mount().unwrap();
    (surface, host)
}

fn type_str(surface: &mut EditableSurface<ScratchHost>, text: &str) {
    for c in text.chars() {
        surface.handle_input(key_down(KeyCode::Char(c)));
    }
}

// --- Mount ---

#[test]
fn test_mount_installs_host_content() {
    let (surface, _host) = mounted("initial text");
    assert_eq!(surface.plain_text(), "initial text");
    assert_eq!(surface.state().selection(), Selection::collapsed(0));
    assert!(surface.is_mounted());
}

#[test]
fn test_mount_pushes_initial_content_to_host() {
    let (_surface, host) = mounted("hello");
    assert_eq!(host.update_count(), 1);
    assert_eq!(host.content(), "hello");
}

#[test]
fn test_mount_rejects_invalid_styles() {
    let styles = StyleOptions {
        width: Dimension::Cells(0),
        ..StyleOptions::default()
    };
    let host = ScratchHost::new(styles);
    let mut surface = EditableSurface::new("pane", host);
    assert!(matches!(
        surface.mount(),
        Err(SurfaceError::InvalidStyles(_))
    ));
    assert!(!surface.is_mounted());
}

// --- Outbound sync ---

#[test]
fn test_every_keystroke_syncs_plain_text_to_host() {
    let (mut surface, host) = mounted("");
    type_str(&mut surface, "hi");
    assert_eq!(host.content(), "hi");
    // mount + two keystrokes, no batching
    assert_eq!(host.update_count(), 3);
}

#[test]
fn test_typing_sequence_produces_expected_text() {
    let (mut surface, host) = mounted("");
    type_str(&mut surface, "fn main");
    surface.handle_input(key_down(KeyCode::Backspace));
    type_str(&mut surface, "in()");
    assert_eq!(surface.plain_text(), "fn main()");
    assert_eq!(host.content(), "fn main()");
}

// --- Inbound: content-change ---

#[test]
fn test_content_change_replaces_document_and_resets_selection() {
    let (mut surface, host) = mounted("old content");
    type_str(&mut surface, "xxx");

    host.dispatch(HostEvent::ContentChange {
        new_content: "X".to_string(),
    });
    let applied = surface.pump_host_events();

    assert_eq!(applied, 1);
    assert_eq!(surface.plain_text(), "X");
    assert_eq!(surface.state().selection(), Selection::collapsed(0));
}

#[test]
fn test_host_events_apply_in_arrival_order() {
    let (mut surface, host) = mounted("");
    host.dispatch(HostEvent::ContentChange {
        new_content: "first".to_string(),
    });
    host.dispatch(HostEvent::ContentChange {
        new_content: "second".to_string(),
    });
    assert_eq!(surface.pump_host_events(), 2);
    assert_eq!(surface.plain_text(), "second");
}

// --- Inbound: file-attach ---

#[test]
fn test_file_attach_inserts_joined_links_at_caret() {
    let (mut surface, host) = mounted("");
    host.dispatch(HostEvent::FileAttach {
        markdown_links: vec!["[a](u1)".to_string(), "[b](u2)".to_string()],
    });
    surface.pump_host_events();

    assert_eq!(surface.plain_text(), "[a](u1) [b](u2)");
    // Caret lands immediately after the inserted text
    assert_eq!(surface.state().selection(), Selection::collapsed(15));
}

#[test]
fn test_file_attach_replaces_active_selection() {
    let (mut surface, host) = mounted("see THIS here");
    // Select "THIS"
    for _ in 0..4 {
        surface.handle_input(key_down_mod(KeyCode::Right, KeyModifiers::NONE));
    }
    for _ in 0..4 {
        surface.handle_input(key_down_mod(KeyCode::Right, KeyModifiers::SHIFT));
    }
    assert_eq!(surface.state().selection(), Selection::new(4, 8));

    host.dispatch(HostEvent::FileAttach {
        markdown_links: vec!["[f](u)".to_string()],
    });
    surface.pump_host_events();

    assert_eq!(surface.plain_text(), "see [f](u) here");
    assert_eq!(surface.state().selection(), Selection::collapsed(10));
    assert_eq!(host.content(), "see [f](u) here");
}

// --- Key handling ---

#[test]
fn test_enter_is_always_handled_and_auto_indents() {
    let (mut surface, _host) = mounted("    foo");
    surface.handle_input(key_down(KeyCode::End));
    let prop = surface.handle_input(key_down(KeyCode::Enter));
    assert_eq!(prop, Propagation::Stop);
    assert_eq!(surface.plain_text(), "    foo\n    ");
}

#[test]
fn test_tab_is_always_handled() {
    let (mut surface, _host) = mounted("foo");
    assert_eq!(surface.handle_input(key_down(KeyCode::Tab)), Propagation::Stop);
    assert_eq!(surface.plain_text(), "    foo");
    assert_eq!(
        surface.handle_input(key_down(KeyCode::BackTab)),
        Propagation::Stop
    );
    assert_eq!(surface.plain_text(), "foo");
}

#[test]
fn test_backspace_in_indentation_dedents() {
    let (mut surface, _host) = mounted("    x");
    for _ in 0..4 {
        surface.handle_input(key_down(KeyCode::Right));
    }
    surface.handle_input(key_down(KeyCode::Backspace));
    assert_eq!(surface.plain_text(), "x");
}

#[test]
fn test_backspace_after_text_falls_through_to_default() {
    let (mut surface, _host) = mounted("ab");
    surface.handle_input(key_down(KeyCode::End));
    surface.handle_input(key_down(KeyCode::Backspace));
    assert_eq!(surface.plain_text(), "a");
}

#[test]
fn test_unbound_key_propagates() {
    let (mut surface, _host) = mounted("text");
    assert_eq!(
        surface.handle_input(key_down(KeyCode::F(5))),
        Propagation::Continue
    );
    assert_eq!(
        surface.handle_input(key_down_mod(KeyCode::Char('s'), KeyModifiers::CONTROL)),
        Propagation::Continue
    );
    assert_eq!(surface.plain_text(), "text");
}

// --- Event isolation ---

#[test]
fn test_key_up_and_paste_never_propagate() {
    let (mut surface, _host) = mounted("");
    let key_up = SurfaceInput::KeyUp(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE));
    assert_eq!(surface.handle_input(key_up), Propagation::Stop);
    assert_eq!(
        surface.handle_input(SurfaceInput::Paste("pasted".to_string())),
        Propagation::Stop
    );
    assert_eq!(surface.plain_text(), "pasted");
}

// --- Subscription lifecycle ---

#[test]
fn test_unmounted_surface_ignores_host_events() {
    let (mut surface, host) = mounted("original");
    surface.unmount();

    let delivered = host.dispatch(HostEvent::ContentChange {
        new_content: "changed".to_string(),
    });
    assert_eq!(delivered, 0);
    assert_eq!(surface.pump_host_events(), 0);
    assert_eq!(surface.plain_text(), "original");
}

#[test]
fn test_remount_registers_exactly_one_handler() {
    let (mut surface, host) = mounted("one");
    surface.unmount();
    host.set_content("two");
    surface.mount().unwrap();
    assert_eq!(surface.plain_text(), "two");

    // Repeated mounts must not stack subscriptions
    surface.mount().unwrap();
    let delivered = host.dispatch(HostEvent::ContentChange {
        new_content: "three".to_string(),
    });
    assert_eq!(delivered, 1);
    assert_eq!(surface.pump_host_events(), 1);
    assert_eq!(surface.plain_text(), "three");
}

#[test]
fn test_input_on_unmounted_surface_is_ignored() {
    let host = ScratchHost::with_content("keep", StyleOptions::default());
    let mut surface = EditableSurface::new("pane", host);
    assert_eq!(
        surface.handle_input(key_down(KeyCode::Char('x'))),
        Propagation::Continue
    );
    assert_eq!(surface.plain_text(), "");
}

// --- Envelope validation ---

#[test]
fn test_invalid_envelope_is_reported_and_state_untouched() {
    let (mut surface, _host) = mounted("safe");
    let envelope = HostEventEnvelope {
        name: "content-change".to_string(),
        detail: serde_json::json!({ "newContent": ["not", "a", "string"] }),
    };
    let err = surface.apply_envelope(&envelope).unwrap_err();
    assert!(matches!(err, SurfaceError::InvalidHostEvent { .. }));
    assert_eq!(surface.plain_text(), "safe");
}

#[test]
fn test_pump_skips_invalid_events_and_applies_later_ones() {
    let (mut surface, host) = mounted("");
    host.dispatch_envelope(HostEventEnvelope {
        name: "bogus".to_string(),
        detail: serde_json::Value::Null,
    });
    host.dispatch(HostEvent::ContentChange {
        new_content: "valid".to_string(),
    });
    assert_eq!(surface.pump_host_events(), 1);
    assert_eq!(surface.plain_text(), "valid");
}

#[test]
fn test_apply_envelope_before_mount_is_not_mounted() {
    let host = ScratchHost::new(StyleOptions::default());
    let mut surface = EditableSurface::new("pane", host);
    let envelope = HostEvent::ContentChange {
        new_content: "x".to_string(),
    }
    .into_envelope();
    assert!(matches!(
        surface.apply_envelope(&envelope),
        Err(SurfaceError::NotMounted { .. })
    ));
}

// --- Rendering ---

#[test]
fn test_render_shows_content_inside_border() {
    let styles = StyleOptions {
        border: BorderKind::Plain,
        ..StyleOptions::default()
    };
    let host = ScratchHost::with_content("hello pane", styles);
    let mut surface = EditableSurface::new("pane", host);
    surface.mount().unwrap();

    let backend = TestBackend::new(40, 10);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| surface.render(frame, Rect::new(0, 0, 40, 10)))
        .unwrap();

    let buffer = terminal.backend().buffer();
    let content: String = buffer.content().iter().map(|c| c.symbol()).collect();
    assert!(content.contains("hello pane"));
}

#[test]
fn test_render_scrolls_caret_into_view() {
    let text: String = (0..50)
        .map(|i| format!("line {i}\n"))
        .collect();
    let (mut surface, _host) = mounted(&text);
    surface.handle_input(key_down_mod(KeyCode::End, KeyModifiers::CONTROL));

    let backend = TestBackend::new(40, 10);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| surface.render(frame, Rect::new(0, 0, 40, 10)))
        .unwrap();

    let buffer = terminal.backend().buffer();
    let content: String = buffer.content().iter().map(|c| c.symbol()).collect();
    assert!(content.contains("line 49"));
    assert!(!content.contains("line 0 "));
}
