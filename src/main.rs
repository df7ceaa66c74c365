//! Editpane - edit a file in an embeddable code-editing pane.
//!
//! # Usage
//!
//! ```bash
//! editpane notes.txt
//! editpane --border rounded --padding 1 src/main.rs
//! editpane --width 80% --clip README.md
//! ```
//!
//! The file is loaded into an in-process host buffer; the pane keeps the
//! buffer synchronized on every keystroke. Ctrl+S writes the buffer back
//! to the file, Ctrl+L simulates a host file-attach event, Ctrl+Q quits.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

use editpane::config::{BorderKind, Dimension, Overflow, Spacing, StyleOptions};
use editpane::host::{HostEvent, HostProxy, ScratchHost};
use editpane::surface::{EditableSurface, SurfaceInput};

/// Edit a file in an embeddable code-editing pane
#[derive(Parser, Debug)]
#[command(name = "editpane", version, about, long_about = None)]
struct Cli {
    /// File to edit
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Pane width (cells, percentage like `80%`, or `auto`)
    #[arg(long, default_value = "auto")]
    width: String,

    /// Minimum pane height (cells, percentage, or `auto`)
    #[arg(long, default_value = "auto")]
    min_height: String,

    /// Margin around the pane in cells
    #[arg(long, default_value_t = 0)]
    margin: u16,

    /// Padding inside the border in cells
    #[arg(long, default_value_t = 0)]
    padding: u16,

    /// Border style: none, plain, rounded, double, thick
    #[arg(long, default_value = "plain")]
    border: String,

    /// Clip overflowing content instead of scrolling
    #[arg(long)]
    clip: bool,
}

fn parse_border(s: &str) -> Result<BorderKind> {
    match s {
        "none" => Ok(BorderKind::None),
        "plain" => Ok(BorderKind::Plain),
        "rounded" => Ok(BorderKind::Rounded),
        "double" => Ok(BorderKind::Double),
        "thick" => Ok(BorderKind::Thick),
        _ => anyhow::bail!("unknown border style `{s}`"),
    }
}

fn styles_from_cli(cli: &Cli) -> Result<StyleOptions> {
    let width = Dimension::parse(&cli.width)
        .with_context(|| format!("invalid --width `{}`", cli.width))?;
    let min_height = Dimension::parse(&cli.min_height)
        .with_context(|| format!("invalid --min-height `{}`", cli.min_height))?;
    let styles = StyleOptions {
        width,
        min_height,
        margin: Spacing::uniform(cli.margin),
        padding: Spacing::uniform(cli.padding),
        border: parse_border(&cli.border)?,
        background: None,
        overflow: if cli.clip {
            Overflow::Clip
        } else {
            Overflow::Scroll
        },
    };
    styles.validated().context("invalid style options")
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    if !cli.file.exists() {
        anyhow::bail!("File not found: {}", cli.file.display());
    }
    let styles = styles_from_cli(&cli)?;

    let host = ScratchHost::load(&cli.file, styles)?;
    let mut surface = EditableSurface::new("editpane", host.clone());
    surface.mount().context("mount failed")?;

    let mut terminal = ratatui::try_init()
        .context("Failed to initialize terminal — editpane requires an interactive terminal")?;
    let result = run(&mut terminal, &mut surface, &host, &cli.file);
    ratatui::restore();
    result
}

fn run(
    terminal: &mut ratatui::DefaultTerminal,
    surface: &mut EditableSurface<ScratchHost>,
    host: &ScratchHost,
    file: &PathBuf,
) -> Result<()> {
    let mut last_saved = host.content();
    let mut attach_counter = 0u32;

    loop {
        surface.pump_host_events();

        terminal.draw(|frame| {
            let area = frame.area();
            let pane_area = Rect {
                height: area.height.saturating_sub(1),
                ..area
            };
            surface.render(frame, pane_area);
            render_status_bar(frame, area, surface, file, host.content() != last_saved);
        })?;

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => {
                let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
                if key.kind == KeyEventKind::Release {
                    surface.handle_input(SurfaceInput::KeyUp(key));
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') if ctrl => break,
                    KeyCode::Char('s') if ctrl => {
                        host.save(file)?;
                        last_saved = host.content();
                    }
                    KeyCode::Char('l') if ctrl => {
                        // Simulate the native side attaching a file
                        attach_counter += 1;
                        host.dispatch(HostEvent::FileAttach {
                            markdown_links: vec![format!(
                                "[attachment-{attach_counter}](file:///tmp/attachment-{attach_counter})"
                            )],
                        });
                    }
                    _ => {
                        surface.handle_input(SurfaceInput::KeyDown(key));
                    }
                }
            }
            Event::Paste(text) => {
                surface.handle_input(SurfaceInput::Paste(text));
            }
            _ => {}
        }
    }
    Ok(())
}

fn render_status_bar(
    frame: &mut ratatui::Frame,
    area: Rect,
    surface: &EditableSurface<ScratchHost>,
    file: &PathBuf,
    dirty: bool,
) {
    let status_area = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: 1,
        ..area
    };
    let state = surface.state();
    let (line, col) = state.content().position_of(state.selection().focus());
    let dirty_indicator = if dirty { " [+]" } else { "" };
    let status = format!(
        " {}{dirty_indicator}  Ln {}, Col {}  Ctrl+S:save  Ctrl+L:attach  Ctrl+Q:quit",
        file.display(),
        line + 1,
        col + 1,
    );
    let bar = Paragraph::new(Line::from(status))
        .style(Style::default().add_modifier(Modifier::REVERSED));
    frame.render_widget(bar, status_area);
}
