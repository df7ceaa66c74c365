//! Styling configuration for the pane.
//!
//! The host supplies a loosely-typed options record once at mount; this
//! module turns it into an explicit, validated structure with named fields
//! and defaults, and maps it onto ratatui primitives at render time.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, BorderType, Borders, Padding};
use serde::Deserialize;
use thiserror::Error;

/// A size along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dimension {
    /// Fill whatever the host gives us.
    #[default]
    Auto,
    /// A fixed number of terminal cells.
    Cells(u16),
    /// A percentage of the available space (0..=100).
    Percent(u8),
}

impl Dimension {
    /// Resolve against the available size in cells.
    pub const fn resolve(self, available: u16) -> u16 {
        match self {
            Self::Auto => available,
            Self::Cells(n) => {
                if n < available { n } else { available }
            }
            Self::Percent(p) => (available as u32 * p as u32 / 100) as u16,
        }
    }

    /// Parse a loosely-typed value: `"auto"`, `"42"`, or `"60%"`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            return Some(Self::Auto);
        }
        if let Some(pct) = s.strip_suffix('%') {
            return pct.trim().parse().ok().map(Self::Percent);
        }
        s.parse().ok().map(Self::Cells)
    }
}

impl<'de> Deserialize<'de> for Dimension {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Cells(u16),
            Text(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Cells(n) => Ok(Self::Cells(n)),
            Raw::Text(s) => Self::parse(&s)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid dimension `{s}`"))),
        }
    }
}

/// Uniform or per-side spacing in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "RawSpacing")]
pub struct Spacing {
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
    pub left: u16,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSpacing {
    Uniform(u16),
    Sides {
        #[serde(default)]
        top: u16,
        #[serde(default)]
        right: u16,
        #[serde(default)]
        bottom: u16,
        #[serde(default)]
        left: u16,
    },
}

impl From<RawSpacing> for Spacing {
    fn from(raw: RawSpacing) -> Self {
        match raw {
            RawSpacing::Uniform(n) => Self::uniform(n),
            RawSpacing::Sides {
                top,
                right,
                bottom,
                left,
            } => Self {
                top,
                right,
                bottom,
                left,
            },
        }
    }
}

impl Spacing {
    /// The same spacing on every side.
    pub const fn uniform(n: u16) -> Self {
        Self {
            top: n,
            right: n,
            bottom: n,
            left: n,
        }
    }

    /// Shrink a rect by this spacing, clamping at zero size.
    pub fn shrink(self, area: Rect) -> Rect {
        let horizontal = self.left + self.right;
        let vertical = self.top + self.bottom;
        Rect {
            x: area.x + self.left.min(area.width),
            y: area.y + self.top.min(area.height),
            width: area.width.saturating_sub(horizontal),
            height: area.height.saturating_sub(vertical),
        }
    }
}

/// Border drawn around the pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderKind {
    None,
    #[default]
    Plain,
    Rounded,
    Double,
    Thick,
}

/// What happens when content exceeds the pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Overflow {
    /// Keep the caret line in view by scrolling.
    #[default]
    Scroll,
    /// Pin the view to the top and clip.
    Clip,
}

/// An RGB background color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Styling options supplied by the host at mount.
///
/// All fields have defaults; hosts set only what they care about.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleOptions {
    pub width: Dimension,
    pub min_height: Dimension,
    pub margin: Spacing,
    pub padding: Spacing,
    pub border: BorderKind,
    pub background: Option<Rgb>,
    pub overflow: Overflow,
}

/// An invalid style configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StyleError {
    #[error("percentage {0} is out of range (must be 0..=100)")]
    PercentOutOfRange(u8),
    #[error("width of zero cells leaves no room to edit")]
    ZeroWidth,
}

impl StyleOptions {
    /// Validate the options, returning them unchanged on success.
    pub fn validated(self) -> Result<Self, StyleError> {
        for dim in [self.width, self.min_height] {
            if let Dimension::Percent(p) = dim {
                if p > 100 {
                    return Err(StyleError::PercentOutOfRange(p));
                }
            }
        }
        if self.width == Dimension::Cells(0) {
            return Err(StyleError::ZeroWidth);
        }
        Ok(self)
    }

    /// The pane rect inside `area` after margin and width are applied.
    pub fn pane_rect(&self, area: Rect) -> Rect {
        let outer = self.margin.shrink(area);
        Rect {
            width: self.width.resolve(outer.width),
            ..outer
        }
    }

    /// Height the pane wants for `content_lines` lines of text, honoring
    /// `min_height`. Useful for hosts laying the pane out in a flexible row.
    pub fn desired_height(&self, content_lines: u16, available: u16) -> u16 {
        let chrome = self.frame_height() + self.margin.top + self.margin.bottom;
        let wanted = content_lines.saturating_add(chrome);
        wanted.max(self.min_height.resolve(available)).min(available)
    }

    /// Rows consumed by border and padding.
    pub const fn frame_height(&self) -> u16 {
        let border = if matches!(self.border, BorderKind::None) {
            0
        } else {
            2
        };
        border + self.padding.top + self.padding.bottom
    }

    /// Build the styled block wrapping the editing region.
    pub fn block(&self) -> Block<'static> {
        let mut block = Block::default().padding(Padding::new(
            self.padding.left,
            self.padding.right,
            self.padding.top,
            self.padding.bottom,
        ));
        block = match self.border {
            BorderKind::None => block.borders(Borders::NONE),
            BorderKind::Plain => block.borders(Borders::ALL).border_type(BorderType::Plain),
            BorderKind::Rounded => block.borders(Borders::ALL).border_type(BorderType::Rounded),
            BorderKind::Double => block.borders(Borders::ALL).border_type(BorderType::Double),
            BorderKind::Thick => block.borders(Borders::ALL).border_type(BorderType::Thick),
        };
        if let Some(bg) = self.background {
            block = block.style(Style::default().bg(Color::Rgb(bg.r, bg.g, bg.b)));
        }
        block
    }
}
