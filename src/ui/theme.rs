use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

/// The two colour schemes the user can flip between with `t`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// Base style for every panel.
    pub(crate) fn base(self) -> Style {
        match self {
            Theme::Dark => Style::default()
                .bg(Color::Rgb(0x2f, 0x2f, 0x2f))
                .fg(Color::Rgb(0xdd, 0xdd, 0xdd)),
            Theme::Light => Style::default()
                .bg(Color::Rgb(0xf5, 0xf5, 0xf5))
                .fg(Color::Rgb(0x20, 0x20, 0x20)),
        }
    }

    /// Song names in the list.
    pub(crate) fn song_name(self) -> Style {
        match self {
            Theme::Dark => Style::default().fg(Color::LightBlue),
            Theme::Light => Style::default().fg(Color::Blue),
        }
    }

    /// Document text in the viewer.
    pub(crate) fn document(self) -> Style {
        match self {
            Theme::Dark => Style::default().fg(Color::Rgb(0x99, 0x99, 0x99)),
            Theme::Light => Style::default().fg(Color::Rgb(0x33, 0x33, 0x33)),
        }
    }

    pub(crate) fn highlight(self) -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }

    pub(crate) fn muted(self) -> Style {
        match self {
            Theme::Dark => Style::default().fg(Color::DarkGray),
            Theme::Light => Style::default().fg(Color::Gray),
        }
    }

    pub(crate) fn key(self) -> Style {
        let color = match self {
            Theme::Dark => Color::Cyan,
            Theme::Light => Color::Magenta,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_twice_returns_to_start() {
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Dark.toggled().toggled(), Theme::Dark);
    }
}
