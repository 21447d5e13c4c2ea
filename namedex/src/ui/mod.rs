//! The namedex UI.
//!
//! The screen is split into a name selector on the left and a chart pane on
//! the right. The chart pane shows one bar per year for the selected name,
//! with the name's meaning and any error underneath.
//!
//! All state lives in the [`browser::Browser`]; rendering is done from
//! scratch every frame.

use tui::style::Color;
use tui::style::Modifier;
use tui::style::Style;

pub mod browser;
pub mod selector;
pub mod widgets;

/// The colors used throughout the UI.
#[derive(Copy, Clone, Debug)]
pub struct StyleSheet {
  pub focused: Style,
  pub unfocused: Style,
  pub selected: Style,
  pub bar: Style,
  pub top_ten: Style,
  pub error: Style,
}

impl Default for StyleSheet {
  fn default() -> Self {
    StyleSheet {
      focused: Style::default().fg(Color::White),
      unfocused: Style::default().fg(Color::Gray),
      selected: Style::default().add_modifier(Modifier::BOLD),
      bar: Style::default().fg(Color::Cyan),
      top_ten: Style::default().fg(Color::Red),
      error: Style::default()
        .fg(Color::LightRed)
        .add_modifier(Modifier::BOLD),
    }
  }
}
