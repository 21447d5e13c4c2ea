//! The root UI type.
//!
//! A [`Browser`] runs one selection cycle at a time:
//!
//! ```text
//! Idle -> Loading -> (Rendered | Failed) -> Idle
//! ```
//!
//! The catalog is downloaded once at startup; the selector stays disabled
//! until it arrives. Choosing a name clears whatever was on screen and issues
//! a request for that name's records. Only the latest request's response is
//! ever applied.

use std::fmt;
use std::sync::Arc;

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;

use babynames::api;
use babynames::model::Catalog;
use babynames::model::Chart;
use babynames::model::Geometry;
use babynames::NameRecord;
use babynames::Source;

use tui::backend::Backend;
use tui::layout::Constraint;
use tui::layout::Direction;
use tui::layout::Layout;
use tui::layout::Rect;
use tui::text::Span;
use tui::widgets::List;
use tui::widgets::ListItem;
use tui::widgets::ListState;
use tui::widgets::Paragraph;
use tui::widgets::Wrap;
use tui::Frame;

use crate::download::Download;
use crate::download::Requests;
use crate::ui::selector::Selector;
use crate::ui::widgets::Chrome;
use crate::ui::widgets::RankChart;
use crate::ui::widgets::Spinner;
use crate::ui::StyleSheet;

/// Bar placement in terminal columns.
pub const CHART_GEOMETRY: Geometry = Geometry {
  origin: 0,
  stride: 10,
};

const SELECTOR_WIDTH: u16 = 28;
const PAGE: isize = 10;

/// Why a selection cycle ended without a chart.
#[derive(Debug)]
pub enum Failure {
  /// The request failed, or the server answered with a non-2xx status.
  Transport(api::Error),
  /// The server answered with no records for the name.
  Empty,
  /// The server answered with something that is not a list of records.
  Malformed(api::Error),
}

impl From<api::Error> for Failure {
  fn from(e: api::Error) -> Self {
    if e.is_malformed() {
      Failure::Malformed(e)
    } else {
      Failure::Transport(e)
    }
  }
}

impl Failure {
  /// Returns the message shown to the user when looking up `name` failed.
  pub fn message(&self, name: &str) -> String {
    match self {
      Failure::Transport(e) => {
        format!("Error fetching data for {}: {}", name, e)
      }
      Failure::Empty => "No data found for that name.".to_string(),
      Failure::Malformed(e) => format!("Malformed data for {}: {}", name, e),
    }
  }
}

/// Where the current selection cycle is.
#[derive(Debug)]
pub enum Phase {
  /// Nothing is selected, or the placeholder is.
  Idle,
  /// A request for `name` is in flight.
  Loading { name: String },
  /// `name`'s chart is on screen.
  Rendered { name: String, chart: Chart },
  /// Looking up `name` failed.
  Failed { name: String, failure: Failure },
}

impl fmt::Display for Phase {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Phase::Idle => f.write_str("idle"),
      Phase::Loading { name } => write!(f, "loading {}", name),
      Phase::Rendered { name, .. } => write!(f, "showing {}", name),
      Phase::Failed { name, .. } => write!(f, "failed {}", name),
    }
  }
}

type Response = Result<Vec<NameRecord>, api::Error>;

/// The root browser type.
pub struct Browser {
  source: Arc<dyn Source>,
  catalog: Download<Result<Catalog, api::Error>>,
  catalog_error: Option<String>,

  /// Empty until the catalog arrives.
  selector: Selector,
  enabled: bool,

  rankings: Requests<Response>,
  phase: Phase,
  chart_scroll: usize,

  frame_number: usize,
  style_sheet: StyleSheet,
}

impl Browser {
  /// Creates a new browser over `source`, and starts downloading the catalog.
  pub fn new(source: Arc<dyn Source>) -> Self {
    let mut catalog: Download<Result<Catalog, api::Error>> = Download::new();
    catalog.start({
      let source = Arc::clone(&source);
      move || -> Result<Catalog, api::Error> {
        let records = source.catalog()?;
        Ok(Catalog::from_records(&records))
      }
    });

    Self {
      source,
      catalog,
      catalog_error: None,
      selector: Selector::default(),
      enabled: false,
      rankings: Requests::new(),
      phase: Phase::Idle,
      chart_scroll: 0,
      frame_number: 0,
      style_sheet: StyleSheet::default(),
    }
  }

  /// Returns the current phase of the selection cycle.
  pub fn phase(&self) -> &Phase {
    &self.phase
  }

  /// Returns whether the selector accepts input.
  pub fn is_enabled(&self) -> bool {
    self.enabled
  }

  /// Returns whether a download is in flight.
  pub fn is_busy(&self) -> bool {
    self.catalog.is_pending() || matches!(self.phase, Phase::Loading { .. })
  }

  /// Returns the selector's option labels, placeholder first.
  pub fn option_labels(&self) -> Vec<&str> {
    self.selector.labels()
  }

  /// Returns the text for the error region, if any.
  pub fn error_message(&self) -> Option<String> {
    if let Some(e) = &self.catalog_error {
      return Some(e.clone());
    }
    match &self.phase {
      Phase::Failed { name, failure } => Some(failure.message(name)),
      _ => None,
    }
  }

  /// Returns the text for the definition region, if any.
  pub fn meaning(&self) -> Option<&str> {
    match &self.phase {
      Phase::Rendered { chart, .. } => chart.meaning(),
      _ => None,
    }
  }

  /// Applies any downloads that have finished since the last call.
  ///
  /// Returns whether anything changed.
  pub fn poll(&mut self) -> bool {
    let mut changed = false;

    if !self.enabled && self.catalog_error.is_none() {
      match self.catalog.try_finish() {
        Some(Ok(catalog)) => {
          tracing::info!(names = catalog.len(), "catalog loaded");
          self.selector = Selector::from_catalog(catalog);
          self.enabled = true;
          changed = true;
        }
        Some(Err(e)) => {
          tracing::warn!(error = %e, "catalog failed to load");
          self.catalog_error = Some(format!("Failed to load names: {}", e));
          changed = true;
        }
        None => {}
      }

      if self.catalog.is_lost() {
        self.catalog_error = Some(
          "Failed to load names: the download stopped without a result"
            .to_string(),
        );
        changed = true;
      }
    }

    if let Some(response) = self.rankings.try_recv() {
      self.apply(response);
      changed = true;
    }

    changed
  }

  /// Starts a new selection cycle for `name`; `None` selects the placeholder.
  ///
  /// The chart, meaning and error regions are cleared first. Any request
  /// still in flight is superseded.
  pub fn choose(&mut self, name: Option<&str>) {
    self.phase = Phase::Idle;
    self.chart_scroll = 0;

    let name = match name.filter(|n| !n.is_empty()) {
      Some(name) => name.to_string(),
      None => {
        self.rankings.cancel();
        return;
      }
    };

    tracing::info!(%name, "selected");
    let source = Arc::clone(&self.source);
    let token = self.rankings.issue({
      let name = name.clone();
      move || source.rankings(&name)
    });
    tracing::debug!(%name, token, "requested rankings");
    self.phase = Phase::Loading { name };
  }

  fn apply(&mut self, response: Response) {
    let name = match std::mem::replace(&mut self.phase, Phase::Idle) {
      Phase::Loading { name } => name,
      other => {
        // Tokens make this unreachable in practice; keep whatever is shown.
        self.phase = other;
        return;
      }
    };

    self.phase = match response {
      Ok(records) if records.is_empty() => {
        tracing::warn!(%name, "no records");
        Phase::Failed {
          name,
          failure: Failure::Empty,
        }
      }
      Ok(records) => {
        let chart = Chart::with_geometry(&records, CHART_GEOMETRY);
        tracing::debug!(%name, bars = chart.bars().len(), "rendering chart");
        Phase::Rendered { name, chart }
      }
      Err(e) => {
        tracing::warn!(%name, error = %e, "rankings failed to load");
        Phase::Failed {
          name,
          failure: e.into(),
        }
      }
    };
  }

  /// Processes a key press.
  pub fn process_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Left => self.scroll_chart(-1),
      KeyCode::Right => self.scroll_chart(1),
      _ if !self.enabled => {}
      KeyCode::Up => {
        self.selector.move_by(-1);
      }
      KeyCode::Down => {
        self.selector.move_by(1);
      }
      KeyCode::PageUp => {
        self.selector.move_by(-PAGE);
      }
      KeyCode::PageDown => {
        self.selector.move_by(PAGE);
      }
      KeyCode::Home => {
        self.selector.move_to(0);
      }
      KeyCode::End => {
        self.selector.move_to_end();
      }
      KeyCode::Enter => {
        let name = self.selector.current().map(str::to_string);
        self.choose(name.as_deref());
      }
      _ => {}
    }
  }

  fn scroll_chart(&mut self, delta: isize) {
    if let Phase::Rendered { chart, .. } = &self.phase {
      let max = chart.bars().len().saturating_sub(1) as isize;
      self.chart_scroll =
        (self.chart_scroll as isize + delta).clamp(0, max) as usize;
    }
  }

  /// Renders the UI onto a `Frame`.
  pub fn render<B: Backend>(&mut self, f: &mut Frame<B>) {
    let ss = self.style_sheet;
    let size = f.size();

    let chrome = Chrome::new()
      .title("namedex")
      .footer(format!(
        "namedex v{}  ↑↓ move  ⏎ select  ←→ scroll  q quit",
        env!("CARGO_PKG_VERSION")
      ))
      .focus_title(true)
      .style(ss.unfocused)
      .focused_style(ss.focused.patch(ss.selected))
      .focused_delims(("<", ">"));
    let inner = chrome.inner(size);
    f.render_widget(chrome, size);

    let panes = Layout::default()
      .direction(Direction::Horizontal)
      .constraints(vec![Constraint::Length(SELECTOR_WIDTH), Constraint::Min(0)])
      .split(inner);
    self.render_selector(f, panes[0]);

    let rows = Layout::default()
      .direction(Direction::Vertical)
      .constraints(vec![
        Constraint::Min(3),
        Constraint::Length(2),
        Constraint::Length(1),
      ])
      .split(panes[1]);
    self.render_chart(f, rows[0]);

    if let Some(meaning) = self.meaning() {
      f.render_widget(
        Paragraph::new(meaning)
          .style(ss.focused)
          .wrap(Wrap { trim: true }),
        rows[1],
      );
    }

    if let Some(error) = self.error_message() {
      f.render_widget(Paragraph::new(Span::styled(error, ss.error)), rows[2]);
    }

    self.frame_number += 1;
  }

  fn render_selector<B: Backend>(&self, f: &mut Frame<B>, rect: Rect) {
    let ss = self.style_sheet;
    if self.catalog.is_pending() {
      f.render_widget(
        Spinner::new(self.frame_number)
          .label("Loading names...")
          .style(ss.unfocused),
        rect,
      );
      return;
    }
    if !self.is_enabled() {
      return;
    }

    let items = self
      .option_labels()
      .into_iter()
      .map(|label| ListItem::new(label.to_string()))
      .collect::<Vec<_>>();
    let list = List::new(items)
      .style(ss.unfocused)
      .highlight_style(ss.focused.patch(ss.selected))
      .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(self.selector.cursor()));
    f.render_stateful_widget(list, rect, &mut state);
  }

  fn render_chart<B: Backend>(&self, f: &mut Frame<B>, rect: Rect) {
    let ss = self.style_sheet;
    match &self.phase {
      Phase::Loading { name } => f.render_widget(
        Spinner::new(self.frame_number)
          .label(format!("Loading {}...", name))
          .style(ss.unfocused),
        rect,
      ),
      Phase::Rendered { chart, .. } => f.render_widget(
        RankChart::new(chart)
          .scroll(self.chart_scroll)
          .style(ss.focused)
          .bar_style(ss.bar)
          .highlight_style(ss.top_ten),
        rect,
      ),
      Phase::Idle | Phase::Failed { .. } => {}
    }
  }
}
