//! `tui` widgets used by the browser.

use std::iter;

use babynames::model::chart::MAX_HEIGHT;
use babynames::model::Chart;

use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::Modifier;
use tui::style::Style;
use tui::symbols;
use tui::text::Span;
use tui::text::Spans;
use tui::widgets::Widget;

/// A spinner for indicating that a request is in flight.
#[derive(Clone, Debug)]
pub struct Spinner<'a> {
  frame_number: usize,
  label: Option<Spans<'a>>,
  style: Style,
  frequency: usize,
}

impl<'a> Spinner<'a> {
  pub fn new(frame_number: usize) -> Self {
    Self {
      frame_number,
      label: None,
      style: Style::default(),
      frequency: 2,
    }
  }

  pub fn label(mut self, label: impl Into<Spans<'a>>) -> Self {
    self.label = Some(label.into());
    self
  }

  pub fn style(mut self, style: Style) -> Self {
    self.style = style;
    self
  }

  pub fn into_spans(self) -> Spans<'a> {
    let icon = match self.frame_number / self.frequency % 4 {
      0 => "-",
      1 => "/",
      2 => "|",
      3 => "\\",
      _ => "?",
    };

    let mut spans = self.label.unwrap_or_default();
    for span in &mut spans.0 {
      span.style = self.style.patch(span.style);
    }

    if !spans.0.iter().all(|s| s.content.is_empty()) {
      spans.0.push(Span::styled(" ", self.style));
    }
    spans.0.push(Span::styled(icon, self.style));

    spans
  }
}

impl Widget for Spinner<'_> {
  fn render(self, rect: Rect, buf: &mut Buffer) {
    buf.set_spans(rect.x, rect.y, &self.into_spans(), rect.width);
  }
}

/// A frame that wraps around a rectangle with a title bar and a footer bar.
///
/// The title can be marked as "focused", which draws it with a different
/// style and surrounding delimiters.
#[derive(Clone, Debug)]
pub struct Chrome<'a> {
  title: Option<Spans<'a>>,
  footer: Option<Spans<'a>>,
  is_title_focused: bool,
  style: Style,
  focused_style: Style,
  focused_delims: Option<(&'a str, &'a str)>,
}

impl<'a> Chrome<'a> {
  pub fn new() -> Self {
    Self {
      title: None,
      footer: None,
      is_title_focused: false,
      style: Style::default(),
      focused_style: Style::default(),
      focused_delims: None,
    }
  }

  pub fn title(mut self, title: impl Into<Spans<'a>>) -> Self {
    self.title = Some(title.into());
    self
  }

  pub fn footer(mut self, footer: impl Into<Spans<'a>>) -> Self {
    self.footer = Some(footer.into());
    self
  }

  pub fn focus_title(mut self, focused: bool) -> Self {
    self.is_title_focused = focused;
    self
  }

  pub fn style(mut self, style: Style) -> Self {
    self.style = style;
    self
  }

  pub fn focused_style(mut self, style: Style) -> Self {
    self.focused_style = style;
    self
  }

  pub fn focused_delims(mut self, delims: (&'a str, &'a str)) -> Self {
    self.focused_delims = Some(delims);
    self
  }

  /// Returns the area left inside the frame.
  pub fn inner(&self, rect: Rect) -> Rect {
    Rect::new(
      rect.x + 1,
      rect.y + 1,
      rect.width.saturating_sub(2),
      rect.height.saturating_sub(2),
    )
  }
}

impl Widget for Chrome<'_> {
  fn render(self, rect: Rect, buf: &mut Buffer) {
    if rect.height < 2 {
      return;
    }

    let Chrome {
      title,
      footer,
      is_title_focused,
      style,
      focused_style,
      focused_delims,
    } = self;

    let pipe = symbols::block::ONE_QUARTER;
    let base_style = style;
    let focused_style = style.patch(focused_style);
    let make_bar = |spans, is_focused| {
      let mut bar = Spans::default();
      bar.0.push(Span::styled(pipe, base_style));
      bar.0.push(Span::styled(pipe, base_style));

      if let Some(Spans(spans)) = spans {
        let (l, r) = focused_delims.unwrap_or((" ", " "));
        bar.0.push(Span::styled(
          if is_focused { l } else { " " },
          focused_style.add_modifier(Modifier::REVERSED),
        ));
        for mut span in spans {
          span.style = if is_focused {
            focused_style.patch(span.style)
          } else {
            base_style.patch(span.style)
          }
          .add_modifier(Modifier::REVERSED);
          bar.0.push(span);
        }
        bar.0.push(Span::styled(
          if is_focused { r } else { " " },
          focused_style.add_modifier(Modifier::REVERSED),
        ));
      }

      let rest_len = (rect.width as usize).saturating_sub(bar.width());
      bar.0.push(Span::styled(
        iter::repeat(pipe).take(rest_len).collect::<String>(),
        base_style,
      ));

      bar
    };

    buf.set_spans(
      rect.x,
      rect.y,
      &make_bar(title, is_title_focused),
      rect.width,
    );
    buf.set_spans(
      rect.x,
      rect.y + rect.height - 1,
      &make_bar(footer, false),
      rect.width,
    );
  }
}

/// A bar chart of a name's yearly rank.
///
/// Bars are placed at their [`Bar::offset`][babynames::model::Bar] columns,
/// relative to the first visible bar, with the year along the bottom row and
/// the rank (or a no-data marker) just above the top of each bar. Bar heights
/// are scaled so that [`MAX_HEIGHT`] fills the whole area.
#[derive(Clone, Debug)]
pub struct RankChart<'a> {
  chart: &'a Chart,
  scroll: usize,
  bar_width: u16,
  style: Style,
  bar_style: Style,
  highlight_style: Style,
}

impl<'a> RankChart<'a> {
  pub fn new(chart: &'a Chart) -> Self {
    Self {
      chart,
      scroll: 0,
      bar_width: 6,
      style: Style::default(),
      bar_style: Style::default(),
      highlight_style: Style::default(),
    }
  }

  /// Sets the index of the leftmost bar to draw.
  pub fn scroll(mut self, scroll: usize) -> Self {
    self.scroll = scroll;
    self
  }

  pub fn style(mut self, style: Style) -> Self {
    self.style = style;
    self
  }

  pub fn bar_style(mut self, style: Style) -> Self {
    self.bar_style = style;
    self
  }

  pub fn highlight_style(mut self, style: Style) -> Self {
    self.highlight_style = style;
    self
  }
}

/// Scales a logical bar height to a number of terminal rows.
///
/// Any non-zero height gets at least one row.
pub fn scaled_rows(height: u32, rows: u16) -> u16 {
  let max = u64::from(MAX_HEIGHT);
  let height = u64::from(height.min(MAX_HEIGHT));
  ((height * u64::from(rows) + max - 1) / max) as u16
}

impl Widget for RankChart<'_> {
  fn render(self, rect: Rect, buf: &mut Buffer) {
    // One row for years, one for the rank label, and at least one for bars.
    if rect.height < 3 || rect.width == 0 {
      return;
    }

    let bars = self.chart.bars();
    let origin = match bars.get(self.scroll) {
      Some(bar) => bar.offset,
      None => return,
    };

    let year_y = rect.y + rect.height - 1;
    let max_rows = rect.height - 2;
    for bar in &bars[self.scroll..] {
      let dx = bar.offset.saturating_sub(origin);
      if dx >= u32::from(rect.width) {
        break;
      }
      let x = rect.x + dx as u16;
      let room = rect.width - dx as u16;

      let (bar_style, label_style) = if bar.highlighted {
        (
          self.bar_style.patch(self.highlight_style),
          self.style.patch(self.highlight_style),
        )
      } else {
        (self.bar_style, self.style)
      };

      buf.set_stringn(x, year_y, bar.year_label(), room as usize, self.style);

      let rows = scaled_rows(bar.height, max_rows);
      for row in 0..rows {
        for col in 0..self.bar_width.min(room) {
          let cell = buf.get_mut(x + col, year_y - 1 - row);
          cell.set_symbol(symbols::block::FULL);
          cell.set_style(bar_style);
        }
      }

      buf.set_stringn(
        x,
        year_y - 1 - rows,
        bar.value_label(),
        room as usize,
        label_style,
      );
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use babynames::model::chart::NO_DATA;
  use babynames::model::Geometry;
  use babynames::model::Lenient;
  use babynames::NameRecord;

  use tui::style::Color;

  fn chart(rows: &[(&str, &str)]) -> Chart {
    let records = rows
      .iter()
      .map(|&(year, rank)| NameRecord {
        name: "Ada".to_string(),
        year: Lenient::parse(year),
        rank: Lenient::parse(rank),
        meaning: None,
      })
      .collect::<Vec<_>>();
    Chart::with_geometry(
      &records,
      Geometry {
        origin: 0,
        stride: 10,
      },
    )
  }

  fn lines(buf: &Buffer) -> Vec<String> {
    let width = buf.area.width as usize;
    buf
      .content
      .chunks(width)
      .map(|row| row.iter().map(|c| c.symbol.as_str()).collect())
      .collect()
  }

  #[test]
  fn row_scaling() {
    assert_eq!(scaled_rows(0, 10), 0);
    assert_eq!(scaled_rows(1, 10), 1);
    assert_eq!(scaled_rows(MAX_HEIGHT, 10), 10);
    assert_eq!(scaled_rows(124, 10), 5);
  }

  #[test]
  fn draws_years_left_to_right() {
    let chart = chart(&[("2000", "5"), ("1999", "0")]);
    let rect = Rect::new(0, 0, 30, 8);
    let mut buf = Buffer::empty(rect);
    RankChart::new(&chart)
      .highlight_style(Style::default().fg(Color::Red))
      .render(rect, &mut buf);

    let lines = lines(&buf);
    assert_eq!(&lines[7][..14], "1999      2000");

    // The unranked year has no bar, just the marker right above its label.
    assert_eq!(&lines[6][..NO_DATA.len()], NO_DATA);

    // Rank 5 fills all six bar rows, with its label above them.
    assert_eq!(&lines[0][10..11], "5");
    for y in 1..7 {
      let cell = buf.get(10, y);
      assert_eq!(cell.symbol, symbols::block::FULL);
      assert_eq!(cell.fg, Color::Red);
    }
  }

  #[test]
  fn scroll_hides_leading_bars() {
    let chart = chart(&[("1990", "500"), ("1991", "600"), ("1992", "700")]);
    let rect = Rect::new(0, 0, 20, 5);
    let mut buf = Buffer::empty(rect);
    RankChart::new(&chart).scroll(1).render(rect, &mut buf);

    let lines = lines(&buf);
    assert!(lines[4].starts_with("1991      1992"));
    assert!(!lines[4].contains("1990"));
  }

  #[test]
  fn too_small_area_draws_nothing() {
    let chart = chart(&[("2000", "1")]);
    let rect = Rect::new(0, 0, 10, 2);
    let mut buf = Buffer::empty(rect);
    RankChart::new(&chart).render(rect, &mut buf);
    assert!(lines(&buf).iter().all(|l| l.trim().is_empty()));
  }
}
