//! `namedex`: browse baby name popularity in the terminal.

use std::fs::File;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context as _;

use babynames::api;
use babynames::api::Options;
use babynames::cache::MemoryCache;
use babynames::Api;

use clap::Parser;

use crossterm::cursor;
use crossterm::event;
use crossterm::event::Event;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;
use crossterm::execute;
use crossterm::terminal;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;

use tracing_subscriber::EnvFilter;

use tui::backend::Backend;
use tui::backend::CrosstermBackend;
use tui::Terminal;

mod download;
mod ui;

use crate::ui::browser::Browser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Browse baby name popularity in the terminal", long_about = None)]
struct Args {
  /// Base URL of the name spreadsheet API.
  #[arg(long, default_value = api::DEFAULT_BASE_URL)]
  base_url: String,

  /// Number of responses to keep in memory; 0 refetches on every selection.
  #[arg(long, default_value_t = 64)]
  cache_size: usize,

  /// Write logs to this file. Without it, logs are discarded.
  #[arg(long)]
  log_file: Option<PathBuf>,
}

/// Redraw often enough to animate spinners while something is loading.
const BUSY_TICK: Duration = Duration::from_millis(50);
const IDLE_TICK: Duration = Duration::from_millis(250);

fn init_logging(path: Option<&Path>) -> anyhow::Result<()> {
  // The terminal belongs to the UI; logging there would scribble over it.
  let path = match path {
    Some(path) => path,
    None => return Ok(()),
  };

  let file = File::create(path)
    .with_context(|| format!("cannot create log file {}", path.display()))?;
  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new("info"));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(Mutex::new(file))
    .with_ansi(false)
    .try_init()
    .map_err(|e| anyhow::anyhow!("cannot install log subscriber: {}", e))
}

/// Runs `body` on whatever `open` produces, then calls `restore` whether or
/// not either of them failed. The first error wins.
fn guarded<T>(
  open: impl FnOnce() -> anyhow::Result<T>,
  body: impl FnOnce(T) -> anyhow::Result<()>,
  restore: impl FnOnce() -> anyhow::Result<()>,
) -> anyhow::Result<()> {
  let result = open().and_then(body);
  let restored = restore();
  result.and(restored)
}

fn open_terminal() -> anyhow::Result<Terminal<CrosstermBackend<io::Stdout>>> {
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen)?;
  Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal() -> anyhow::Result<()> {
  terminal::disable_raw_mode()?;
  execute!(io::stdout(), LeaveAlternateScreen, cursor::Show)?;
  Ok(())
}

fn main() -> anyhow::Result<()> {
  let args = Args::parse();
  init_logging(args.log_file.as_deref())?;

  let api = Api::with_options(Options {
    base_url: args.base_url,
    cache: MemoryCache::bounded(args.cache_size),
  });
  tracing::info!(base_url = api.base_url(), cache_size = args.cache_size, "starting");
  let mut browser = Browser::new(Arc::new(api));

  terminal::enable_raw_mode().context("cannot enable raw mode")?;
  let result = guarded(
    open_terminal,
    |mut terminal| run(&mut terminal, &mut browser),
    restore_terminal,
  );

  if let Err(e) = &result {
    tracing::error!(error = %e, "exiting with error");
  }
  result
}

fn run<B: Backend>(
  terminal: &mut Terminal<B>,
  browser: &mut Browser,
) -> anyhow::Result<()> {
  loop {
    if browser.poll() {
      tracing::debug!(phase = %browser.phase(), "state changed");
    }
    terminal.draw(|f| browser.render(f))?;

    let tick = if browser.is_busy() { BUSY_TICK } else { IDLE_TICK };
    if !event::poll(tick)? {
      continue;
    }

    match event::read()? {
      Event::Key(KeyEvent {
        code: KeyCode::Char('c'),
        modifiers,
      }) if modifiers.contains(KeyModifiers::CONTROL) => return Ok(()),
      Event::Key(KeyEvent {
        code: KeyCode::Char('q'),
        ..
      })
      | Event::Key(KeyEvent {
        code: KeyCode::Esc, ..
      }) => return Ok(()),
      Event::Key(k) => browser.process_key(k),
      _ => {}
    }
  }
}
