//! `catfacts`, the terminal front-end for the cat fact tracker.
//!
//! # Usage
//!
//! ```
//! catfacts --url http://localhost:8000
//! catfacts --config ~/.config/catfacts.toml --log-file /tmp/catfacts.log
//! catfacts list --filter favorites --page 2
//! catfacts seed --count 25
//! catfacts --demo
//! ```

mod app;
mod commands;
mod settings;
mod timestamp;
mod ui;

use std::{
  fs::File,
  io,
  path::{Path, PathBuf},
  sync::{Arc, Mutex},
  time::Duration,
};

use anyhow::{Context, Result};
use app::{App, SharedManager};
use catfacts_client::HttpFactService;
use catfacts_core::{
  FactManager,
  memory::{DEFAULT_SUGGESTIONS, MemoryService},
  notify::{NotificationLog, TracingNotifier},
  service::FactService,
  view::Filter,
};
use clap::{Parser, Subcommand};
use crossterm::{
  event::{self, Event, KeyEventKind},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use settings::{Overrides, Settings};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "catfacts", version, about = "Collect, favorite and browse cat facts")]
struct Args {
  /// Path to a TOML settings file. Missing is fine.
  #[arg(short, long, value_name = "FILE", env = "CATFACTS_CONFIG", default_value = "catfacts.toml")]
  config: PathBuf,

  /// Base URL of the fact service (default: http://localhost:8000).
  #[arg(long)]
  url: Option<String>,

  /// Path the collection is mounted at (default: /facts).
  #[arg(long)]
  facts_path: Option<String>,

  /// Facts per page (default: 5).
  #[arg(long)]
  page_size: Option<usize>,

  /// Request timeout in seconds. Unset means no timeout.
  #[arg(long)]
  timeout_secs: Option<u64>,

  /// Hide deleted facts locally instead of asking the service to delete.
  #[arg(long)]
  local_delete: bool,

  /// Forget favorites whenever the collection reloads.
  #[arg(long)]
  reset_favorites: bool,

  /// Use an in-process service seeded with a few facts instead of HTTP.
  #[arg(long)]
  demo: bool,

  /// Write logs here. The terminal UI logs nowhere without it.
  #[arg(long, value_name = "FILE")]
  log_file: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Print one page of facts and the totals.
  List {
    /// all, favorites, user or api.
    #[arg(long, default_value_t = Filter::All)]
    filter: Filter,

    #[arg(long, default_value_t = 1)]
    page: usize,
  },
  /// Store a number of random suggestions.
  Seed {
    #[arg(long, default_value_t = 10)]
    count: usize,
  },
}

impl Args {
  fn overrides(&self) -> Overrides {
    Overrides {
      base_url:        self.url.clone(),
      facts_path:      self.facts_path.clone(),
      page_size:       self.page_size,
      timeout_secs:    self.timeout_secs,
      local_delete:    self.local_delete,
      reset_favorites: self.reset_favorites,
    }
  }
}

// ─── Entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  init_tracing(args.log_file.as_deref(), args.command.is_none())?;

  let settings = Settings::load(&args.config)?.apply(args.overrides());
  tracing::debug!(?settings, "settings loaded");

  if args.demo {
    let service = MemoryService::with_facts(DEFAULT_SUGGESTIONS.iter().take(3).copied());
    run(service, &settings, args.command).await
  } else {
    let service = HttpFactService::new(settings.api_config()).context("creating HTTP client")?;
    run(service, &settings, args.command).await
  }
}

/// Logs go to `log_file` when given, to stderr for subcommands, and nowhere
/// for the terminal UI.
fn init_tracing(log_file: Option<&Path>, interactive: bool) -> Result<()> {
  let filter = EnvFilter::builder()
    .with_default_directive(LevelFilter::INFO.into())
    .from_env_lossy();

  match log_file {
    Some(path) => {
      let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
      tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    }
    None if !interactive => {
      tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    }
    None => {}
  }
  Ok(())
}

async fn run<S: FactService + 'static>(
  service: S,
  settings: &Settings,
  command: Option<Command>,
) -> Result<()> {
  let log = Arc::new(NotificationLog::new());
  let sink = (TracingNotifier, Arc::clone(&log));
  let manager: SharedManager<S> = Arc::new(FactManager::new(service, sink, settings.manager_config()?));

  match command {
    Some(Command::List { filter, page }) => commands::list(&manager, filter, page).await,
    Some(Command::Seed { count }) => {
      let report = commands::seed(&manager, count).await;
      println!("{report}");
      Ok(())
    }
    None => run_tui(App::new(manager, log)).await,
  }
}

async fn run_tui<S: FactService + 'static>(mut app: App<S>) -> Result<()> {
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  app.refresh();
  let run_result = run_event_loop(&mut terminal, &mut app).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ──────────────────────────────────────────────────────────────

async fn run_event_loop<S: FactService + 'static>(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App<S>,
) -> Result<()> {
  loop {
    app.tick();
    let view = app.view();
    terminal
      .draw(|f| ui::draw(f, app, &view))
      .context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event {
      if key.kind == KeyEventKind::Press && !app.handle_key(key) {
        break;
      }
    }
  }

  Ok(())
}
