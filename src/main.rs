use crate::{
    config::{Config, ConfigOverrides},
    render::{ScannerView, TerminalSession},
    scanner::{PollableState, Scanner},
};
use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal,
};
use std::{
    io::{self, Write},
    path::PathBuf,
    time::{Duration, Instant},
};
use tracing::info;

mod config;
mod logging;
mod render;
mod scanner;

/// How long to wait for input once the animation is no longer ticking.
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Run a scanner light wave across a grid in your terminal.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The path to the configuration file.
    #[clap(short, long, env = "SCANNER_WAVE_CONFIG")]
    config: Option<PathBuf>,

    /// The number of rows in the grid.
    #[clap(long)]
    rows: Option<usize>,

    /// The number of columns in the grid.
    #[clap(long)]
    columns: Option<usize>,

    /// The number of columns the light fades out over.
    #[clap(short, long)]
    band_width: Option<usize>,

    /// How often the wave moves, in milliseconds.
    #[clap(short, long = "interval-ms")]
    interval_ms: Option<u64>,

    /// Write logs to this file.
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            rows: self.rows,
            columns: self.columns,
            band_width: self.band_width,
            tick_interval_ms: self.interval_ms,
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => Config::load_default()?,
    };
    cli.overrides().apply(&mut config);
    Ok(config)
}

/// What the event loop should do after handling an input event.
enum Action {
    Continue,
    Quit,
}

fn handle_event(event: Event, view: &mut ScannerView) -> Action {
    match event {
        Event::Key(KeyEvent { code, modifiers, kind: KeyEventKind::Press, .. }) => match code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
            _ => Action::Continue,
        },
        Event::Resize(width, height) => {
            view.resize(width, height);
            Action::Continue
        }
        _ => Action::Continue,
    }
}

fn run<W: Write>(writer: &mut W, scanner: &mut Scanner, view: &mut ScannerView) -> anyhow::Result<()> {
    view.draw(writer, scanner)?;
    loop {
        let timeout = scanner.time_until_tick(Instant::now()).unwrap_or(IDLE_POLL);
        if event::poll(timeout)? {
            if let Action::Quit = handle_event(event::read()?, view) {
                return Ok(());
            }
        }
        match scanner.poll(Instant::now()) {
            PollableState::Modified | PollableState::Unmodified => (),
            PollableState::Done => return Ok(()),
        }
        // resizes need a redraw even if the wave didn't move
        view.draw(writer, scanner)?;
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        logging::init_file_logging(path)?;
    }
    let config = load_config(&cli)?;
    let settings = config.scanner_settings().context("invalid configuration")?;

    let mut session = TerminalSession::start(io::stdout()).context("setting up terminal")?;
    let (width, height) = terminal::size()?;
    let mut view = ScannerView::new(config.title, config.subtitle, settings.grid, (width, height));
    let mut scanner = Scanner::mount(settings, Instant::now());

    let result = run(session.writer(), &mut scanner, &mut view);
    scanner.unmount();
    drop(session);
    info!("exiting");
    result
}
