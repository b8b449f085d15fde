//! Entry point for the **vulcanboard** binary.
//!
//! Loads and validates the configuration (exiting with status 1 on any
//! error), then drives the board.  Events from stdin are read on a
//! background thread and processed on the main thread.
//!
//! When the `frontend-gtk` feature is enabled the main thread runs the
//! GLib main loop and shows the board in a window.  Without the feature,
//! or with `--headless`, a simple blocking loop over stdin events is used
//! instead.

use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use std::sync::mpsc;
use vulcanboard::board::{Board, Flow};
use vulcanboard::config::{default_config_path, Config, ConfigError};
use vulcanboard::event::BoardEvent;
use vulcanboard::input::lines::LineSource;
use vulcanboard::launcher::ShellLauncher;
use vulcanboard::traits::{EventSource, Launcher};

#[derive(Parser, Debug)]
#[command(name = "vulcanboard", version, about = "A configurable touchscreen hotkey board")]
struct Cli {
    /// Start fullscreen, regardless of the config file.
    #[arg(short = 'f', long)]
    fullscreen: bool,

    /// Config file to use instead of <config dir>/VulcanBoard/config.yml.
    #[arg(short = 'c', long = "config-file", value_name = "PATH")]
    config_file: Option<PathBuf>,

    /// Validate the config file, print a summary and exit.
    #[arg(long)]
    check: bool,

    /// Read events from stdin only; do not open a window.
    #[arg(long)]
    headless: bool,
}

//  Main

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = load_config(cli.config_file.clone());
    if cli.check {
        print_summary(&config);
        return;
    }

    if let Some(note) = ignored_fullscreen(&cli) {
        log::warn!("{}", note);
    }
    let board = Board::new(config, ShellLauncher::new());
    if cli.headless {
        run_headless(board);
    } else {
        run_gui(board, cli.fullscreen);
    }
}

/// Warning for `-f` when no window will be shown.
fn ignored_fullscreen(cli: &Cli) -> Option<&'static str> {
    if !cli.fullscreen {
        None
    } else if cli.headless {
        Some("--fullscreen has no effect with --headless")
    } else if cfg!(feature = "frontend-gtk") {
        None
    } else {
        Some("--fullscreen has no effect without a window")
    }
}

/// Load the config from `--config-file` or the default location, exiting
/// on failure.
fn load_config(override_path: Option<PathBuf>) -> Config {
    let path = match override_path.or_else(default_config_path) {
        Some(path) => path,
        None => {
            error!("no config directory on this platform; pass --config-file");
            std::process::exit(1);
        }
    };
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e @ ConfigError::Io { .. }) => {
            error!("{}", e);
            std::process::exit(1);
        }
        Err(e) => {
            error!("{}: {}", path.display(), e);
            std::process::exit(1);
        }
    }
}

fn print_summary(config: &Config) {
    let initial = config
        .state(config.initial_state())
        .map(|s| s.name())
        .unwrap_or_default();
    println!(
        "config OK: {}x{} grid, {} state(s), {} button(s), initial state {:?}",
        config.rows(),
        config.columns(),
        config.states().len(),
        config.button_count(),
        initial
    );
}

//  Event loops

#[cfg(feature = "frontend-gtk")]
fn run_gui<L: Launcher + 'static>(board: Board<L>, fullscreen: bool) {
    let (event_tx, event_rx) = mpsc::channel::<BoardEvent>();
    spawn_event_sources(event_tx.clone());
    if let Err(e) =
        vulcanboard::frontend::gtk::run_main_loop(board, event_tx, event_rx, fullscreen)
    {
        error!("failed to start GTK: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "frontend-gtk"))]
fn run_gui<L: Launcher>(board: Board<L>, _fullscreen: bool) {
    log::warn!("built without the `frontend-gtk` feature, running headless");
    run_headless(board);
}

/// Process stdin events until end of input or `quit`.
fn run_headless<L: Launcher>(mut board: Board<L>) {
    let (event_tx, event_rx) = mpsc::channel::<BoardEvent>();
    spawn_event_sources(event_tx);

    info!("vulcanboard running, state {:?}", board.active_state().name());
    for event in event_rx {
        match board.handle(event) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => error!("event error: {}", e),
        }
    }
    info!("exiting");
}

//  Helpers

fn spawn_event_sources(tx: mpsc::Sender<BoardEvent>) {
    let spawned = std::thread::Builder::new()
        .name("stdin-events".into())
        .spawn(move || {
            let mut source = LineSource::stdin();
            if let Err(e) = source.run(tx) {
                error!("stdin reader error: {}", e);
            }
        });
    if let Err(e) = spawned {
        error!("could not start stdin reader: {}", e);
    }
}
