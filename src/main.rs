//! tlife - Conway's Game of Life in the terminal
//!
//! Move the cursor with W A S D, revive or kill cells with Space, start and
//! stop the simulation with Enter, clear the grid with P. Ctrl+C quits.

use std::{
    env,
    fs::{self, OpenOptions},
    process,
    sync::Mutex,
};

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tlife::{
    cli::{self, Command},
    config::{self, Config},
    draw::{self, App, Rect},
    proc::Space,
};

fn main() -> anyhow::Result<()> {
    let args = env::args_os().skip(1).map(|a| a.to_string_lossy().into_owned());
    match cli::parse(args) {
        Command::Run => {},
        Command::Help => {
            print!("{}", cli::help_text());
            return Ok(());
        },
        Command::Invalid(args) => {
            print!("{}", cli::invalid_text(&args));
            process::exit(1);
        },
    }

    init_logging();
    info!("tlife starting...");

    let config = Config::load();
    let size = Rect::term_size().context("Failed to read terminal size")?;
    info!("Terminal size: {}x{}", size.w(), size.h());

    let app = App::new(Space::new(size), config);
    if let Err(e) = draw::run(app) {
        error!("{}", e);
        return Err(e.into());
    }

    info!("tlife exiting");
    Ok(())
}

/// Logs go to `~/.tlife/tlife.log` since stdout belongs to the grid.
fn init_logging() {
    let Some(dir) = config::app_dir() else {
        return;
    };
    if fs::create_dir_all(&dir).is_err() {
        return;
    }

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("tlife.log"));

    if let Ok(file) = log_file {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}
