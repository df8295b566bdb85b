use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LifeError {
    #[error("Terminal I/O failed: {0}")]
    Terminal(#[from] io::Error),

    #[error("Terminal is too small for a grid ({w}x{h})")]
    TerminalTooSmall { w: u16, h: u16 },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Grid lock poisoned by a panicking thread")]
    Poisoned,

    #[error("Tick thread panicked")]
    TickPanicked,
}

pub type Result<T> = std::result::Result<T, LifeError>;
