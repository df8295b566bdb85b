pub mod cli;
pub mod config;
pub mod draw;
pub mod error;
pub mod proc;

pub use error::{LifeError, Result};
