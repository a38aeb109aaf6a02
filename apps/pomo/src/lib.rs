//! pomo - Pomodoro timer for the terminal.
//!
//! Alternates focus intervals with short breaks and a long break after every
//! fourth completed focus interval. Each concluded interval is appended to a
//! CSV session log.

pub mod app;
pub mod clock;
pub mod config;
pub mod countdown;
pub mod cycle;
pub mod digits;
pub mod logging;
pub mod models;
pub mod stats;
pub mod store;
pub mod ui;
