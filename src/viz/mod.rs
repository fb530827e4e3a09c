//! A terminal dashboard that plots per-episode metrics while an agent trains
//!
//! The dashboard runs on its own thread and receives one [`Update`] per episode over a channel.
//! Dropping the sender marks the run as finished; the dashboard stays open until `q` is pressed.

use std::{
    io,
    sync::mpsc::{self, Sender},
    thread::{self, JoinHandle},
};

use log::LevelFilter;

mod app;
mod components;
mod tui;
mod util;

use app::App;
pub use app::Update;

/// Spawn the dashboard
///
/// Installs [`tui_logger`] as the global logger, so everything logged through the `log` facade
/// shows up in the Logs tab.
///
/// ### Parameters
/// - `plots` - One name per metric, in the same order as [`Update::data`]
/// - `episodes` - Expected length of the run, used for the x axis and progress bar
///
/// **Returns** the dashboard thread and the sender to feed it, or an error if a global logger
/// was already installed
pub fn init(
    plots: &[&'static str],
    episodes: u32,
) -> Result<(JoinHandle<io::Result<()>>, Sender<Update>), log::SetLoggerError> {
    tui_logger::init_logger(LevelFilter::Trace)?;
    tui_logger::set_default_level(LevelFilter::Debug);

    let (tx, rx) = mpsc::channel();
    let mut app = App::new(plots, episodes);
    let handle = thread::spawn(move || app.run(rx));

    Ok((handle, tx))
}

/// Wait for the dashboard to be closed
///
/// **Returns** the dashboard's terminal error, or an error if its thread panicked
pub fn join(handle: JoinHandle<io::Result<()>>) -> io::Result<()> {
    handle
        .join()
        .map_err(|_| io::Error::other("dashboard thread panicked"))?
}
