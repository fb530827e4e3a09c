use std::{
    io::{self, stdout, Stdout},
    panic,
};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, widgets::Widget, Terminal};

/// Raw-mode alternate screen, restored when dropped
pub(super) struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Tui {
    pub fn enter() -> io::Result<Self> {
        install_panic_hook();
        enable_raw_mode()?;
        let terminal = restore_on_err(
            execute!(stdout(), EnterAlternateScreen)
                .and_then(|_| Terminal::new(CrosstermBackend::new(stdout()))),
            restore,
        )?;
        Ok(Self { terminal })
    }

    pub fn draw<W: Widget>(&mut self, widget: W) -> io::Result<()> {
        self.terminal
            .draw(|frame| frame.render_widget(widget, frame.size()))?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = restore();
    }
}

fn restore() -> io::Result<()> {
    execute!(stdout(), LeaveAlternateScreen)?;
    disable_raw_mode()
}

/// Undo a partial setup when a later setup step fails
fn restore_on_err<T>(
    result: io::Result<T>,
    restore: impl FnOnce() -> io::Result<()>,
) -> io::Result<T> {
    result.map_err(|err| {
        let _ = restore();
        err
    })
}

/// Leave the alternate screen before a panic message is printed
fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore();
        original_hook(panic_info);
    }));
}
