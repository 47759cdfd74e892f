// src/ui/tui.rs
//! Terminal setup and the fixed-rate render loop.

use std::{
    io::{self, Write},
    time::{Duration, Instant},
};

use anyhow::Result;
use crossterm::{
    cursor::Show,
    event::{self, Event as CEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::warn;

use crate::app::App;

/// Frame period for `fps`; 0 is treated as 1.
pub fn frame_interval(fps: u32) -> Duration {
    Duration::from_nanos(1_000_000_000 / fps.max(1) as u64)
}

/// Raw mode and the alternate screen, undone when dropped.
struct TerminalGuard<W: Write> {
    out: W,
    raw_mode: bool,
}

impl<W: Write> TerminalGuard<W> {
    fn enter(out: W) -> io::Result<Self> {
        enable_raw_mode()?;
        let mut guard = Self {
            out,
            raw_mode: true,
        };
        execute!(guard.out, EnterAlternateScreen)?;
        Ok(guard)
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        if self.raw_mode {
            if let Err(e) = disable_raw_mode() {
                warn!("Failed to leave raw mode: {}", e);
            }
        }
        if let Err(e) = execute!(self.out, LeaveAlternateScreen, Show) {
            warn!("Failed to restore the screen: {}", e);
        }
    }
}

/// Run the UI until the user quits. The terminal is restored on every exit path.
pub fn run(mut app: App, fps: u32) -> Result<()> {
    let _guard = TerminalGuard::enter(io::stdout())?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    event_loop(&mut terminal, &mut app, frame_interval(fps))
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tick_rate: Duration,
) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| app.draw(f))?;

        let timeout = tick_rate.checked_sub(last_tick.elapsed()).unwrap_or_default();
        if event::poll(timeout)? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.on_key(key) {
                    return Ok(());
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
            app.tick();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_interval() {
        assert_eq!(frame_interval(50), Duration::from_millis(20));
        assert_eq!(frame_interval(0), Duration::from_secs(1));
    }

    #[test]
    fn test_guard_restores_screen_on_drop() {
        let mut out = Vec::new();
        {
            let _guard = TerminalGuard {
                out: &mut out,
                raw_mode: false,
            };
        }
        let written = String::from_utf8(out).unwrap();
        assert!(written.contains("\x1b[?1049l"), "no leave sequence in {:?}", written);
        assert!(written.contains("\x1b[?25h"));
    }
}
