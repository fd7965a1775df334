//! Terminal kiosk driver
//!
//! Crossterm input polled every 100ms, a one-second tick for the thanks
//! countdown, and the alternate screen as "fullscreen".

mod app;
mod ui;

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
    enable_raw_mode,
};
use ratatui::prelude::*;

use crate::core::{FullscreenControl, Kiosk, KioskResult};

pub use app::App;

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Alternate screen as the terminal's fullscreen mode
#[derive(Debug)]
pub struct TerminalDisplay {
    fullscreen: bool,
}

impl TerminalDisplay {
    fn new() -> Self {
        Self { fullscreen: false }
    }
}

impl FullscreenControl for TerminalDisplay {
    fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn enter(&mut self) -> KioskResult<()> {
        execute!(io::stdout(), EnterAlternateScreen)?;
        self.fullscreen = true;
        Ok(())
    }

    fn exit(&mut self) -> KioskResult<()> {
        execute!(io::stdout(), LeaveAlternateScreen, Clear(ClearType::All))?;
        self.fullscreen = false;
        Ok(())
    }
}

/// Set up the terminal, run the kiosk until quit, restore the terminal
pub async fn run(kiosk: Kiosk) -> anyhow::Result<()> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnableMouseCapture)?;

    let mut display = TerminalDisplay::new();
    if kiosk.store().fullscreen_preference() {
        display.enter()?;
    }

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = App::new(kiosk, display);
    let res = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    if app.display.is_fullscreen() {
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    }
    execute!(terminal.backend_mut(), DisableMouseCapture)?;
    terminal.show_cursor()?;

    res
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> anyhow::Result<()> {
    terminal.draw(|f| ui::draw(f, app))?;
    app.kiosk.init().await?;

    let mut last_tick = Instant::now();
    loop {
        app.sync_inputs();
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(POLL_INTERVAL)? {
            let area = terminal.size()?;
            match event::read()? {
                Event::Key(key)
                    if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) =>
                {
                    app.interaction()?;
                    app.handle_key(key, terminal).await?;
                }
                Event::Mouse(mouse) => {
                    app.interaction()?;
                    app.handle_mouse(mouse, area.height);
                }
                Event::Resize(_, _) => terminal.clear()?,
                _ => {}
            }
        }

        if app.take_redraw() {
            terminal.clear()?;
        }

        if last_tick.elapsed() >= TICK_INTERVAL {
            app.kiosk.tick();
            last_tick = Instant::now();
        }

        if app.should_quit {
            tracing::info!("Kiosk shutting down");
            return Ok(());
        }
    }
}
