use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io;
use tracing::{debug, info};

use mortgage_calc::config::Config;
use mortgage_calc::form::App;
use mortgage_calc::{logging, ui};

fn main() -> Result<()> {
    let config = Config::load()?;
    logging::init_logging(&config)?;
    info!(variant = ?config.variant, path = %Config::path().display(), "loaded config");

    let app = App::new(config.variant, config.defaults.into());

    let res = {
        let _guard = TerminalGuard::new()?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend).context("failed to initialize terminal")?;
        let res = run_app(&mut terminal, app, event::read);
        terminal.show_cursor()?;
        res
    };

    // The guard has restored the terminal, so the error prints on a normal screen.
    res
}

/// Leaves raw mode and the alternate screen when dropped, including on error.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e).context("failed to enter alternate screen");
        }
        debug!("terminal ready");
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        debug!("terminal restored");
    }
}

fn run_app<B, E>(terminal: &mut Terminal<B>, mut app: App, mut next_event: E) -> Result<()>
where
    B: Backend,
    E: FnMut() -> io::Result<Event>,
{
    loop {
        terminal.draw(|f| ui::ui(f, &app))?;

        if let Event::Key(key) = next_event().context("failed to read terminal event")? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventState, KeyModifiers};
    use mortgage_calc::form::{FormVariant, MortgageInputs};
    use ratatui::backend::TestBackend;

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    fn test_terminal() -> Terminal<TestBackend> {
        Terminal::new(TestBackend::new(100, 30)).unwrap()
    }

    #[test]
    fn read_failure_is_returned_to_the_caller() {
        let mut terminal = test_terminal();
        let app = App::new(FormVariant::Typed, MortgageInputs::default());

        let err = run_app(&mut terminal, app, || {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "tty went away"))
        })
        .unwrap_err();

        assert!(format!("{err:#}").contains("tty went away"));
    }

    #[test]
    fn escape_press_ends_the_loop() {
        let mut terminal = test_terminal();
        let app = App::new(FormVariant::Simple, MortgageInputs::default());
        let mut events = vec![
            key(KeyCode::Esc, KeyEventKind::Press),
            key(KeyCode::Esc, KeyEventKind::Release),
            key(KeyCode::Char('5'), KeyEventKind::Press),
        ];

        run_app(&mut terminal, app, || {
            events
                .pop()
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no more events"))
        })
        .unwrap();

        assert!(events.is_empty());
    }
}
