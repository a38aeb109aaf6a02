//! Terminal driver for pomo.

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    style::Print,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pomo::app::App;
use pomo::config::Config;
use pomo::store::SessionStore;
use pomo::{logging, ui};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

/// How often the driver ticks the timer.
const TICK_RATE: Duration = Duration::from_millis(100);

fn main() -> anyhow::Result<()> {
    logging::init(&Config::diagnostics_path())?;
    let config = Config::load();

    // Build before touching the terminal so configuration errors print normally.
    let mut app = App::new(&config)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(error = %err, "exiting on error");
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }

    println!(
        "Pomodoro session ended: {} completed today. Keep focused!",
        app.cycle.sessions_today()
    );
    Ok(())
}

fn run_app<B: ratatui::backend::Backend, S: SessionStore>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        // Poll with timeout for timer updates
        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if key.code == KeyCode::Char('q') && key.modifiers.is_empty() && app.can_quit() {
                        break;
                    }
                    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                        break;
                    }
                    app.handle_key(key);
                }
            }
        }

        if app.tick() {
            execute!(io::stdout(), Print('\x07'))?;
        }
    }

    Ok(())
}
