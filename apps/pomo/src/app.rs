//! Application state and key handling.

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::countdown::Transition;
use crate::cycle::{Advance, Cycle};
use crate::store::{CsvSessionLog, SessionStore, StoreError};
use crate::stats::DaySummary;
use crossterm::event::{KeyCode, KeyEvent};
use std::rc::Rc;

pub struct App<S: SessionStore> {
    pub cycle: Cycle<S>,
    pub summary: DaySummary,
    pub editing: bool,
    pub input_buffer: String,
    pub message: Option<String>,
    pub show_help: bool,
}

impl App<CsvSessionLog> {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let log = CsvSessionLog::open(config.session_log_path())?;
        tracing::info!(path = %log.path().display(), "session log ready");
        let clock: Rc<dyn Clock> = Rc::new(SystemClock::new());
        let cycle = Cycle::new(&config.durations, log, clock)?;
        Ok(Self::with_cycle(cycle))
    }
}

impl<S: SessionStore> App<S> {
    pub fn with_cycle(cycle: Cycle<S>) -> Self {
        let mut app = Self {
            cycle,
            summary: DaySummary::default(),
            editing: false,
            input_buffer: String::new(),
            message: None,
            show_help: false,
        };
        app.refresh_summary();
        app
    }

    pub fn can_quit(&self) -> bool {
        !self.editing
    }

    /// Called by the driver on every loop iteration. Returns true when an
    /// interval just finished.
    pub fn tick(&mut self) -> bool {
        match self.cycle.tick() {
            Ok(Some(advance)) => {
                self.message = Some(format!(
                    "{} complete! Next: {}",
                    advance.from.name(),
                    advance.to.name()
                ));
                self.refresh_summary();
                true
            }
            Ok(None) => false,
            Err(e) => {
                self.report_store_error(e);
                false
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.show_help {
            self.show_help = false;
            return;
        }

        if self.editing {
            self.handle_edit_key(key);
            return;
        }

        self.message = None;
        match key.code {
            KeyCode::Char('s') => {
                let transition = self.cycle.start_current();
                self.message = Some(transition_message(transition).to_string());
            }
            KeyCode::Char('p') => {
                let transition = self.cycle.pause_current();
                self.message = Some(transition_message(transition).to_string());
            }
            KeyCode::Char('r') => {
                let transition = self.cycle.reset_current();
                self.message = Some(transition_message(transition).to_string());
            }
            KeyCode::Char('t') => self.toggle_mode(),
            KeyCode::Char('a') => {
                self.editing = true;
                self.input_buffer.clear();
            }
            KeyCode::Char('?') => self.show_help = true,
            _ => {}
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.editing = false;
                self.input_buffer.clear();
            }
            KeyCode::Enter => self.finish_editing(),
            KeyCode::Backspace => {
                self.input_buffer.pop();
            }
            KeyCode::Char(c) => self.input_buffer.push(c),
            _ => {}
        }
    }

    fn finish_editing(&mut self) {
        if self.cycle.set_activity(&self.input_buffer) {
            self.message = Some(format!("Activity: {}", self.cycle.activity()));
        }
        self.editing = false;
        self.input_buffer.clear();
    }

    fn toggle_mode(&mut self) {
        match self.cycle.toggle_mode() {
            Ok(Advance { to, .. }) => {
                self.message = Some(format!("Switched to {}", to.name()));
                self.refresh_summary();
            }
            Err(e) => self.report_store_error(e),
        }
    }

    fn refresh_summary(&mut self) {
        match self.cycle.summary_today() {
            Ok(summary) => self.summary = summary,
            Err(e) => self.report_store_error(e),
        }
    }

    fn report_store_error(&mut self, e: StoreError) {
        tracing::error!(error = %e, "session log unavailable");
        self.message = Some(format!("Session log error: {e}"));
    }
}

fn transition_message(transition: Transition) -> &'static str {
    match transition {
        Transition::Started => "Timer started",
        Transition::AlreadyStarted => "Already running",
        Transition::Stopped => "Paused",
        Transition::NotRunning => "Timer is not running",
        Transition::Reset => "Timer reset",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ScriptedClock;
    use crate::config::DurationConfig;
    use crate::store::MemoryStore;
    use crate::models::Mode;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn test_app(store: MemoryStore) -> (App<MemoryStore>, Rc<ScriptedClock>) {
        let clock = Rc::new(ScriptedClock::new([]));
        let dyn_clock: Rc<dyn Clock> = clock.clone();
        let cycle = Cycle::new(&DurationConfig::default(), store, dyn_clock).unwrap();
        (App::with_cycle(cycle), clock)
    }

    #[test]
    fn test_keys_drive_the_timer() {
        let (mut app, clock) = test_app(MemoryStore::default());

        clock.push(0.0);
        app.handle_key(key(KeyCode::Char('s')));
        assert!(app.cycle.is_running());
        assert_eq!(app.message.as_deref(), Some("Timer started"));

        app.handle_key(key(KeyCode::Char('p')));
        assert!(!app.cycle.is_running());
        assert_eq!(app.message.as_deref(), Some("Paused"));

        app.handle_key(key(KeyCode::Char('r')));
        assert_eq!(app.cycle.format_time(), "25:00");
    }

    #[test]
    fn test_activity_entry() {
        let (mut app, _) = test_app(MemoryStore::default());
        app.handle_key(key(KeyCode::Char('a')));
        assert!(app.editing);
        assert!(!app.can_quit());

        for c in "Readx".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Backspace));
        app.handle_key(key(KeyCode::Enter));

        assert!(!app.editing);
        assert_eq!(app.cycle.activity(), "Read");
    }

    #[test]
    fn test_blank_activity_is_ignored() {
        let (mut app, _) = test_app(MemoryStore::default());
        app.handle_key(key(KeyCode::Char('a')));
        app.handle_key(key(KeyCode::Char(' ')));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.cycle.activity(), "Pomodoro");

        app.handle_key(key(KeyCode::Char('a')));
        app.handle_key(key(KeyCode::Char('x')));
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.cycle.activity(), "Pomodoro");
    }

    #[test]
    fn test_toggle_and_finish_refresh_summary() {
        let (mut app, clock) = test_app(MemoryStore::default());
        clock.push(0.0);
        app.handle_key(key(KeyCode::Char('s')));
        assert!(!app.tick());
        clock.push(1500.0);
        assert!(app.tick());

        assert_eq!(app.cycle.mode(), Mode::ShortBreak);
        assert_eq!(app.summary.completed_focus, 1);
        assert_eq!(app.message.as_deref(), Some("Pomodoro complete! Next: Short Break"));

        app.handle_key(key(KeyCode::Char('t')));
        assert_eq!(app.cycle.mode(), Mode::Focus);
        assert_eq!(app.message.as_deref(), Some("Switched to Pomodoro"));
    }

    #[test]
    fn test_store_errors_surface_in_message() {
        let store = MemoryStore {
            fail_appends: true,
            ..MemoryStore::default()
        };
        let (mut app, clock) = test_app(store);
        clock.push(0.0);
        app.handle_key(key(KeyCode::Char('s')));
        clock.push(60.0);
        app.handle_key(key(KeyCode::Char('t')));

        assert_eq!(app.cycle.mode(), Mode::ShortBreak);
        let message = app.message.unwrap();
        assert!(message.starts_with("Session log error"), "{message}");
    }

    #[test]
    fn test_help_closes_on_any_key() {
        let (mut app, _) = test_app(MemoryStore::default());
        app.handle_key(key(KeyCode::Char('?')));
        assert!(app.show_help);
        app.handle_key(key(KeyCode::Char('s')));
        assert!(!app.show_help);
        assert!(!app.cycle.is_running());
    }
}
