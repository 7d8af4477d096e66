//! Main TUI application state machine.
//!
//! Handles:
//! - Input event handling
//! - Session and model lifecycle
//! - Synchronous prediction on submit

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};

use crate::application::{submit, Diagnostics, ModelLoader, Session, SubmitOutcome};

use super::ui::{form::FormState, render_screen, ScreenView};

const LARGE_STEP: i32 = 10;

/// Main application state
pub struct App {
    /// Model handle and load history
    session: Session,

    /// Widget values
    form: FormState,

    /// Result of the last submission
    outcome: Option<SubmitOutcome>,

    show_diagnostics: bool,

    /// Whether the app should quit
    should_quit: bool,
}

impl App {
    /// Create the application and attempt the initial model load.
    ///
    /// A failed load is not an error here: it is shown in the banner and
    /// the form stays usable.
    ///
    /// # Errors
    /// Returns error if the working directory cannot be determined.
    pub fn new() -> Result<Self> {
        let base = std::env::current_dir()?;
        let mut session = Session::new(ModelLoader::new(base));
        if session.ensure_model().is_none() {
            tracing::warn!("Starting without a model; predictions are disabled");
        }
        Ok(Self::with_session(session))
    }

    /// Create application with an injected session.
    #[must_use]
    pub fn with_session(session: Session) -> Self {
        Self {
            session,
            form: FormState::default(),
            outcome: None,
            show_diagnostics: false,
            should_quit: false,
        }
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn form(&self) -> &FormState {
        &self.form
    }

    #[must_use]
    pub fn outcome(&self) -> Option<&SubmitOutcome> {
        self.outcome.as_ref()
    }

    #[must_use]
    pub fn show_diagnostics(&self) -> bool {
        self.show_diagnostics
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Main loop
        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            terminal.draw(|f| self.draw(f))?;

            if event::poll(Duration::from_millis(250))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Draw one frame from the current state.
    pub fn draw(&self, f: &mut Frame) {
        let banner = self.session.load_banner();
        let diagnostics = self
            .show_diagnostics
            .then(|| Diagnostics::collect(&self.session));

        render_screen(
            f,
            &ScreenView {
                banner: &banner,
                form: &self.form,
                outcome: self.outcome.as_ref(),
                diagnostics: diagnostics.as_ref(),
            },
        );
    }

    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match key {
            KeyCode::Esc => {
                if self.form.is_editing() {
                    self.form.cancel_edit();
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Up | KeyCode::BackTab => {
                self.form.prev_field();
            }
            KeyCode::Down | KeyCode::Tab => {
                self.form.next_field();
            }
            KeyCode::Left => self.form.step(-1),
            KeyCode::Right => self.form.step(1),
            KeyCode::PageUp => self.form.step(LARGE_STEP),
            KeyCode::PageDown => self.form.step(-LARGE_STEP),
            KeyCode::Char('d') | KeyCode::Char('D') => {
                self.show_diagnostics = !self.show_diagnostics;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.retry_load();
            }
            KeyCode::Char(c) => {
                self.form.input_char(c);
            }
            KeyCode::Backspace => {
                self.form.delete_char();
            }
            KeyCode::Enter => {
                self.submit_form();
            }
            _ => {}
        }
    }

    fn retry_load(&mut self) {
        if self.session.is_loaded() {
            return;
        }
        tracing::info!("Retrying model load");
        self.session.ensure_model();
    }

    fn submit_form(&mut self) {
        self.form.error_message = None;
        let record = self.form.submit_record();
        if self.form.error_message.is_some() {
            return;
        }
        self.outcome = Some(submit(self.session.model(), &record));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use ratatui::backend::TestBackend;
    use tempfile::tempdir;

    use crate::application::ModelHandle;
    use crate::domain::{Categorical, PatientRecord, RiskLabel};
    use crate::ports::{InferenceError, RiskClassifier};

    struct CountingClassifier {
        calls: Arc<AtomicUsize>,
        seen_age: Arc<AtomicUsize>,
    }

    impl RiskClassifier for CountingClassifier {
        fn classify(&self, record: &PatientRecord) -> Result<RiskLabel, InferenceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen_age.store(record.age as usize, Ordering::SeqCst);
            Ok(RiskLabel::High)
        }

        fn estimate_probability(&self, _record: &PatientRecord) -> Result<f64, InferenceError> {
            Ok(0.876)
        }
    }

    fn app_with_stub() -> (App, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen_age = Arc::new(AtomicUsize::new(0));
        let classifier = CountingClassifier {
            calls: Arc::clone(&calls),
            seen_age: Arc::clone(&seen_age),
        };
        let handle = ModelHandle::new(Arc::new(classifier), "models/final_model.json", "00");
        let session = Session::with_model(ModelLoader::default(), handle);
        (App::with_session(session), calls, seen_age)
    }

    fn press(app: &mut App, key: KeyCode) {
        app.handle_key(key, KeyModifiers::NONE);
    }

    #[test]
    fn test_submit_without_model_is_guarded() {
        let dir = tempdir().expect("Should create temp dir");
        let base = dir.path().join("app");
        std::fs::create_dir(&base).expect("Should create base dir");

        let mut session = Session::new(ModelLoader::new(&base));
        assert!(session.ensure_model().is_none());
        let mut app = App::with_session(session);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.outcome(), Some(&SubmitOutcome::ModelUnavailable));
        // Submitting never triggers a load on its own.
        assert_eq!(app.session().attempts(), 1);
    }

    #[test]
    fn test_submit_runs_classifier_once() {
        let (mut app, calls, _) = app_with_stub();
        press(&mut app, KeyCode::Enter);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let prediction = app
            .outcome()
            .and_then(SubmitOutcome::prediction)
            .expect("Should have a prediction");
        assert_eq!(prediction.label, RiskLabel::High);
        assert_eq!(prediction.probability_percent(), "87.6%");
    }

    #[test]
    fn test_typed_value_reaches_classifier() {
        let (mut app, _, seen_age) = app_with_stub();
        press(&mut app, KeyCode::Char('6'));
        press(&mut app, KeyCode::Char('7'));
        press(&mut app, KeyCode::Enter);

        assert_eq!(seen_age.load(Ordering::SeqCst), 67);
        assert_eq!(app.form().record().age, 67);
    }

    #[test]
    fn test_retry_loads_after_artifact_appears() {
        let dir = tempdir().expect("Should create temp dir");
        let base = dir.path().join("app");
        std::fs::create_dir_all(base.join("models")).expect("Should create models dir");

        let mut session = Session::new(ModelLoader::new(&base));
        session.ensure_model();
        let mut app = App::with_session(session);
        assert!(!app.session().is_loaded());

        std::fs::write(
            base.join("models/final_model.json"),
            include_str!("../../models/final_model.json"),
        )
        .expect("Should write artifact");

        press(&mut app, KeyCode::Char('r'));
        assert!(app.session().is_loaded());
        assert_eq!(app.session().attempts(), 2);

        // Loaded sessions ignore further retries.
        press(&mut app, KeyCode::Char('R'));
        assert_eq!(app.session().attempts(), 2);
    }

    #[test]
    fn test_quit_keys() {
        let (mut app, _, _) = app_with_stub();
        app.handle_key(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(app.should_quit());

        let (mut app, _, _) = app_with_stub();
        press(&mut app, KeyCode::Char('Q'));
        assert!(app.should_quit());
    }

    #[test]
    fn test_esc_cancels_edit_before_quitting() {
        let (mut app, _, _) = app_with_stub();
        press(&mut app, KeyCode::Char('9'));
        press(&mut app, KeyCode::Esc);
        assert!(!app.should_quit());
        assert!(!app.form().is_editing());

        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit());
    }

    #[test]
    fn test_diagnostics_toggle_and_draw() {
        let (mut app, _, _) = app_with_stub();
        press(&mut app, KeyCode::Char('d'));
        assert!(app.show_diagnostics());

        let mut terminal =
            Terminal::new(TestBackend::new(160, 48)).expect("Should create test terminal");
        terminal.draw(|f| app.draw(f)).expect("Should draw frame");

        press(&mut app, KeyCode::Char('D'));
        assert!(!app.show_diagnostics());
    }

    #[test]
    fn test_navigation_and_steps() {
        let (mut app, _, _) = app_with_stub();
        press(&mut app, KeyCode::PageUp);
        assert_eq!(app.form().record().age, 65);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.form().record().age, 64);

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.form().record().sex.label(), "Female");

        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.form().record().age, 64);
    }
}
