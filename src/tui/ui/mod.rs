//! UI module: View components for the TUI.

pub mod diagnostics;
pub mod form;
pub mod result;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::application::{Diagnostics, LoadBanner, SubmitOutcome};
use crate::tui::styles::MedicalTheme;

use self::diagnostics::{panel_height, render_diagnostics};
use self::form::{render_form, FormState};
use self::result::render_result;

/// Everything one frame shows.
pub struct ScreenView<'a> {
    pub banner: &'a LoadBanner,
    pub form: &'a FormState,
    pub outcome: Option<&'a SubmitOutcome>,
    /// `Some` when the debug panel is expanded.
    pub diagnostics: Option<&'a Diagnostics>,
}

/// Render the whole screen.
pub fn render_screen(f: &mut Frame, view: &ScreenView<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                                    // Header
            Constraint::Length(4),                                    // Load banner
            Constraint::Min(0),                                       // Form + result
            Constraint::Length(panel_height(view.diagnostics.is_some())), // Debug info
            Constraint::Length(2),                                    // Footer
            Constraint::Length(3),                                    // Disclaimer
        ])
        .split(f.area());

    render_header(f, chunks[0]);
    render_banner(f, chunks[1], view.banner);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(chunks[2]);
    render_form(f, body[0], view.form);
    render_result(f, body[1], view.outcome);

    render_diagnostics(f, chunks[3], view.diagnostics);
    render_footer(f, chunks[4], view.form);
    render_disclaimer(f, chunks[5]);
}

fn render_header(f: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(vec![
        Span::styled("♥ ", MedicalTheme::danger()),
        Span::styled("Heart Disease Risk Predictor", MedicalTheme::title()),
        Span::styled(
            "  Enter patient data to predict heart disease risk",
            MedicalTheme::text_muted(),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );
    f.render_widget(title, area);
}

fn render_banner(f: &mut Frame, area: Rect, banner: &LoadBanner) {
    let lines = match banner {
        LoadBanner::Pending => vec![Line::from(Span::styled(
            "Loading model...",
            MedicalTheme::info(),
        ))],
        LoadBanner::Loaded(message) => vec![Line::from(vec![
            Span::styled("✓ ", MedicalTheme::success()),
            Span::styled(message.clone(), MedicalTheme::success()),
        ])],
        LoadBanner::Failed { message, hint } => vec![
            Line::from(vec![
                Span::styled("✗ ", MedicalTheme::danger()),
                Span::styled(
                    message.clone(),
                    MedicalTheme::danger().add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled(format!("{hint} "), MedicalTheme::warning()),
                Span::styled("[R]", MedicalTheme::key_hint()),
                Span::styled(" Retry", MedicalTheme::key_desc()),
            ]),
        ],
    };

    let p = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(p, area);
}

fn render_footer(f: &mut Frame, area: Rect, form: &FormState) {
    let line = if let Some(err) = &form.error_message {
        Line::from(vec![
            Span::styled("⚠ ", MedicalTheme::danger()),
            Span::styled(err.clone(), MedicalTheme::danger()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓/Tab]", MedicalTheme::key_hint()),
            Span::styled(" Navigate  ", MedicalTheme::key_desc()),
            Span::styled("[←→]", MedicalTheme::key_hint()),
            Span::styled(" Adjust  ", MedicalTheme::key_desc()),
            Span::styled("[PgUp/PgDn]", MedicalTheme::key_hint()),
            Span::styled(" ±10  ", MedicalTheme::key_desc()),
            Span::styled("[Enter]", MedicalTheme::key_hint()),
            Span::styled(" Predict  ", MedicalTheme::key_desc()),
            Span::styled("[D]", MedicalTheme::key_hint()),
            Span::styled(" Debug  ", MedicalTheme::key_desc()),
            Span::styled("[Q]", MedicalTheme::key_hint()),
            Span::styled(" Quit", MedicalTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );
    f.render_widget(footer, area);
}

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(vec![Span::styled(
            "DISCLAIMER: This tool provides indicative estimates and does not replace professional medical evaluation.",
            MedicalTheme::text_muted(),
        )]),
    ];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(MedicalTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::MODEL_UNAVAILABLE_MESSAGE;
    use crate::domain::{Prediction, RiskLabel};
    use crate::ports::InferenceError;
    use crate::tui::ui::form::Field;
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    fn buffer_text(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut text = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn draw(view: &ScreenView<'_>) -> String {
        draw_sized(view, 160, 48)
    }

    fn draw_sized(view: &ScreenView<'_>, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).expect("Should create test terminal");
        terminal
            .draw(|f| render_screen(f, view))
            .expect("Should draw frame");
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn test_renders_form_defaults_and_idle_result() {
        let form = FormState::default();
        let banner = LoadBanner::Loaded("Model loaded from: models/final_model.json".into());
        let text = draw(&ScreenView {
            banner: &banner,
            form: &form,
            outcome: None,
            diagnostics: None,
        });

        assert!(text.contains("Heart Disease Risk Predictor"));
        assert!(text.contains("Model loaded from: models/final_model.json"));
        assert!(text.contains("Chest Pain Type"));
        assert!(text.contains("Typical Angina"));
        assert!(text.contains("Thalassemia"));
        assert!(text.contains("press [Enter] to predict"));
        assert!(text.contains("Debug Info"));
        assert!(text.contains("DISCLAIMER"));
    }

    #[test]
    fn test_headline_follows_label_not_probability() {
        let form = FormState::default();
        let banner = LoadBanner::Pending;
        let outcome = SubmitOutcome::Predicted(Prediction::new(RiskLabel::High, 0.3));
        let text = draw(&ScreenView {
            banner: &banner,
            form: &form,
            outcome: Some(&outcome),
            diagnostics: None,
        });

        assert!(text.contains("High Risk of Heart Disease"));
        assert!(!text.contains("Low Risk of Heart Disease"));
        assert!(text.contains("30.0%"));
        assert!(text.contains("Threshold = 50%"));
    }

    #[test]
    fn test_probability_shown_to_one_decimal() {
        let form = FormState::default();
        let banner = LoadBanner::Pending;
        let outcome = SubmitOutcome::Predicted(Prediction::new(RiskLabel::High, 0.876));
        let text = draw(&ScreenView {
            banner: &banner,
            form: &form,
            outcome: Some(&outcome),
            diagnostics: None,
        });

        assert!(text.contains("87.6%"));
    }

    #[test]
    fn test_error_outcomes_and_failed_banner() {
        let form = FormState::default();
        let banner = LoadBanner::Failed {
            message: "No model file found. Please train and export the model first.".into(),
            hint: crate::application::session::LOAD_HINT,
        };

        let unavailable = SubmitOutcome::ModelUnavailable;
        let text = draw(&ScreenView {
            banner: &banner,
            form: &form,
            outcome: Some(&unavailable),
            diagnostics: None,
        });
        assert!(text.contains(MODEL_UNAVAILABLE_MESSAGE));
        assert!(text.contains("No model file found."));
        assert!(text.contains("final_model.json exists in a models/ folder."));

        let failed = SubmitOutcome::Failed(InferenceError::ClassifierFailure("boom".into()));
        let text = draw(&ScreenView {
            banner: &banner,
            form: &form,
            outcome: Some(&failed),
            diagnostics: None,
        });
        assert!(text.contains("Prediction failed: classifier failure: boom"));
    }

    #[test]
    fn test_small_terminal_shows_values() {
        let mut form = FormState::default();
        while form.selected_field() != Field::Thalassemia {
            form.next_field();
        }
        form.step(1);
        let banner = LoadBanner::Pending;
        let view = ScreenView {
            banner: &banner,
            form: &form,
            outcome: None,
            diagnostics: None,
        };

        let text = draw_sized(&view, 80, 24);
        assert!(text.contains("Fixed Defect"), "screen:\n{text}");
        assert!(text.contains("▸ Thal"), "screen:\n{text}");
        assert!(text.contains("55"));
        assert!(text.contains("246"));
    }

    #[test]
    fn test_small_terminal_keeps_selection_in_view() {
        let mut form = FormState::default();
        form.prev_field();
        form.step(-1);
        let banner = LoadBanner::Pending;
        let diagnostics = Diagnostics {
            model_loaded: false,
            working_dir: ".".into(),
            model_files: Vec::new(),
            source: None,
            fingerprint: None,
            classifier: None,
            load_attempts: 1,
        };
        let view = ScreenView {
            banner: &banner,
            form: &form,
            outcome: None,
            diagnostics: Some(&diagnostics),
        };

        let text = draw_sized(&view, 80, 24);
        assert!(text.contains("Reversible Defect"), "screen:\n{text}");
    }

    #[test]
    fn test_expanded_diagnostics() {
        let form = FormState::default();
        let banner = LoadBanner::Pending;
        let diagnostics = Diagnostics {
            model_loaded: false,
            working_dir: "/srv/cardiorisk".into(),
            model_files: vec!["models".into()],
            source: None,
            fingerprint: None,
            classifier: None,
            load_attempts: 2,
        };
        let text = draw(&ScreenView {
            banner: &banner,
            form: &form,
            outcome: None,
            diagnostics: Some(&diagnostics),
        });

        assert!(text.contains("/srv/cardiorisk"));
        assert!(text.contains("Load attempts"));
        assert!(text.contains("false"));
    }
}
