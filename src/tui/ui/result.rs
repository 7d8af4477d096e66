//! Prediction result panel.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::application::SubmitOutcome;
use crate::domain::{Prediction, RiskLabel};
use crate::tui::styles::MedicalTheme;

/// Caption under the probability gauge.
pub const THRESHOLD_CAPTION: &str = "Threshold = 50%. Above = High Risk, Below = Low Risk.";

/// Render the result of the last submission, if any.
pub fn render_result(f: &mut Frame, area: Rect, outcome: Option<&SubmitOutcome>) {
    match outcome {
        None => render_idle(f, area),
        Some(SubmitOutcome::Predicted(prediction)) => render_prediction(f, area, prediction),
        Some(other) => render_error(f, area, &other.message().unwrap_or_default()),
    }
}

fn result_block() -> Block<'static> {
    Block::default()
        .title(Span::styled(" Prediction Results ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border())
}

fn render_idle(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Fill in the patient data and press [Enter] to predict.",
            MedicalTheme::text_secondary(),
        )),
    ];
    let p = Paragraph::new(text)
        .block(result_block())
        .wrap(Wrap { trim: true });
    f.render_widget(p, area);
}

fn render_prediction(f: &mut Frame, area: Rect, prediction: &Prediction) {
    let block = result_block();
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Headline
            Constraint::Length(2), // Probability metric
            Constraint::Length(3), // Gauge
            Constraint::Min(0),    // Caption
        ])
        .split(inner);

    let label_style = MedicalTheme::risk_label(prediction.label);
    let icon = match prediction.label {
        RiskLabel::High => "⚠",
        RiskLabel::Low => "✓",
    };
    let headline = Paragraph::new(Line::from(vec![
        Span::styled(format!("{icon} "), label_style),
        Span::styled(
            prediction.label.headline(),
            label_style.add_modifier(Modifier::BOLD),
        ),
    ]));
    f.render_widget(headline, chunks[0]);

    let metric = Paragraph::new(Line::from(vec![
        Span::styled("Probability: ", MedicalTheme::text_secondary()),
        Span::styled(prediction.probability_percent(), MedicalTheme::title()),
    ]));
    f.render_widget(metric, chunks[1]);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .gauge_style(label_style)
        .ratio(prediction.gauge_ratio())
        .label(prediction.probability_percent());
    f.render_widget(gauge, chunks[2]);

    let caption = Paragraph::new(Line::from(Span::styled(
        THRESHOLD_CAPTION,
        MedicalTheme::text_muted(),
    )))
    .wrap(Wrap { trim: true });
    f.render_widget(caption, chunks[3]);
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "✗ ERROR",
            MedicalTheme::danger().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(message.to_string(), MedicalTheme::text())),
    ];
    let p = Paragraph::new(text)
        .block(result_block())
        .wrap(Wrap { trim: true });
    f.render_widget(p, area);
}
