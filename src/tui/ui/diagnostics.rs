//! Collapsible debug panel.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::application::Diagnostics;
use crate::tui::styles::MedicalTheme;

/// Height of the panel, borders included.
#[must_use]
pub fn panel_height(expanded: bool) -> u16 {
    if expanded {
        9
    } else {
        3
    }
}

fn row(key: &'static str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{key:<16}"), MedicalTheme::text_secondary()),
        Span::styled(value, MedicalTheme::text()),
    ])
}

/// `None` renders the collapsed header only.
pub fn render_diagnostics(f: &mut Frame, area: Rect, diagnostics: Option<&Diagnostics>) {
    let (marker, lines) = match diagnostics {
        None => ("▸", Vec::new()),
        Some(d) => {
            let files = if d.model_files.is_empty() {
                "(none)".to_string()
            } else {
                d.model_files.join(", ")
            };
            let optional = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
            let lines = vec![
                row("Model loaded", d.model_loaded.to_string()),
                row("Working dir", d.working_dir.clone()),
                row("Model files", files),
                row("Source", optional(&d.source)),
                row("Fingerprint", optional(&d.fingerprint)),
                row("Classifier", optional(&d.classifier)),
                row("Load attempts", d.load_attempts.to_string()),
            ];
            ("▾", lines)
        }
    };

    let block = Block::default()
        .title(Line::from(vec![
            Span::styled(format!(" {marker} Debug Info "), MedicalTheme::subtitle()),
            Span::styled("[D] ", MedicalTheme::key_hint()),
        ]))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    let p = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(p, area);
}
