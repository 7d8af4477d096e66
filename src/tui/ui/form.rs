//! Patient data input form.
//!
//! Every widget is bounded: numeric fields clamp to their domain, categorical
//! fields cycle through their option table, so the assembled record is
//! always in range.

use std::ops::RangeInclusive;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::domain::{
    Categorical, PatientRecord, AGE_RANGE, CHOL_RANGE, OLDPEAK_RANGE, THALACH_RANGE,
    TRESTBPS_RANGE,
};
use crate::tui::styles::MedicalTheme;

const MAX_TYPED_LEN: usize = 5;

/// Rows taken by one bordered field.
const FIELD_HEIGHT: u16 = 3;

/// One input widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Age,
    Sex,
    ChestPain,
    RestingBp,
    Cholesterol,
    FastingSugar,
    RestingEcg,
    MaxHeartRate,
    ExerciseAngina,
    StDepression,
    StSlope,
    Vessels,
    Thalassemia,
}

impl Field {
    /// Widgets in display order: six in the left column, seven in the right.
    pub const ALL: [Field; 13] = [
        Field::Age,
        Field::Sex,
        Field::ChestPain,
        Field::RestingBp,
        Field::Cholesterol,
        Field::FastingSugar,
        Field::RestingEcg,
        Field::MaxHeartRate,
        Field::ExerciseAngina,
        Field::StDepression,
        Field::StSlope,
        Field::Vessels,
        Field::Thalassemia,
    ];

    /// Number of widgets in the left column.
    pub const LEFT_COLUMN: usize = 6;

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Age => "Age",
            Self::Sex => "Sex",
            Self::ChestPain => "Chest Pain Type",
            Self::RestingBp => "Resting Blood Pressure (mm Hg)",
            Self::Cholesterol => "Cholesterol (mg/dl)",
            Self::FastingSugar => "Fasting Blood Sugar > 120 mg/dl",
            Self::RestingEcg => "Resting ECG",
            Self::MaxHeartRate => "Maximum Heart Rate Achieved",
            Self::ExerciseAngina => "Exercise Induced Angina",
            Self::StDepression => "ST Depression",
            Self::StSlope => "Slope of Peak Exercise ST Segment",
            Self::Vessels => "Number of Major Vessels (0-3)",
            Self::Thalassemia => "Thalassemia",
        }
    }

    #[must_use]
    pub fn hint(self) -> &'static str {
        match self {
            Self::Age => "18-100",
            Self::RestingBp => "80-200",
            Self::Cholesterol => "100-600",
            Self::MaxHeartRate => "60-220",
            Self::StDepression => "0.0-10.0, step 0.1",
            _ => "←/→ to choose",
        }
    }

    /// Whether the field accepts typed digits.
    #[must_use]
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Age
                | Self::RestingBp
                | Self::Cholesterol
                | Self::MaxHeartRate
                | Self::StDepression
        )
    }

    fn integer_range(self) -> Option<&'static RangeInclusive<u32>> {
        match self {
            Self::Age => Some(&AGE_RANGE),
            Self::RestingBp => Some(&TRESTBPS_RANGE),
            Self::Cholesterol => Some(&CHOL_RANGE),
            Self::MaxHeartRate => Some(&THALACH_RANGE),
            _ => None,
        }
    }
}

fn step_integer(value: u32, delta: i32, range: &RangeInclusive<u32>) -> u32 {
    let stepped = i64::from(value) + i64::from(delta);
    let clamped = stepped.clamp(i64::from(*range.start()), i64::from(*range.end()));
    u32::try_from(clamped).unwrap_or(*range.start())
}

fn clamp_oldpeak(value: f64) -> f64 {
    let tenths = (value * 10.0).round() / 10.0;
    tenths.clamp(*OLDPEAK_RANGE.start(), *OLDPEAK_RANGE.end())
}

/// Widget values and focus.
#[derive(Debug, Clone)]
pub struct FormState {
    record: PatientRecord,
    selected: usize,
    /// Typed replacement for the selected numeric field, not yet committed.
    edit: Option<String>,
    pub error_message: Option<String>,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            record: PatientRecord::default(),
            selected: 0,
            edit: None,
            error_message: None,
        }
    }
}

impl FormState {
    #[must_use]
    pub fn selected_field(&self) -> Field {
        Field::ALL[self.selected]
    }

    /// Current widget values. A pending typed edit is not included.
    #[must_use]
    pub fn record(&self) -> PatientRecord {
        self.record
    }

    /// Commit any pending edit and return the record to submit.
    pub fn submit_record(&mut self) -> PatientRecord {
        self.commit_edit();
        self.record
    }

    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.edit.is_some()
    }

    /// Move to the next field
    pub fn next_field(&mut self) {
        self.commit_edit();
        self.selected = (self.selected + 1) % Field::ALL.len();
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        self.commit_edit();
        self.selected = if self.selected == 0 {
            Field::ALL.len() - 1
        } else {
            self.selected - 1
        };
    }

    /// Adjust the selected field by `delta` steps (0.1 per step for ST depression).
    pub fn step(&mut self, delta: i32) {
        self.commit_edit();
        let forward = delta > 0;
        let field = self.selected_field();
        let r = &mut self.record;
        match field {
            Field::Age => r.age = step_integer(r.age, delta, &AGE_RANGE),
            Field::RestingBp => r.trestbps = step_integer(r.trestbps, delta, &TRESTBPS_RANGE),
            Field::Cholesterol => r.chol = step_integer(r.chol, delta, &CHOL_RANGE),
            Field::MaxHeartRate => r.thalach = step_integer(r.thalach, delta, &THALACH_RANGE),
            Field::StDepression => r.oldpeak = clamp_oldpeak(r.oldpeak + f64::from(delta) / 10.0),
            Field::Sex => r.sex = r.sex.cycle(forward),
            Field::ChestPain => r.cp = r.cp.cycle(forward),
            Field::FastingSugar => r.fbs = r.fbs.cycle(forward),
            Field::RestingEcg => r.restecg = r.restecg.cycle(forward),
            Field::ExerciseAngina => r.exang = r.exang.cycle(forward),
            Field::StSlope => r.slope = r.slope.cycle(forward),
            Field::Vessels => r.ca = r.ca.cycle(forward),
            Field::Thalassemia => r.thal = r.thal.cycle(forward),
        }
    }

    /// Type a character into the selected numeric field.
    pub fn input_char(&mut self, c: char) {
        let field = self.selected_field();
        if !field.is_numeric() {
            return;
        }
        let accepted = c.is_ascii_digit() || (c == '.' && field == Field::StDepression);
        if !accepted {
            return;
        }

        let buffer = self.edit.get_or_insert_with(String::new);
        if buffer.len() < MAX_TYPED_LEN && !(c == '.' && buffer.contains('.')) {
            buffer.push(c);
        }
        self.error_message = None;
    }

    /// Delete the last typed character
    pub fn delete_char(&mut self) {
        if let Some(buffer) = self.edit.as_mut() {
            buffer.pop();
        }
    }

    /// Drop the pending edit, keeping the previous value.
    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    /// Apply the pending edit, clamped to the field's domain.
    pub fn commit_edit(&mut self) {
        let Some(buffer) = self.edit.take() else {
            return;
        };
        if buffer.is_empty() {
            return;
        }

        let field = self.selected_field();
        if let Some(range) = field.integer_range() {
            match buffer.parse::<u32>() {
                Ok(v) => {
                    let v = v.clamp(*range.start(), *range.end());
                    match field {
                        Field::Age => self.record.age = v,
                        Field::RestingBp => self.record.trestbps = v,
                        Field::Cholesterol => self.record.chol = v,
                        Field::MaxHeartRate => self.record.thalach = v,
                        _ => {}
                    }
                }
                Err(_) => {
                    self.error_message = Some(format!("{}: Invalid number", field.label()));
                }
            }
        } else if field == Field::StDepression {
            match buffer.parse::<f64>() {
                Ok(v) if v.is_finite() => self.record.oldpeak = clamp_oldpeak(v),
                _ => {
                    self.error_message = Some(format!("{}: Invalid number", field.label()));
                }
            }
        }
    }

    /// Text shown inside a widget.
    #[must_use]
    pub fn display_value(&self, field: Field) -> String {
        if field == self.selected_field() {
            if let Some(buffer) = &self.edit {
                return buffer.clone();
            }
        }

        let r = &self.record;
        match field {
            Field::Age => r.age.to_string(),
            Field::Sex => r.sex.label().to_string(),
            Field::ChestPain => r.cp.label().to_string(),
            Field::RestingBp => r.trestbps.to_string(),
            Field::Cholesterol => r.chol.to_string(),
            Field::FastingSugar => r.fbs.label().to_string(),
            Field::RestingEcg => r.restecg.label().to_string(),
            Field::MaxHeartRate => r.thalach.to_string(),
            Field::ExerciseAngina => r.exang.label().to_string(),
            Field::StDepression => format!("{:.1}", r.oldpeak),
            Field::StSlope => r.slope.label().to_string(),
            Field::Vessels => r.ca.label().to_string(),
            Field::Thalassemia => r.thal.label().to_string(),
        }
    }
}

/// Render the patient data input form
pub fn render_form(f: &mut Frame, area: Rect, state: &FormState) {
    let block = Block::default()
        .title(Span::styled(" Patient Information ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    let (left, right) = Field::ALL.split_at(Field::LEFT_COLUMN);
    render_field_column(f, columns[0], left, state);
    render_field_column(f, columns[1], right, state);
}

fn render_field_column(f: &mut Frame, area: Rect, fields: &[Field], state: &FormState) {
    if usize::from(area.height) < fields.len() * usize::from(FIELD_HEIGHT) {
        render_compact_column(f, area, fields, state);
        return;
    }

    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(FIELD_HEIGHT))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in fields.iter().copied().enumerate() {
        let is_selected = field == state.selected_field();
        let (border_style, title_style) = if is_selected {
            (MedicalTheme::border_focused(), MedicalTheme::focused())
        } else {
            (MedicalTheme::border(), MedicalTheme::text_secondary())
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.label()), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let value = state.display_value(field);
        let mut spans = vec![Span::raw(" ")];
        if is_selected && !field.is_numeric() {
            spans.push(Span::styled("‹ ", MedicalTheme::cursor()));
            spans.push(Span::styled(value, MedicalTheme::text()));
            spans.push(Span::styled(" ›", MedicalTheme::cursor()));
        } else {
            spans.push(Span::styled(value, MedicalTheme::text()));
        }
        if is_selected {
            if state.is_editing() {
                spans.push(Span::styled("▌", MedicalTheme::cursor()));
            }
            spans.push(Span::styled(
                format!("  {}", field.hint()),
                MedicalTheme::text_muted(),
            ));
        }

        f.render_widget(Paragraph::new(Line::from(spans)).block(block), chunks[i]);
    }
}

/// One `label: value` row per field, for terminals too short for bordered fields.
fn render_compact_column(f: &mut Frame, area: Rect, fields: &[Field], state: &FormState) {
    let width = usize::from(area.width);
    let lines: Vec<Line> = fields
        .iter()
        .map(|&field| compact_line(field, state, width))
        .collect();

    // Keep the selected row in view.
    let height = usize::from(area.height.max(1));
    let offset = fields
        .iter()
        .position(|&field| field == state.selected_field())
        .map_or(0, |pos| pos.saturating_sub(height - 1));
    let offset = u16::try_from(offset).unwrap_or(0);

    f.render_widget(Paragraph::new(lines).scroll((offset, 0)), area);
}

fn compact_line(field: Field, state: &FormState, width: usize) -> Line<'static> {
    let is_selected = field == state.selected_field();
    let marker = if is_selected { "▸ " } else { "  " };

    let mut value = state.display_value(field);
    if is_selected && state.is_editing() {
        value.push('▌');
    }

    let room = width.saturating_sub(marker.chars().count() + 2 + value.chars().count());
    let label = truncate_label(field.label(), room);

    let (label_style, value_style) = if is_selected {
        (MedicalTheme::focused(), MedicalTheme::focused())
    } else {
        (MedicalTheme::text_secondary(), MedicalTheme::text())
    };

    Line::from(vec![
        Span::styled(marker, MedicalTheme::cursor()),
        Span::styled(format!("{label}: "), label_style),
        Span::styled(value, value_style),
    ])
}

fn truncate_label(label: &str, room: usize) -> String {
    if label.chars().count() <= room {
        return label.to_string();
    }
    if room == 0 {
        return String::new();
    }
    let mut short: String = label.chars().take(room - 1).collect();
    short.push('…');
    short
}
