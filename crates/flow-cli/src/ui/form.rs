//! Feedback form overlay, for new feedback and edits.

use flow_core::views::form::FormMode;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::{
  app::{App, FormField},
  ui::{centered, sentiment_style},
};

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let Some(form) = &app.form else {
    return;
  };
  let area = centered(area, area.width.min(72), 14);
  f.render_widget(Clear, area);

  let title = match form.draft.mode() {
    FormMode::Create => " Give Feedback ",
    FormMode::Edit(_) => " Edit Feedback ",
  };
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));

  let employee = match form.draft.employee_id() {
    Some(id) => app.roster.display_name(id).to_string(),
    None => "(choose with ←→)".to_string(),
  };
  let locked = if form.draft.is_editing() { "  (locked)" } else { "" };

  let lines = vec![
    field_line(
      "Employee",
      Span::raw(format!("{employee}{locked}")),
      form.field == FormField::Employee,
    ),
    field_line(
      "Sentiment",
      Span::styled(form.draft.sentiment.to_string(), sentiment_style(form.draft.sentiment)),
      form.field == FormField::Sentiment,
    ),
    Line::raw(""),
    field_line(
      "Strengths",
      Span::raw(text_value(&form.draft.strengths, form.field == FormField::Strengths)),
      form.field == FormField::Strengths,
    ),
    Line::raw(""),
    field_line(
      "Improve",
      Span::raw(text_value(&form.draft.improvements, form.field == FormField::Improvements)),
      form.field == FormField::Improvements,
    ),
    Line::raw(""),
    Line::styled(
      if form.draft.is_complete() {
        "Ready to save."
      } else {
        "All fields are required."
      },
      Style::default().fg(Color::DarkGray),
    ),
  ];

  f.render_widget(
    Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
    area,
  );
}

fn text_value(text: &str, focused: bool) -> String {
  if focused { format!("{text}_") } else { text.to_string() }
}

fn field_line(label: &str, value: Span<'static>, focused: bool) -> Line<'static> {
  let label_style = if focused {
    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
  } else {
    Style::default().fg(Color::Gray)
  };
  let marker = if focused { "▸" } else { " " };
  Line::from(vec![
    Span::styled(format!("{marker} {label:<10} "), label_style),
    value,
  ])
}
