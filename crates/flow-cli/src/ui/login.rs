//! Login modal.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph},
};

use crate::{
  app::{App, LoginField},
  ui::centered,
};

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let area = centered(area, 48, 9);
  f.render_widget(Clear, area);

  let block = Block::default()
    .title(" Sign in to FeedbackFlow ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let form = &app.login;
  let masked = "•".repeat(form.password.chars().count());
  let mut lines = vec![
    Line::styled(
      "Enter your credentials to continue",
      Style::default().fg(Color::Gray),
    ),
    Line::raw(""),
    input_line("Username", &form.username, form.field == LoginField::Username),
    input_line("Password", &masked, form.field == LoginField::Password),
    Line::raw(""),
  ];
  if let Some(err) = &form.error {
    lines.push(Line::styled(err.as_str(), Style::default().fg(Color::Red)));
  }

  f.render_widget(Paragraph::new(lines), inner);
}

fn input_line<'a>(label: &'a str, value: &'a str, focused: bool) -> Line<'a> {
  let value_style = if focused {
    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
  } else {
    Style::default()
  };
  let cursor = if focused { "_" } else { "" };
  Line::from(vec![
    Span::styled(format!("{label:>9}: "), Style::default().fg(Color::Gray)),
    Span::styled(format!("{value}{cursor}"), value_style),
  ])
}
