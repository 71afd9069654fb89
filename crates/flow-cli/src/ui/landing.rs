//! Landing page, shown before login and as "home" afterwards.

use flow_core::shell::View;
use ratatui::{
  Frame,
  layout::{Alignment, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};

const FEATURES: [(&str, &str); 3] = [
  ("Structured feedback", "Strengths, areas for improvement and an overall sentiment."),
  ("Team dashboard", "See at a glance who has feedback and who has read it."),
  ("Acknowledgments", "Employees confirm they have reviewed each entry."),
];

pub fn draw(f: &mut Frame, area: Rect, view: View) {
  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let heading = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
  let mut lines = vec![
    Line::raw(""),
    Line::styled("Welcome to FeedbackFlow", heading),
    Line::styled(
      "Clear, structured feedback between managers and their teams.",
      Style::default().fg(Color::Gray),
    ),
    Line::raw(""),
    Line::styled("Why Choose FeedbackFlow?", Style::default().add_modifier(Modifier::BOLD)),
    Line::raw(""),
  ];
  for (title, body) in FEATURES {
    lines.push(Line::from(vec![
      Span::styled(format!("{title}: "), Style::default().fg(Color::White)),
      Span::styled(body, Style::default().fg(Color::Gray)),
    ]));
  }
  lines.push(Line::raw(""));
  lines.push(Line::styled(
    if view == View::Home {
      "Press b to return to your workspace."
    } else {
      "Press l to sign in."
    },
    Style::default().fg(Color::Yellow),
  ));

  f.render_widget(
    Paragraph::new(lines)
      .alignment(Alignment::Center)
      .wrap(Wrap { trim: true }),
    inner,
  );
}
