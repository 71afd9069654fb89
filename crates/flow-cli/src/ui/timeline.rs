//! Employee view: "My Feedback" timeline.

use ratatui::{
  Frame,
  layout::{Constraint, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::{
  app::App,
  ui::{date, sentiment_style},
};

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let Some(t) = app.timeline() else {
    return;
  };

  let [summary_area, body] =
    Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);
  let [list_area, detail_area] =
    Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)]).areas(body);

  f.render_widget(
    Paragraph::new(Line::from(vec![
      Span::styled(" My Feedback", Style::default().add_modifier(Modifier::BOLD)),
      Span::styled(
        format!("   {} total  {} pending  {} acknowledged", t.total, t.pending, t.acknowledged),
        Style::default().fg(Color::Gray),
      ),
    ])),
    summary_area,
  );

  let block = Block::default()
    .title(" Feedback Timeline ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  if t.entries.is_empty() {
    f.render_widget(
      Paragraph::new("No feedback yet")
        .style(Style::default().fg(Color::DarkGray))
        .block(block),
      list_area,
    );
    f.render_widget(
      Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray)),
      detail_area,
    );
    return;
  }

  let items: Vec<ListItem> = t
    .entries
    .iter()
    .map(|e| {
      let marker = if e.can_acknowledge {
        Span::styled("● ", Style::default().fg(Color::Yellow))
      } else {
        Span::styled("✓ ", Style::default().fg(Color::Green))
      };
      ListItem::new(Line::from(vec![
        marker,
        Span::raw(date(e.feedback.created_at)),
        Span::raw("  "),
        Span::styled(e.feedback.sentiment.to_string(), sentiment_style(e.feedback.sentiment)),
      ]))
    })
    .collect();

  let mut state = ListState::default();
  state.select(Some(app.cursor.min(t.entries.len() - 1)));
  f.render_stateful_widget(
    List::new(items).block(block).highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    list_area,
    &mut state,
  );

  let Some(entry) = state.selected().and_then(|i| t.entries.get(i)) else {
    return;
  };
  let record = entry.feedback;
  let bold = Style::default().add_modifier(Modifier::BOLD);
  let mut lines = vec![
    Line::from(vec![
      Span::styled("From ", Style::default().fg(Color::Gray)),
      Span::styled(app.roster.display_name(&record.manager_id).to_string(), bold),
    ]),
    Line::raw(""),
    Line::styled("Strengths", bold),
    Line::raw(record.strengths.clone()),
    Line::raw(""),
    Line::styled("Areas for Improvement", bold),
    Line::raw(record.improvements.clone()),
    Line::raw(""),
  ];
  lines.push(match record.acknowledged_at {
    Some(at) => Line::styled(format!("Acknowledged {}", date(at)), Style::default().fg(Color::Green)),
    None => Line::styled("Press a to acknowledge", Style::default().fg(Color::Yellow)),
  });

  f.render_widget(
    Paragraph::new(lines).wrap(Wrap { trim: false }).block(
      Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray)),
    ),
    detail_area,
  );
}
