//! Manager dashboard: headline counts, sentiment split, team overview.

use flow_core::feedback::Sentiment;
use ratatui::{
  Frame,
  layout::{Constraint, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Row, Table},
};
use strum::IntoEnumIterator as _;

use crate::{
  app::App,
  ui::{date, sentiment_style, title_case},
};

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let Some(d) = app.dashboard() else {
    return;
  };

  let [stats_area, sentiment_area, team_area] = Layout::vertical([
    Constraint::Length(4),
    Constraint::Length(3),
    Constraint::Min(0),
  ])
  .areas(area);

  // Headline counts.
  let stats = [
    ("Team Members", d.team_size, Color::Cyan),
    ("Total Feedback", d.total, Color::White),
    ("Acknowledged", d.acknowledged, Color::Green),
    ("Pending", d.pending, Color::Yellow),
  ];
  let cells = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(stats_area);
  for ((label, n, color), cell) in stats.into_iter().zip(cells.iter()) {
    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::DarkGray));
    let text = vec![
      Line::styled(label, Style::default().fg(Color::Gray)),
      Line::styled(n.to_string(), Style::default().fg(color).add_modifier(Modifier::BOLD)),
    ];
    f.render_widget(Paragraph::new(text).block(block), *cell);
  }

  // Sentiment split.
  let mut spans = Vec::new();
  for s in Sentiment::iter() {
    spans.push(Span::styled(
      format!("  {}: {}", title_case(&s.to_string()), d.sentiment.get(s)),
      sentiment_style(s),
    ));
  }
  f.render_widget(
    Paragraph::new(Line::from(spans)).block(
      Block::default()
        .title(" Feedback Sentiment ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray)),
    ),
    sentiment_area,
  );

  // Team overview.
  let rows = d.members.iter().map(|m| {
    let latest = match m.latest {
      Some(record) => Line::from(vec![
        Span::raw(format!("{}  ", date(record.created_at))),
        Span::styled(record.sentiment.to_string(), sentiment_style(record.sentiment)),
      ]),
      None => Line::styled("No feedback", Style::default().fg(Color::DarkGray)),
    };
    Row::new(vec![
      Line::raw(m.member.name.clone()),
      Line::raw(m.feedback_count.to_string()),
      Line::raw(m.acknowledged_count.to_string()),
      latest,
    ])
  });
  let table = Table::new(rows, [
    Constraint::Percentage(35),
    Constraint::Length(10),
    Constraint::Length(14),
    Constraint::Min(20),
  ])
  .header(
    Row::new(vec!["Member", "Feedback", "Acknowledged", "Latest"])
      .style(Style::default().add_modifier(Modifier::BOLD)),
  )
  .block(
    Block::default()
      .title(" Team Overview ")
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::DarkGray)),
  );
  f.render_widget(table, team_area);
}
