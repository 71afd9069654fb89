//! Team feedback list with search and subject filter.

use flow_core::views::team::EmptyState;
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
  let Some(list) = app.team_list() else {
    return;
  };

  let [filter_area, body] =
    Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);
  let [list_area, detail_area] =
    Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).areas(body);

  // Filter bar.
  let search = if app.search_active {
    format!("/{}_", app.filter.search)
  } else if app.filter.search.is_empty() {
    "/ search".to_string()
  } else {
    format!("/{}", app.filter.search)
  };
  let employee = app
    .filter
    .employee
    .as_ref()
    .map_or("All Team Members", |id| app.roster.display_name(id));
  f.render_widget(
    Paragraph::new(Line::from(vec![
      Span::styled(format!(" {search}"), Style::default().fg(Color::Yellow)),
      Span::styled(format!("   employee: {employee}"), Style::default().fg(Color::Gray)),
    ])),
    filter_area,
  );

  // Rows.
  let block = Block::default()
    .title(format!(" Team Feedback ({}) ", list.rows.len()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  if let Some(empty) = list.empty {
    let msg = match empty {
      EmptyState::NoFeedback => "No feedback yet. Press n to write some.",
      EmptyState::NoMatches => "No feedback found. Press c to clear filters.",
    };
    f.render_widget(
      Paragraph::new(msg)
        .style(Style::default().fg(Color::DarkGray))
        .block(block),
      list_area,
    );
    draw_detail(f, detail_area, None);
    return;
  }

  let items: Vec<ListItem> = list
    .rows
    .iter()
    .map(|row| {
      let status = if row.feedback.acknowledged { "✓" } else { "•" };
      let mut spans = vec![
        Span::raw(format!("{status} ")),
        Span::raw(row.subject_name.to_string()),
        Span::raw("  "),
        Span::styled(row.feedback.sentiment.to_string(), sentiment_style(row.feedback.sentiment)),
        Span::styled(
          format!("  {}", date(row.feedback.created_at)),
          Style::default().fg(Color::DarkGray),
        ),
      ];
      if row.edited {
        spans.push(Span::styled(" • Updated", Style::default().fg(Color::DarkGray)));
      }
      ListItem::new(Line::from(spans))
    })
    .collect();

  let mut state = ListState::default();
  state.select(Some(app.cursor.min(list.rows.len().saturating_sub(1))));
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

  let selected = state.selected().and_then(|i| list.rows.get(i));
  draw_detail(f, detail_area, selected.map(|r| (r.subject_name, r.feedback)));
}

fn draw_detail(
  f: &mut Frame,
  area: Rect,
  selected: Option<(&str, &flow_core::feedback::Feedback)>,
) {
  let block = Block::default()
    .title(" Detail ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let Some((name, record)) = selected else {
    f.render_widget(block, area);
    return;
  };

  let bold = Style::default().add_modifier(Modifier::BOLD);
  let mut lines = vec![
    Line::styled(name.to_string(), bold.fg(Color::Cyan)),
    Line::from(vec![
      Span::styled(record.sentiment.to_string(), sentiment_style(record.sentiment)),
      Span::raw(format!("  {}", date(record.created_at))),
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
    None => Line::styled("Not yet acknowledged", Style::default().fg(Color::Yellow)),
  });

  f.render_widget(
    Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
    area,
  );
}
