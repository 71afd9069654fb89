//! TUI rendering — orchestrates all panes.

pub mod dashboard;
pub mod form;
pub mod landing;
pub mod login;
pub mod team;
pub mod timeline;

use chrono::{DateTime, Local, Utc};
use flow_core::{
  feedback::Sentiment,
  shell::{ManagerTab, View},
};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Flex, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};

use crate::app::App;

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  let view = app.view();
  draw_header(f, rows[0], app, view);
  match view {
    View::Loading => draw_loading(f, rows[1]),
    View::Landing | View::Home => landing::draw(f, rows[1], view),
    View::LoginModal => {
      landing::draw(f, rows[1], view);
      login::draw(f, rows[1], app);
    }
    View::Manager(ManagerTab::Dashboard) => dashboard::draw(f, rows[1], app),
    View::Manager(ManagerTab::Team) => team::draw(f, rows[1], app),
    View::Employee => timeline::draw(f, rows[1], app),
  }
  if app.form.is_some() {
    form::draw(f, rows[1], app);
  }
  draw_status(f, rows[2], app, view);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App, view: View) {
  let bold = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
  let dim = Style::default().fg(Color::Gray);

  let mut left = vec![Span::styled(" FeedbackFlow", bold)];
  if let View::Manager(active) = view {
    for (i, tab) in [ManagerTab::Dashboard, ManagerTab::Team].into_iter().enumerate() {
      let style = if tab == active {
        Style::default().fg(Color::Black).bg(Color::Cyan)
      } else {
        dim
      };
      left.push(Span::raw("  "));
      left.push(Span::styled(format!("[{}] {}", i + 1, title_case(&tab.to_string())), style));
    }
  }

  let right = match app.identity() {
    Some(user) => format!("{} ({}) ", user.name, user.role),
    None => format!("{} ", Local::now().format("%Y-%m-%d")),
  };

  let left_width: usize = left.iter().map(|s| s.content.chars().count()).sum();
  let pad = (area.width as usize)
    .saturating_sub(left_width)
    .saturating_sub(right.chars().count());
  left.push(Span::raw(" ".repeat(pad)));
  left.push(Span::styled(right, dim));

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(Line::from(left)), inner);
}

fn draw_loading(f: &mut Frame, area: Rect) {
  let area = centered(area, 20, 1);
  f.render_widget(
    Paragraph::new("Loading…").style(Style::default().fg(Color::DarkGray)),
    area,
  );
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App, view: View) {
  let (mode_label, hints) = if app.form.is_some() {
    ("FORM", "Tab next field  ←→ choose  Enter save  Esc cancel")
  } else {
    match view {
      View::Loading => ("LOADING", ""),
      View::Landing => ("WELCOME", "l log in  q quit"),
      View::LoginModal => ("LOGIN", "Tab switch field  Enter sign in  Esc cancel"),
      View::Home => ("HOME", "b back  o log out  q quit"),
      View::Manager(ManagerTab::Team) if app.search_active => {
        ("SEARCH", "Type to filter  Enter done  Esc clear")
      }
      View::Manager(ManagerTab::Team) => (
        "TEAM",
        "↑↓/jk move  Enter edit  n new  / search  e employee  c clear  Tab dashboard  o log out",
      ),
      View::Manager(ManagerTab::Dashboard) => {
        ("DASHBOARD", "n new feedback  Tab team  h home  o log out  q quit")
      }
      View::Employee => ("FEEDBACK", "↑↓/jk move  a acknowledge  h home  o log out  q quit"),
    }
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(format!("  {status}"), Style::default().fg(Color::DarkGray));

  f.render_widget(
    Paragraph::new(Line::from(vec![mode_span, hint_span]))
      .style(Style::default().bg(Color::Black)),
    area,
  );
}

// ─── Shared helpers ───────────────────────────────────────────────────────────

pub(crate) fn sentiment_style(s: Sentiment) -> Style {
  let color = match s {
    Sentiment::Positive => Color::Green,
    Sentiment::Neutral => Color::Yellow,
    Sentiment::Negative => Color::Red,
  };
  Style::default().fg(color)
}

pub(crate) fn date(at: DateTime<Utc>) -> String {
  at.with_timezone(&Local).format("%b %-d, %Y").to_string()
}

pub(crate) fn title_case(s: &str) -> String {
  let mut chars = s.chars();
  match chars.next() {
    Some(c) => c.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}

/// A `width` × `height` rectangle centred in `area`.
pub(crate) fn centered(area: Rect, width: u16, height: u16) -> Rect {
  let [row] = Layout::vertical([Constraint::Length(height)])
    .flex(Flex::Center)
    .areas(area);
  let [cell] = Layout::horizontal([Constraint::Length(width)])
    .flex(Flex::Center)
    .areas(row);
  cell
}
