//! Top-level view selection.

use strum::{Display, EnumString};

use crate::identity::{Identity, Role};

/// Tabs available to managers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ManagerTab {
  #[default]
  Dashboard,
  Team,
}

impl ManagerTab {
  /// Parse a tab name; anything unknown falls back to the dashboard.
  pub fn from_name(name: &str) -> Self { name.parse().unwrap_or_default() }

  pub fn next(self) -> Self {
    match self {
      Self::Dashboard => Self::Team,
      Self::Team => Self::Dashboard,
    }
  }
}

/// What the shell shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
  Loading,
  Landing,
  LoginModal,
  /// The landing page while logged in, with a way back.
  Home,
  Manager(ManagerTab),
  Employee,
}

/// Transient UI state held by the shell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellState {
  pub active_tab: ManagerTab,
  pub show_login: bool,
  pub show_home:  bool,
}

impl ShellState {
  pub fn select(&self, loading: bool, identity: Option<&Identity>) -> View {
    if loading {
      return View::Loading;
    }
    match identity {
      None if self.show_login => View::LoginModal,
      None => View::Landing,
      Some(_) if self.show_home => View::Home,
      Some(user) => match user.role {
        Role::Manager => View::Manager(self.active_tab),
        Role::Employee => View::Employee,
      },
    }
  }

  /// React to a new session identity: reset to the role's default view and
  /// close any overlay.
  pub fn on_identity_changed(&mut self, identity: Option<&Identity>) {
    if identity.is_some() {
      self.active_tab = ManagerTab::default();
      self.show_login = false;
      self.show_home = false;
    }
  }

  pub fn open_login(&mut self) { self.show_login = true; }

  pub fn close_login(&mut self) { self.show_login = false; }

  pub fn open_home(&mut self) { self.show_home = true; }

  pub fn close_home(&mut self) { self.show_home = false; }
}
