//! Application state machine and event dispatcher.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use flow_core::{
  Error,
  feedback::{FeedbackId, Sentiment},
  identity::{Identity, Roster, UserId},
  record_store::RecordStore,
  session::SessionHolder,
  shell::{ManagerTab, ShellState, View},
  views::{
    dashboard::Dashboard,
    form::FeedbackDraft,
    team::{TeamFilter, TeamList},
    timeline::{self, Timeline},
  },
};
use flow_store_sqlite::SqliteSlots;
use strum::IntoEnumIterator as _;
use tracing::{info, warn};

use crate::client::HttpAuthenticator;

/// Shown for every failed login, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

// ─── Overlays ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
  Username,
  Password,
}

/// The login modal's inputs.
#[derive(Debug, Clone)]
pub struct LoginForm {
  pub username: String,
  pub password: String,
  pub field:    LoginField,
  pub error:    Option<String>,
}

impl Default for LoginForm {
  fn default() -> Self {
    Self {
      username: String::new(),
      password: String::new(),
      field:    LoginField::Username,
      error:    None,
    }
  }
}

impl LoginForm {
  fn input(&mut self) -> &mut String {
    match self.field {
      LoginField::Username => &mut self.username,
      LoginField::Password => &mut self.password,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
  Employee,
  Sentiment,
  Strengths,
  Improvements,
}

impl FormField {
  fn next(self) -> Self {
    match self {
      Self::Employee => Self::Sentiment,
      Self::Sentiment => Self::Strengths,
      Self::Strengths => Self::Improvements,
      Self::Improvements => Self::Employee,
    }
  }

  fn prev(self) -> Self {
    match self {
      Self::Employee => Self::Improvements,
      Self::Sentiment => Self::Employee,
      Self::Strengths => Self::Sentiment,
      Self::Improvements => Self::Strengths,
    }
  }
}

/// The feedback form overlay.
#[derive(Debug, Clone)]
pub struct FormState {
  pub draft: FeedbackDraft,
  pub field: FormField,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  pub shell:   ShellState,
  pub session: SessionHolder<SqliteSlots, HttpAuthenticator>,
  pub store:   RecordStore<SqliteSlots>,

  /// Everyone the client knows by name: fixture users, the logged-in
  /// identity, and the team fetched from the server.
  pub roster: Roster,

  /// Used for `/auth/team/` after login.
  pub client: HttpAuthenticator,

  pub login: LoginForm,
  pub form:  Option<FormState>,

  /// Team-list filters.
  pub filter:        TeamFilter,
  /// Whether the user is typing a search query.
  pub search_active: bool,

  /// Cursor within the current list (team rows or timeline entries).
  pub cursor: usize,

  /// One-line status message shown in the status bar.
  pub status_msg: String,
}

impl App {
  pub fn new(
    session: SessionHolder<SqliteSlots, HttpAuthenticator>,
    store: RecordStore<SqliteSlots>,
    roster: Roster,
    client: HttpAuthenticator,
  ) -> Self {
    Self {
      shell: ShellState::default(),
      session,
      store,
      roster,
      client,
      login: LoginForm::default(),
      form: None,
      filter: TeamFilter::default(),
      search_active: false,
      cursor: 0,
      status_msg: String::new(),
    }
  }

  // ── Startup ───────────────────────────────────────────────────────────────

  /// Hydrate the session and the record collection.
  ///
  /// An unreadable session slot is cleared and the app starts anonymous. An
  /// unreadable feedback slot leaves the collection empty; the slot is only
  /// replaced by the next write. Other storage failures are fatal.
  pub async fn initialize(&mut self) -> anyhow::Result<()> {
    let restored = self.session.initialize().await;
    let hydrated = self.store.initialize().await;
    let mut notice = None;

    match restored {
      Ok(()) => {}
      Err(Error::CorruptState { slot, reason }) => {
        warn!(slot, reason = %reason, "discarding unreadable session");
        if let Err(e) = self.session.logout().await {
          warn!(error = %e, "could not clear session slot");
        }
        notice = Some("Saved session was unreadable; please log in again");
      }
      Err(e) => return Err(e.into()),
    }
    match hydrated {
      Ok(()) => {}
      Err(Error::CorruptState { slot, reason }) => {
        warn!(slot, reason = %reason, "stored feedback is unreadable; starting empty");
        notice = Some("Stored feedback was unreadable; starting empty");
      }
      Err(e) => return Err(e.into()),
    }

    if self.session.is_authenticated() {
      self.identity_changed().await;
    }
    if let Some(notice) = notice {
      self.status_msg = notice.into();
    }
    Ok(())
  }

  // ── Derived state ─────────────────────────────────────────────────────────

  pub fn view(&self) -> View {
    self
      .shell
      .select(self.session.is_loading(), self.session.identity())
  }

  pub fn identity(&self) -> Option<&Identity> { self.session.identity() }

  /// The dashboard for the logged-in manager.
  pub fn dashboard(&self) -> Option<Dashboard<'_>> {
    let manager = self.session.identity()?;
    Some(Dashboard::build(manager, &self.store.by_manager(&manager.id), &self.roster))
  }

  /// The team list as currently filtered, for the logged-in manager.
  pub fn team_list(&self) -> Option<TeamList<'_>> {
    let manager = self.session.identity()?;
    let records = self.store.by_manager(&manager.id);
    Some(TeamList::build(manager, &records, &self.roster, &self.filter))
  }

  /// The timeline for the logged-in employee.
  pub fn timeline(&self) -> Option<Timeline<'_>> {
    let employee = self.session.identity()?;
    Some(Timeline::build(employee, &self.store.by_employee(&employee.id)))
  }

  fn list_len(&self) -> usize {
    match self.view() {
      View::Manager(ManagerTab::Team) => self.team_list().map_or(0, |l| l.rows.len()),
      View::Employee => self.timeline().map_or(0, |t| t.entries.len()),
      _ => 0,
    }
  }

  fn selected_team_record(&self) -> Option<FeedbackId> {
    let list = self.team_list()?;
    list.rows.get(self.cursor).map(|r| r.feedback.id.clone())
  }

  fn selected_timeline_record(&self) -> Option<FeedbackId> {
    let timeline = self.timeline()?;
    timeline.entries.get(self.cursor).map(|e| e.feedback.id.clone())
  }

  // ── Session ───────────────────────────────────────────────────────────────

  async fn submit_login(&mut self) {
    let username = self.login.username.trim().to_owned();
    let password = std::mem::take(&mut self.login.password);

    match self.session.login(&username, &password).await {
      Ok(true) => {
        self.login = LoginForm::default();
        self.identity_changed().await;
      }
      Ok(false) => self.login.error = Some(INVALID_CREDENTIALS.into()),
      Err(e) => self.login.error = Some(describe(&e)),
    }
  }

  async fn logout(&mut self) {
    self.shell.close_home();
    self.form = None;
    self.status_msg = match self.session.logout().await {
      Ok(()) => "Logged out".into(),
      Err(e) => describe(&e),
    };
  }

  /// Reset per-user state and learn the new user's team.
  async fn identity_changed(&mut self) {
    self.shell.on_identity_changed(self.session.identity());
    self.filter = TeamFilter::default();
    self.search_active = false;
    self.cursor = 0;
    self.form = None;
    self.status_msg.clear();

    let Some(identity) = self.session.identity().cloned() else {
      return;
    };
    self.roster.upsert(identity.clone());

    if !identity.is_manager() {
      return;
    }
    let Some(access) = self.session.tokens().map(|t| t.access.clone()) else {
      return;
    };
    match self.client.team(&access).await {
      Ok(Some(team)) => {
        info!(manager = %identity.id, size = team.len(), "team loaded");
        for member in team {
          self.roster.upsert(member);
        }
      }
      Ok(None) => {}
      Err(e) => {
        warn!(error = %e, "could not load team");
        self.status_msg = "Could not load team from server".into();
      }
    }
  }

  // ── Feedback actions ──────────────────────────────────────────────────────

  fn open_new_form(&mut self) {
    let mut draft = FeedbackDraft::create();
    if let Some(id) = self.filter.employee.clone() {
      // A fresh draft is never locked.
      let _ = draft.select_employee(id);
    }
    self.form = Some(FormState { draft, field: FormField::Employee });
  }

  fn open_edit_form(&mut self, id: &FeedbackId) {
    if let Some(record) = self.store.get(id) {
      self.form = Some(FormState {
        draft: FeedbackDraft::editing(record),
        field: FormField::Sentiment,
      });
    }
  }

  async fn submit_form(&mut self) {
    let (Some(form), Some(author)) = (&self.form, self.session.identity()) else {
      return;
    };
    match form.draft.submit(&mut self.store, author, &self.roster).await {
      Ok(saved) => {
        let subject = self.roster.display_name(&saved.employee_id).to_owned();
        self.status_msg = format!("Feedback for {subject} saved");
        self.form = None;
      }
      Err(e) => self.status_msg = describe(&e),
    }
  }

  async fn acknowledge_selected(&mut self) {
    let (Some(id), Some(employee)) =
      (self.selected_timeline_record(), self.session.identity().cloned())
    else {
      return;
    };
    match timeline::acknowledge(&mut self.store, &employee, &id).await {
      Ok(_) => self.status_msg = "Feedback acknowledged".into(),
      Err(e) => self.status_msg = describe(&e),
    }
  }

  /// Step the subject filter through "everyone" and each team member.
  fn cycle_employee_filter(&mut self) {
    let Some(manager) = self.session.identity() else {
      return;
    };
    let team: Vec<UserId> =
      self.roster.team_of(&manager.id).map(|m| m.id.clone()).collect();
    self.filter.employee = match &self.filter.employee {
      None => team.first().cloned(),
      Some(current) => team
        .iter()
        .position(|id| id == current)
        .and_then(|i| team.get(i + 1))
        .cloned(),
    };
    self.cursor = 0;
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    if self.form.is_some() {
      self.handle_form_key(key).await;
      return Ok(true);
    }

    match self.view() {
      View::Loading => Ok(true),
      View::Landing => Ok(self.handle_landing_key(key)),
      View::LoginModal => {
        self.handle_login_key(key).await;
        Ok(true)
      }
      View::Home => self.handle_home_key(key).await,
      View::Manager(tab) if self.search_active && tab == ManagerTab::Team => {
        self.handle_search_key(key);
        Ok(true)
      }
      View::Manager(tab) => self.handle_manager_key(tab, key).await,
      View::Employee => self.handle_employee_key(key).await,
    }
  }

  fn handle_landing_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Char('q') | KeyCode::Esc => return false,
      KeyCode::Char('l') | KeyCode::Enter => {
        self.login = LoginForm::default();
        self.shell.open_login();
      }
      _ => {}
    }
    true
  }

  async fn handle_login_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => self.shell.close_login(),
      KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
        self.login.field = match self.login.field {
          LoginField::Username => LoginField::Password,
          LoginField::Password => LoginField::Username,
        };
      }
      KeyCode::Enter => self.submit_login().await,
      KeyCode::Backspace => {
        self.login.input().pop();
      }
      KeyCode::Char(c) => self.login.input().push(c),
      _ => {}
    }
  }

  async fn handle_home_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Char('q') => return Ok(false),
      KeyCode::Char('b') | KeyCode::Esc | KeyCode::Enter => self.shell.close_home(),
      KeyCode::Char('o') => self.logout().await,
      _ => {}
    }
    Ok(true)
  }

  fn handle_search_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.search_active = false;
        self.filter.search.clear();
      }
      KeyCode::Enter => self.search_active = false,
      KeyCode::Backspace => {
        self.filter.search.pop();
      }
      KeyCode::Char(c) => self.filter.search.push(c),
      _ => {}
    }
    self.cursor = 0;
  }

  async fn handle_manager_key(
    &mut self,
    tab: ManagerTab,
    key: KeyEvent,
  ) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Char('q') => return Ok(false),
      KeyCode::Tab => {
        self.shell.active_tab = tab.next();
        self.cursor = 0;
      }
      KeyCode::Char('1') => self.shell.active_tab = ManagerTab::Dashboard,
      KeyCode::Char('2') => self.shell.active_tab = ManagerTab::Team,
      KeyCode::Char('h') => self.shell.open_home(),
      KeyCode::Char('o') => self.logout().await,
      KeyCode::Char('n') => self.open_new_form(),

      _ if tab == ManagerTab::Team => self.handle_team_key(key),
      _ => {}
    }
    Ok(true)
  }

  fn handle_team_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('/') => {
        self.search_active = true;
        self.cursor = 0;
      }
      KeyCode::Char('e') => self.cycle_employee_filter(),
      KeyCode::Char('c') => {
        self.filter = TeamFilter::default();
        self.cursor = 0;
      }
      KeyCode::Enter => {
        if let Some(id) = self.selected_team_record() {
          self.open_edit_form(&id);
        }
      }
      _ => self.move_cursor(key),
    }
  }

  async fn handle_employee_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Char('q') => return Ok(false),
      KeyCode::Char('h') => self.shell.open_home(),
      KeyCode::Char('o') => self.logout().await,
      KeyCode::Char('a') | KeyCode::Enter => self.acknowledge_selected().await,
      _ => self.move_cursor(key),
    }
    Ok(true)
  }

  fn move_cursor(&mut self, key: KeyEvent) {
    let len = self.list_len();
    match key.code {
      KeyCode::Down | KeyCode::Char('j') if self.cursor + 1 < len => self.cursor += 1,
      KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),
      _ => {}
    }
  }

  async fn handle_form_key(&mut self, key: KeyEvent) {
    let team: Vec<UserId> = self
      .session
      .identity()
      .map(|m| self.roster.team_of(&m.id).map(|t| t.id.clone()).collect())
      .unwrap_or_default();

    let Some(form) = self.form.as_mut() else {
      return;
    };
    match key.code {
      KeyCode::Esc => {
        self.form = None;
        return;
      }
      KeyCode::Enter => {
        self.submit_form().await;
        return;
      }
      KeyCode::Tab | KeyCode::Down => form.field = form.field.next(),
      KeyCode::BackTab | KeyCode::Up => form.field = form.field.prev(),
      KeyCode::Left | KeyCode::Right => {
        let forward = key.code == KeyCode::Right;
        match form.field {
          FormField::Employee => {
            let next = step(&team, form.draft.employee_id(), forward);
            if let Some(id) = next
              && let Err(e) = form.draft.select_employee(id)
            {
              self.status_msg = describe(&e);
            }
          }
          FormField::Sentiment => {
            let all: Vec<Sentiment> = Sentiment::iter().collect();
            if let Some(s) = step(&all, Some(&form.draft.sentiment), forward) {
              form.draft.sentiment = s;
            }
          }
          _ => {}
        }
      }
      KeyCode::Backspace => {
        if let Some(text) = text_field(form) {
          text.pop();
        }
      }
      KeyCode::Char(c) => {
        if let Some(text) = text_field(form) {
          text.push(c);
        }
      }
      _ => {}
    }
  }
}

fn text_field(form: &mut FormState) -> Option<&mut String> {
  match form.field {
    FormField::Strengths => Some(&mut form.draft.strengths),
    FormField::Improvements => Some(&mut form.draft.improvements),
    _ => None,
  }
}

/// The neighbour of `current` in `items`, wrapping around.
fn step<T: Clone + PartialEq>(items: &[T], current: Option<&T>, forward: bool) -> Option<T> {
  if items.is_empty() {
    return None;
  }
  let len = items.len();
  let i = match current.and_then(|c| items.iter().position(|x| x == c)) {
    Some(i) if forward => (i + 1) % len,
    Some(i) => (i + len - 1) % len,
    None => 0,
  };
  items.get(i).cloned()
}

/// A one-line message for the status bar.
fn describe(e: &Error) -> String {
  match e {
    Error::EmptyField(field) => format!("Please fill in {field}"),
    Error::NotOnTeam(_) => "That employee is not on your team".into(),
    Error::SubjectLocked => "The employee cannot be changed when editing".into(),
    Error::Storage(_) => format!("Could not save: {e}"),
    other => other.to_string(),
  }
}
