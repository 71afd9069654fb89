//! Router tests, driven in-process with `tower::ServiceExt::oneshot`.

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
  response::Response,
};
use flow_core::{
  auth::Tokens,
  identity::{Identity, Role},
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{
  AppState, ServerConfig, handlers::AccessBody, router,
  users::{DEMO_PASSWORD, UserDirectory},
};

fn demo_state() -> AppState {
  AppState::new(&ServerConfig::default(), UserDirectory::demo().unwrap())
}

async fn send(
  state: &AppState,
  method: &str,
  uri: &str,
  bearer: Option<&str>,
  body: Option<Value>,
) -> Response {
  let mut builder = Request::builder().method(method).uri(uri);
  if let Some(token) = bearer {
    builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
  }
  let req = match body {
    Some(v) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(v.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  };
  router(state.clone()).oneshot(req).await.unwrap()
}

async fn json_body<T: DeserializeOwned>(resp: Response) -> T {
  let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
    .await
    .unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

async fn login(state: &AppState, username: &str) -> Tokens {
  let resp = send(
    state,
    "POST",
    "/auth/login/",
    None,
    Some(json!({ "username": username, "password": DEMO_PASSWORD })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  json_body(resp).await
}

// ── Login ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn login_issues_token_pair() {
  let state = demo_state();
  let tokens = login(&state, "sarah").await;
  assert_eq!(tokens.access.len(), 64);
  assert_eq!(tokens.refresh.len(), 64);
}

#[tokio::test]
async fn bad_password_is_401() {
  let state = demo_state();
  let resp = send(
    &state,
    "POST",
    "/auth/login/",
    None,
    Some(json!({ "username": "sarah", "password": "nope" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));
}

// ── Me ──────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn me_returns_identity() {
  let state = demo_state();
  let tokens = login(&state, "emily").await;
  let resp = send(&state, "GET", "/auth/me/", Some(&tokens.access), None).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let me: Identity = json_body(resp).await;
  assert_eq!(me.id.as_str(), "3");
  assert_eq!(me.role, Role::Employee);
  assert_eq!(me.manager_id.as_ref().map(|m| m.as_str()), Some("1"));
}

#[tokio::test]
async fn me_without_token_is_401() {
  let state = demo_state();
  let resp = send(&state, "GET", "/auth/me/", None, None).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

  let resp = send(&state, "GET", "/auth/me/", Some("deadbeef"), None).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_token_is_not_an_access_token() {
  let state = demo_state();
  let tokens = login(&state, "mike").await;
  let resp = send(&state, "GET", "/auth/me/", Some(&tokens.refresh), None).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ── Team ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn manager_sees_team() {
  let state = demo_state();
  let tokens = login(&state, "sarah").await;
  let resp = send(&state, "GET", "/auth/team/", Some(&tokens.access), None).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let team: Vec<Identity> = json_body(resp).await;
  let ids: Vec<&str> = team.iter().map(|m| m.id.as_str()).collect();
  assert_eq!(ids, ["2", "3", "4"]);
}

#[tokio::test]
async fn employee_team_request_is_403() {
  let state = demo_state();
  let tokens = login(&state, "david").await;
  let resp = send(&state, "GET", "/auth/team/", Some(&tokens.access), None).await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);

  let body: Value = json_body(resp).await;
  assert_eq!(body, json!({ "detail": "Only managers can view their team." }));
}

// ── Refresh ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn refresh_issues_working_access_token() {
  let state = demo_state();
  let tokens = login(&state, "sarah").await;
  let resp = send(
    &state,
    "POST",
    "/auth/refresh/",
    None,
    Some(json!({ "refresh": tokens.refresh })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let AccessBody { access } = json_body(resp).await;

  let resp = send(&state, "GET", "/auth/me/", Some(&access), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_refresh_is_401() {
  let state = demo_state();
  let resp = send(
    &state,
    "POST",
    "/auth/refresh/",
    None,
    Some(json!({ "refresh": "0000" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_access_is_401() {
  let config = ServerConfig { access_ttl_secs: 0, ..ServerConfig::default() };
  let state = AppState::new(&config, UserDirectory::demo().unwrap());
  let tokens = login(&state, "sarah").await;
  let resp = send(&state, "GET", "/auth/me/", Some(&tokens.access), None).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ── Config ──────────────────────────────────────────────────────────────────

#[test]
fn users_deserialise_from_toml_config() {
  let hash = crate::users::hash_password("pw").unwrap();
  let toml = format!(
    r#"
port = 9000

[[users]]
username      = "ann"
password_hash = "{hash}"
id            = "10"
name          = "Ann Lee"
email         = "ann@example.com"
role          = "manager"

[[users]]
username      = "bo"
password_hash = "{hash}"
id            = "11"
name          = "Bo Kim"
email         = "bo@example.com"
role          = "employee"
manager_id    = "10"
"#
  );
  let config: ServerConfig = config::Config::builder()
    .add_source(config::File::from_str(&toml, config::FileFormat::Toml))
    .build()
    .unwrap()
    .try_deserialize()
    .unwrap();
  assert_eq!(config.port, 9000);
  assert_eq!(config.access_ttl_secs, 300);

  let state = AppState::from_config(&config).unwrap();
  let bo = state.users.verify("bo", "pw").unwrap();
  assert_eq!(bo.manager_id.as_ref().map(|m| m.as_str()), Some("10"));
}
