//! Route handlers.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/login/` | Body: `{"username","password"}` |
//! | `POST` | `/auth/refresh/` | Body: `{"refresh"}` |
//! | `GET`  | `/auth/me/` | Bearer |
//! | `GET`  | `/auth/team/` | Bearer, managers only |

use axum::{Json, extract::State};
use flow_core::{auth::Tokens, identity::Identity};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{AppState, auth::CurrentUser, error::Error};

// ─── Login ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub username: String,
  pub password: String,
}

/// `POST /auth/login/`
pub async fn login(
  State(state): State<AppState>,
  Json(body): Json<LoginBody>,
) -> Result<Json<Tokens>, Error> {
  let Some(identity) = state.users.verify(&body.username, &body.password) else {
    warn!(username = %body.username, "login rejected");
    return Err(Error::Unauthorized);
  };
  info!(user = %identity.id, role = %identity.role, "login");
  Ok(Json(state.tokens.issue_pair(&identity.id)))
}

// ─── Refresh ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RefreshBody {
  pub refresh: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccessBody {
  pub access: String,
}

/// `POST /auth/refresh/`
pub async fn refresh(
  State(state): State<AppState>,
  Json(body): Json<RefreshBody>,
) -> Result<Json<AccessBody>, Error> {
  let access = state.tokens.refresh(&body.refresh).ok_or(Error::Unauthorized)?;
  Ok(Json(AccessBody { access }))
}

// ─── Me ───────────────────────────────────────────────────────────────────────

/// `GET /auth/me/`
pub async fn me(CurrentUser(identity): CurrentUser) -> Json<Identity> {
  Json(identity)
}

// ─── Team ─────────────────────────────────────────────────────────────────────

/// `GET /auth/team/`
pub async fn team(
  State(state): State<AppState>,
  CurrentUser(identity): CurrentUser,
) -> Result<Json<Vec<Identity>>, Error> {
  if !identity.is_manager() {
    return Err(Error::Forbidden("Only managers can view their team.".into()));
  }
  let team = state.users.roster().team_of(&identity.id).cloned().collect();
  Ok(Json(team))
}
