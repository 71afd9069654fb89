//! Bearer-token extractor.

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use flow_core::identity::Identity;

use crate::{AppState, error::Error};

/// The identity behind the request's access token.
pub struct CurrentUser(pub Identity);

/// Resolve the `Authorization: Bearer …` header against the token table.
pub fn verify_bearer(headers: &HeaderMap, state: &AppState) -> Result<Identity, Error> {
  let token = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .ok_or(Error::Unauthorized)?;

  let user = state.tokens.authenticate(token.trim()).ok_or(Error::Unauthorized)?;
  state
    .users
    .identity(&user)
    .cloned()
    .ok_or(Error::Unauthorized)
}

impl FromRequestParts<AppState> for CurrentUser {
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState,
  ) -> Result<Self, Self::Rejection> {
    verify_bearer(&parts.headers, state).map(CurrentUser)
  }
}
