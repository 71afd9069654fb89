//! Error types and axum `IntoResponse` implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Bad credentials, or a missing, unknown or expired token.
  #[error("unauthorized")]
  Unauthorized,

  #[error("forbidden: {0}")]
  Forbidden(String),

  /// The configured user list does not form a valid roster.
  #[error("invalid user configuration: {0}")]
  Users(#[from] flow_core::Error),

  #[error("password hashing failed: {0}")]
  Hash(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::Unauthorized => {
        let mut res = (
          StatusCode::UNAUTHORIZED,
          Json(json!({ "detail": "Invalid or missing credentials." })),
        )
          .into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Bearer realm=\"feedbackflow\""),
        );
        res
      }
      Error::Forbidden(msg) => {
        (StatusCode::FORBIDDEN, Json(json!({ "detail": msg }))).into_response()
      }
      Error::Users(e) => {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "detail": e.to_string() })))
          .into_response()
      }
      Error::Hash(msg) => {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "detail": msg }))).into_response()
      }
    }
  }
}
