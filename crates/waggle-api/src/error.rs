//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use waggle_core::ErrorKind;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// The request itself could not be interpreted (malformed query values).
  #[error("bad request: {0}")]
  BadRequest(String),

  /// The engine rejected the operation; the status code follows the
  /// error's [`ErrorKind`].
  #[error(transparent)]
  Engine(#[from] waggle_core::Error),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Engine(e) => {
        let status = match e.kind() {
          ErrorKind::Validation => StatusCode::BAD_REQUEST,
          ErrorKind::NotFound => StatusCode::NOT_FOUND,
          ErrorKind::Persistence => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
