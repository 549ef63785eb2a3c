//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use repairs_core::store::StoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("unauthorized")]
  Unauthorized,

  #[error("forbidden: {0}")]
  Forbidden(String),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Not-found store errors become 404; everything else is a 500.
  pub fn from_store<E: StoreError>(e: E) -> Self {
    if e.is_not_found() {
      ApiError::NotFound(e.to_string())
    } else {
      ApiError::Store(Box::new(e))
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { ApiError::BadRequest(rejection.body_text()) }
}

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self { ApiError::BadRequest(rejection.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self { ApiError::BadRequest(rejection.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized".to_owned()),
      ApiError::Forbidden(m) => (StatusCode::FORBIDDEN, m.clone()),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };

    let mut res = (status, Json(json!({ "error": message }))).into_response();
    if matches!(self, ApiError::Unauthorized) {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"repairs\""),
      );
    }
    res
  }
}
