//! The [`Authenticated`] extractor.
//!
//! The authentication layer in front of the router resolves credentials and
//! stores a [`Caller`] in the request extensions. Handlers take the caller
//! as an explicit argument through this extractor.

use axum::{extract::FromRequestParts, http::request::Parts};
use repairs_core::access::Caller;

use crate::error::ApiError;

/// The authenticated caller of the current request.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Caller);

impl<S> FromRequestParts<S> for Authenticated
where
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
    parts
      .extensions
      .get::<Caller>()
      .cloned()
      .map(Authenticated)
      .ok_or(ApiError::Unauthorized)
  }
}
