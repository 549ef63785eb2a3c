//! HTTP Basic authentication against the user table.
//!
//! [`require_caller`] runs in front of the API router. On success it inserts
//! the resolved [`Caller`] into the request extensions, where the API's
//! `Authenticated` extractor picks it up.

use std::sync::{Arc, LazyLock};

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::{
  extract::{Request, State},
  http::HeaderMap,
  middleware::Next,
  response::Response,
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use rand_core::OsRng;
use repairs_api::ApiError;
use repairs_core::{access::Caller, store::RepairStore};

/// Hash checked when the username is unknown, so a miss costs one argon2
/// verification like a hit does.
static DUMMY_HASH: LazyLock<Option<String>> =
  LazyLock::new(|| hash_password("no such user").ok());

/// Hash `password` into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
  let salt = SaltString::generate(&mut OsRng);
  Ok(Argon2::default().hash_password(password.as_bytes(), &salt)?.to_string())
}

/// Check `password` against a stored PHC string. A malformed hash never
/// verifies.
pub fn verify_password(password: &str, phc: &str) -> bool {
  PasswordHash::new(phc)
    .and_then(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed))
    .is_ok()
}

/// Extract `(username, password)` from an `Authorization: Basic …` header.
pub fn basic_credentials(headers: &HeaderMap) -> Result<(String, String), ApiError> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(ApiError::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| ApiError::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| ApiError::Unauthorized)?;

  let (username, password) = creds.split_once(':').ok_or(ApiError::Unauthorized)?;
  Ok((username.to_owned(), password.to_owned()))
}

/// Middleware: authenticate the request and attach its [`Caller`].
pub async fn require_caller<S>(
  State(store): State<Arc<S>>,
  mut req: Request,
  next: Next,
) -> Result<Response, ApiError>
where
  S: RepairStore + 'static,
{
  let (username, password) = basic_credentials(req.headers())?;

  let creds = store
    .find_credentials(&username)
    .await
    .map_err(ApiError::from_store)?;

  let Some(creds) = creds else {
    if let Some(dummy) = DUMMY_HASH.as_deref() {
      verify_password(&password, dummy);
    }
    tracing::warn!(%username, "unknown user");
    return Err(ApiError::Unauthorized);
  };
  if !verify_password(&password, &creds.password_hash) {
    tracing::warn!(%username, "rejected credentials");
    return Err(ApiError::Unauthorized);
  }

  req.extensions_mut().insert(Caller::from_user(&creds.user));
  Ok(next.run(req).await)
}
