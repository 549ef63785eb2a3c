//! Error types for `repairs-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("ticket not found: {0}")]
  TicketNotFound(i64),

  #[error("employee not found: {0}")]
  EmployeeNotFound(i64),

  #[error("customer not found: {0}")]
  CustomerNotFound(i64),

  #[error("user not found: {0}")]
  UserNotFound(i64),

  #[error("username already taken: {0:?}")]
  UsernameTaken(String),
}

impl Error {
  /// `true` for every "lookup by id yielded nothing" variant.
  pub fn is_not_found(&self) -> bool {
    matches!(
      self,
      Self::TicketNotFound(_)
        | Self::EmployeeNotFound(_)
        | Self::CustomerNotFound(_)
        | Self::UserNotFound(_)
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
