//! Error type for `repairs-store-sqlite`.

use repairs_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] repairs_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date parse error: {0}")]
  DateParse(String),
}

impl StoreError for Error {
  fn is_not_found(&self) -> bool {
    matches!(self, Error::Core(e) if e.is_not_found())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
