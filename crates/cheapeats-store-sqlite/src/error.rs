//! Error type for `cheapeats-store-sqlite`.

use cheapeats_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] cheapeats_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("restaurant not found: {0}")]
  RestaurantNotFound(i64),

  #[error("menu item not found: {0}")]
  MenuItemNotFound(i64),
}

impl StoreError for Error {
  fn is_conflict(&self) -> bool {
    match self {
      Error::Database(tokio_rusqlite::Error::Rusqlite(
        rusqlite::Error::SqliteFailure(e, _),
      )) => {
        e.code == rusqlite::ErrorCode::ConstraintViolation
          && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
      }
      _ => false,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
