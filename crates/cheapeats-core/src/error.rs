//! Error types for `cheapeats-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown price range: {0:?}")]
  UnknownPriceRange(String),

  #[error("unknown menu category: {0:?}")]
  UnknownMenuCategory(String),
}
