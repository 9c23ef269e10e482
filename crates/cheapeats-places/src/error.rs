//! Error type for `cheapeats-places`.
//!
//! Request failures surface as [`cheapeats_core::places::UpstreamError`]; this
//! type only covers building the client.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to build HTTP client: {0}")]
  Client(#[from] reqwest::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
