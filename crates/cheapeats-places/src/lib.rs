//! Google Places client implementing [`cheapeats_core::places::PlacesSource`].

pub mod client;
pub mod error;

pub use client::{GooglePlacesClient, PlacesConfig};
pub use error::{Error, Result};
