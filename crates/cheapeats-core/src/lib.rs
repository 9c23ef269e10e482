//! Core types and trait definitions for CheapEats.
//!
//! This crate is deliberately free of HTTP and database dependencies. Storage
//! backends implement [`store::RestaurantStore`], upstream providers implement
//! [`places::PlacesSource`], and the engine and API crates depend only on
//! those abstractions.

pub mod classify;
pub mod error;
pub mod geo;
pub mod menu;
pub mod places;
pub mod provenance;
pub mod restaurant;
pub mod store;

pub use error::Error;
