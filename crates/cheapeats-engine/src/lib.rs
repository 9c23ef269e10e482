//! Fetch-and-reconcile engine and geo queries for CheapEats.
//!
//! [`Reconciler`] merges places fetched from a [`PlacesSource`] into a
//! [`RestaurantStore`], refreshes each restaurant's synthesized menu and keeps
//! the price-history ledger. [`nearby_search`] answers radius queries against
//! whatever the store currently holds.
//!
//! [`PlacesSource`]: cheapeats_core::places::PlacesSource
//! [`RestaurantStore`]: cheapeats_core::store::RestaurantStore

pub mod menu;
pub mod nearby;
pub mod reconcile;

pub use menu::{Jitter, RandomJitter};
pub use nearby::nearby_search;
pub use reconcile::{ReconcileReport, Reconciler, ReconcilerConfig};
