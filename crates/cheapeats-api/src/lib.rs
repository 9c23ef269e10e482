//! JSON REST API for CheapEats.
//!
//! Exposes an axum [`Router`] backed by any [`RestaurantStore`] and
//! [`PlacesSource`]. TLS, tracing and CORS layers are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api/v1", cheapeats_api::api_router(state))
//! ```

pub mod error;
pub mod extract;
pub mod menu_items;
pub mod restaurants;

use std::sync::Arc;

use axum::{Json, Router, routing::get};
use cheapeats_core::{places::PlacesSource, store::RestaurantStore};
use cheapeats_engine::Reconciler;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

pub use error::ApiError;

pub const DEFAULT_RADIUS_M: u32 = 1000;

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct AppState<S, P> {
  pub reconciler:       Reconciler<S, P>,
  /// Cancelled at server shutdown; every search reconciles under a child of
  /// this token.
  pub shutdown:         CancellationToken,
  /// Radius used by `/restaurants/search` when the caller gives none.
  pub default_radius_m: u32,
}

impl<S, P> AppState<S, P> {
  pub fn new(reconciler: Reconciler<S, P>, shutdown: CancellationToken) -> Self {
    Self { reconciler, shutdown, default_radius_m: DEFAULT_RADIUS_M }
  }

  pub fn with_default_radius(mut self, radius_m: u32) -> Self {
    self.default_radius_m = radius_m;
    self
  }
}

impl<S, P> AppState<S, P>
where
  S: RestaurantStore,
  P: PlacesSource,
{
  pub fn store(&self) -> &Arc<S> { self.reconciler.store() }
}

impl<S, P> Clone for AppState<S, P> {
  fn clone(&self) -> Self {
    Self {
      reconciler:       self.reconciler.clone(),
      shutdown:         self.shutdown.clone(),
      default_radius_m: self.default_radius_m,
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, P>(state: AppState<S, P>) -> Router<()>
where
  S: RestaurantStore + 'static,
  P: PlacesSource + 'static,
{
  Router::new()
    .route("/health", get(health))
    // Restaurants
    .route("/restaurants", get(restaurants::list::<S, P>))
    .route("/restaurants/search", get(restaurants::search::<S, P>))
    .route("/restaurants/{id}", get(restaurants::get_one::<S, P>))
    .route("/restaurants/{id}/menu", get(restaurants::menu::<S, P>))
    // Menu items
    .route("/menu-items/{id}", get(menu_items::get_one::<S, P>))
    .route("/menu-items/{id}/price-history", get(menu_items::history::<S, P>))
    .with_state(state)
}

/// `GET /health`
async fn health() -> Json<Value> { Json(json!({ "status": "healthy" })) }

#[cfg(test)]
mod tests;
