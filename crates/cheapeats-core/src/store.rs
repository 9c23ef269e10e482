//! The `RestaurantStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `cheapeats-store-sqlite`).
//! The engine and API crates depend on this abstraction, not on any concrete
//! backend.

use std::future::Future;

use crate::{
  menu::{MenuCategory, MenuItem, NewMenuItem, PriceHistory},
  provenance::{NewScrapedRecord, ScrapedRecord},
  restaurant::{PriceRange, Restaurant, RestaurantDraft},
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Parameters for [`RestaurantStore::list_restaurants`]. Unset fields don't
/// filter.
#[derive(Debug, Clone, Default)]
pub struct RestaurantFilter {
  pub city:        Option<String>,
  pub cuisine:     Option<String>,
  pub price_range: Option<PriceRange>,
}

/// Parameters for [`RestaurantStore::list_menu_items`].
#[derive(Debug, Clone, Default)]
pub struct MenuFilter {
  pub category:  Option<MenuCategory>,
  /// Inclusive upper bound on price.
  pub max_price: Option<f64>,
}

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Behaviour every backend error must expose to callers.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// `true` when a write was rejected by a uniqueness constraint, e.g. two
  /// concurrent fetches racing to create the same `external_id`.
  fn is_conflict(&self) -> bool;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a CheapEats persistence backend.
///
/// Price history and provenance records are append-only. Restaurants are
/// created and updated but never deleted through this trait.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait RestaurantStore: Send + Sync {
  type Error: StoreError;

  // ── Restaurants ───────────────────────────────────────────────────────

  fn find_restaurant_by_external_id<'a>(
    &'a self,
    external_id: &'a str,
  ) -> impl Future<Output = Result<Option<Restaurant>, Self::Error>> + Send + 'a;

  fn get_restaurant(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Restaurant>, Self::Error>> + Send + '_;

  /// Insert a new restaurant. Fails with a conflict error if the draft's
  /// `external_id` is already stored.
  fn create_restaurant(
    &self,
    draft: RestaurantDraft,
  ) -> impl Future<Output = Result<Restaurant, Self::Error>> + Send + '_;

  /// Persist every mutable field of `restaurant` by `id` and return the row
  /// as stored (with a fresh `updated_at`). `external_id` and `created_at`
  /// are never rewritten.
  fn update_restaurant<'a>(
    &'a self,
    restaurant: &'a Restaurant,
  ) -> impl Future<Output = Result<Restaurant, Self::Error>> + Send + 'a;

  fn list_restaurants<'a>(
    &'a self,
    filter: &'a RestaurantFilter,
  ) -> impl Future<Output = Result<Vec<Restaurant>, Self::Error>> + Send + 'a;

  /// All restaurants whose latitude lies in `[min_lat, max_lat]`.
  fn restaurants_in_latitude_band(
    &self,
    min_lat: f64,
    max_lat: f64,
  ) -> impl Future<Output = Result<Vec<Restaurant>, Self::Error>> + Send + '_;

  // ── Menu items ────────────────────────────────────────────────────────

  /// Look up a restaurant's menu item by name.
  fn find_menu_item<'a>(
    &'a self,
    restaurant_id: i64,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<MenuItem>, Self::Error>> + Send + 'a;

  fn get_menu_item(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<MenuItem>, Self::Error>> + Send + '_;

  fn create_menu_item(
    &self,
    input: NewMenuItem,
  ) -> impl Future<Output = Result<MenuItem, Self::Error>> + Send + '_;

  /// Set a menu item's current price. Callers record the matching
  /// [`PriceHistory`] row first via [`Self::append_price_history`].
  fn update_menu_item_price(
    &self,
    menu_item_id: i64,
    price: f64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn list_menu_items<'a>(
    &'a self,
    restaurant_id: i64,
    filter: &'a MenuFilter,
  ) -> impl Future<Output = Result<Vec<MenuItem>, Self::Error>> + Send + 'a;

  // ── Price history (append-only) ───────────────────────────────────────

  fn append_price_history(
    &self,
    menu_item_id: i64,
    price: f64,
  ) -> impl Future<Output = Result<PriceHistory, Self::Error>> + Send + '_;

  /// Every recorded price for a menu item, newest first.
  fn price_history(
    &self,
    menu_item_id: i64,
  ) -> impl Future<Output = Result<Vec<PriceHistory>, Self::Error>> + Send + '_;

  // ── Provenance (append-only) ──────────────────────────────────────────

  fn append_scraped_record(
    &self,
    input: NewScrapedRecord,
  ) -> impl Future<Output = Result<ScrapedRecord, Self::Error>> + Send + '_;

  /// Provenance records for a restaurant, oldest first.
  fn scraped_records(
    &self,
    restaurant_id: i64,
  ) -> impl Future<Output = Result<Vec<ScrapedRecord>, Self::Error>> + Send + '_;
}
