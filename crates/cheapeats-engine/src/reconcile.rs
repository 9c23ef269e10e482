//! Merge fetched places into the restaurant store.
//!
//! Places are processed one at a time in the order the provider returned
//! them, with a fixed delay between consecutive places. Only a failed initial
//! search fails the whole run; everything else is logged, counted in the
//! [`ReconcileReport`] and skipped.

use std::{sync::Arc, time::Duration};

use cheapeats_core::{
  classify,
  geo::Point,
  menu::NewMenuItem,
  places::{PlaceDetail, PlaceSummary, PlacesSource, UpstreamError},
  provenance::{GOOGLE_PLACES_SOURCE, NewScrapedRecord},
  restaurant::{Restaurant, RestaurantDraft},
  store::{RestaurantStore, StoreError as _},
};
use serde::Serialize;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::menu::{self, Jitter, RandomJitter};

// ─── Configuration ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
  /// Pause between consecutive places, as a courtesy to the provider.
  pub throttle: Duration,
  /// Name recorded on provenance rows.
  pub source:   String,
}

impl Default for ReconcilerConfig {
  fn default() -> Self {
    Self {
      throttle: Duration::from_millis(100),
      source:   GOOGLE_PLACES_SOURCE.to_owned(),
    }
  }
}

// ─── Report ──────────────────────────────────────────────────────────────────

/// Tally of one reconcile run. Partial failures show up here and in the logs,
/// never as an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
  /// Places returned by the search.
  pub fetched:             usize,
  pub created:             usize,
  pub updated:             usize,
  /// Places dropped because a restaurant write failed.
  pub skipped:             usize,
  /// Places whose details lookup failed; they were still stored.
  pub enrichment_failures: usize,
  pub menu_items_created:  usize,
  pub price_changes:       usize,
  /// The run stopped early because its token was cancelled.
  pub cancelled:           bool,
}

// ─── Projection ──────────────────────────────────────────────────────────────

/// Project a search result onto the restaurant fields it determines.
pub fn draft_from_place(place: &PlaceSummary) -> RestaurantDraft {
  RestaurantDraft {
    external_id:  place.place_id.clone(),
    name:         place.name.clone(),
    address:      place.formatted_address.clone(),
    parts:        classify::parse_address(&place.formatted_address),
    latitude:     place.location.lat,
    longitude:    place.location.lng,
    cuisine_type: classify::cuisine(&place.types).to_owned(),
    phone:        None,
    website:      None,
    rating:       place.rating.unwrap_or_default(),
    price_range:  classify::price_range(place.price_level),
  }
}

// ─── Reconciler ──────────────────────────────────────────────────────────────

/// Fetches places around a point and merges them into a store.
pub struct Reconciler<S, P> {
  store:  Arc<S>,
  places: Arc<P>,
  jitter: Arc<dyn Jitter>,
  config: ReconcilerConfig,
}

impl<S, P> Clone for Reconciler<S, P> {
  fn clone(&self) -> Self {
    Self {
      store:  Arc::clone(&self.store),
      places: Arc::clone(&self.places),
      jitter: Arc::clone(&self.jitter),
      config: self.config.clone(),
    }
  }
}

impl<S, P> Reconciler<S, P>
where
  S: RestaurantStore,
  P: PlacesSource,
{
  pub fn new(store: Arc<S>, places: Arc<P>, config: ReconcilerConfig) -> Self {
    Self { store, places, jitter: Arc::new(RandomJitter), config }
  }

  /// Replace the price jitter source.
  pub fn with_jitter(mut self, jitter: impl Jitter + 'static) -> Self {
    self.jitter = Arc::new(jitter);
    self
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  /// Search around `center` and merge every result into the store.
  ///
  /// Fails only when the search itself fails. Cancellation is honoured
  /// between places and during the throttle delay; a cancelled run returns
  /// the partial report with `cancelled` set.
  pub async fn reconcile(
    &self,
    center: Point,
    radius_m: u32,
    cancel: &CancellationToken,
  ) -> Result<ReconcileReport, UpstreamError> {
    let places = self.places.search_nearby(center, radius_m, cancel).await?;

    let mut report = ReconcileReport { fetched: places.len(), ..Default::default() };
    info!(lat = center.lat, lng = center.lng, radius_m, fetched = report.fetched, "reconciling places");

    for (i, place) in places.iter().enumerate() {
      if cancel.is_cancelled() {
        report.cancelled = true;
        break;
      }

      if let Err(e) = self.reconcile_place(place, cancel, &mut report).await {
        report.skipped += 1;
        if e.is_conflict() {
          info!(place_id = %place.place_id, "restaurant created concurrently; skipping place");
        } else {
          warn!(place_id = %place.place_id, name = %place.name, error = %e, "failed to store restaurant; skipping place");
        }
      }

      if i + 1 < places.len() && !self.config.throttle.is_zero() {
        tokio::select! {
          _ = cancel.cancelled() => {
            report.cancelled = true;
            break;
          }
          _ = tokio::time::sleep(self.config.throttle) => {}
        }
      }
    }

    info!(?report, "reconcile finished");
    Ok(report)
  }

  /// Steps for a single place. Errors returned here mean the restaurant
  /// itself could not be written; menu and provenance failures are absorbed.
  async fn reconcile_place(
    &self,
    place: &PlaceSummary,
    cancel: &CancellationToken,
    report: &mut ReconcileReport,
  ) -> Result<(), S::Error> {
    let draft = draft_from_place(place);
    let (mut restaurant, created) = self.upsert(draft).await?;

    let detail = match self.places.place_details(&place.place_id, cancel).await {
      Ok(detail) => {
        restaurant.enrich(detail.phone.as_deref(), detail.website.as_deref());
        Some(detail)
      }
      Err(e) => {
        report.enrichment_failures += 1;
        warn!(place_id = %place.place_id, name = %place.name, error = %e, "failed to fetch place details");
        None
      }
    };

    let restaurant = self.store.update_restaurant(&restaurant).await?;
    if created {
      report.created += 1;
    } else {
      report.updated += 1;
    }

    self.refresh_menu(&restaurant, place.price_level, report).await;
    self.record_provenance(&restaurant, place, detail.as_ref()).await;
    Ok(())
  }

  /// Create the restaurant, or apply the draft to the stored row.
  /// Returns the row and whether it was newly created.
  async fn upsert(&self, draft: RestaurantDraft) -> Result<(Restaurant, bool), S::Error> {
    match self.store.find_restaurant_by_external_id(&draft.external_id).await? {
      None => {
        let restaurant = self.store.create_restaurant(draft).await?;
        debug!(id = restaurant.id, external_id = %restaurant.external_id, "created restaurant");
        Ok((restaurant, true))
      }
      Some(mut existing) => {
        existing.apply(&draft);
        let restaurant = self.store.update_restaurant(&existing).await?;
        Ok((restaurant, false))
      }
    }
  }

  async fn refresh_menu(
    &self,
    restaurant: &Restaurant,
    price_level: Option<i64>,
    report: &mut ReconcileReport,
  ) {
    for item in menu::synthesize(restaurant.id, price_level, self.jitter.as_ref()) {
      let name = item.name.clone();
      if let Err(e) = self.reconcile_item(item, report).await {
        warn!(restaurant_id = restaurant.id, item = %name, error = %e, "failed to reconcile menu item");
      }
    }
  }

  /// Create a missing item or reprice an existing one. Every price the item
  /// takes on gets a history row, written before the item itself changes.
  async fn reconcile_item(
    &self,
    item: NewMenuItem,
    report: &mut ReconcileReport,
  ) -> Result<(), S::Error> {
    match self.store.find_menu_item(item.restaurant_id, &item.name).await? {
      None => {
        let created = self.store.create_menu_item(item).await?;
        report.menu_items_created += 1;
        self.store.append_price_history(created.id, created.price).await?;
      }
      Some(existing) if existing.price != item.price => {
        self.store.append_price_history(existing.id, item.price).await?;
        self.store.update_menu_item_price(existing.id, item.price).await?;
        report.price_changes += 1;
        debug!(menu_item_id = existing.id, old = existing.price, new = item.price, "price changed");
      }
      Some(_) => {}
    }
    Ok(())
  }

  async fn record_provenance(
    &self,
    restaurant: &Restaurant,
    place: &PlaceSummary,
    detail: Option<&PlaceDetail>,
  ) {
    let record = NewScrapedRecord {
      source:        self.config.source.clone(),
      restaurant_id: Some(restaurant.id),
      raw_data:      json!({
        "search_result": place.raw,
        "details": detail.map(|d| &d.raw),
      }),
    };

    if let Err(e) = self.store.append_scraped_record(record).await {
      warn!(restaurant_id = restaurant.id, error = %e, "failed to record provenance");
    }
  }
}
