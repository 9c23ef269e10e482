//! Handlers for `/restaurants` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/restaurants` | Optional `?city=`, `?cuisine=`, `?price_range=` |
//! | `GET`  | `/restaurants/search` | `?lat=&lng=[&radius=]`; reconciles first |
//! | `GET`  | `/restaurants/{id}` | Includes `menu_items`; 404 if not found |
//! | `GET`  | `/restaurants/{id}/menu` | Optional `?category=`, `?max_price=` |

use axum::{Json, extract::State};
use cheapeats_core::{
  geo::{Point, Ranked},
  menu::{MenuCategory, MenuItem},
  places::PlacesSource,
  restaurant::{PriceRange, Restaurant},
  store::{MenuFilter, RestaurantFilter, RestaurantStore},
};
use cheapeats_engine::nearby_search;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
  AppState,
  error::ApiError,
  extract::{ApiPath, ApiQuery},
};

/// Largest radius the places provider accepts, in metres.
pub const MAX_RADIUS_M: u32 = 50_000;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  pub city:        Option<String>,
  pub cuisine:     Option<String>,
  pub price_range: Option<PriceRange>,
}

/// `GET /restaurants[?city=..][&cuisine=..][&price_range=..]`
pub async fn list<S, P>(
  State(state): State<AppState<S, P>>,
  ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<Vec<Restaurant>>, ApiError>
where
  S: RestaurantStore,
  P: PlacesSource,
{
  let filter = RestaurantFilter {
    city:        params.city.filter(|s| !s.is_empty()),
    cuisine:     params.cuisine.filter(|s| !s.is_empty()),
    price_range: params.price_range,
  };
  let restaurants = state
    .store()
    .list_restaurants(&filter)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(restaurants))
}

// ─── Search ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SearchParams {
  pub lat:    f64,
  pub lng:    f64,
  /// Metres.
  pub radius: Option<u32>,
}

impl SearchParams {
  fn validate(&self, default_radius_m: u32) -> Result<(Point, u32), ApiError> {
    if !(-90.0..=90.0).contains(&self.lat) {
      return Err(ApiError::BadRequest(format!("invalid latitude: {}", self.lat)));
    }
    if !(-180.0..=180.0).contains(&self.lng) {
      return Err(ApiError::BadRequest(format!("invalid longitude: {}", self.lng)));
    }
    let radius = self.radius.unwrap_or(default_radius_m);
    if radius == 0 || radius > MAX_RADIUS_M {
      return Err(ApiError::BadRequest(format!(
        "invalid radius: {radius} (expected 1..={MAX_RADIUS_M})"
      )));
    }
    Ok((Point::new(self.lat, self.lng), radius))
  }
}

/// `GET /restaurants/search?lat=..&lng=..[&radius=..]`
///
/// Pulls fresh data for the area into the store, then answers from the
/// store. Fails with `502` only when the provider search itself fails.
pub async fn search<S, P>(
  State(state): State<AppState<S, P>>,
  ApiQuery(params): ApiQuery<SearchParams>,
) -> Result<Json<Vec<Ranked<Restaurant>>>, ApiError>
where
  S: RestaurantStore,
  P: PlacesSource,
{
  let (center, radius_m) = params.validate(state.default_radius_m)?;

  let cancel = state.shutdown.child_token();
  let report = state.reconciler.reconcile(center, radius_m, &cancel).await?;
  info!(
    lat = center.lat,
    lng = center.lng,
    radius_m,
    created = report.created,
    updated = report.updated,
    skipped = report.skipped,
    "search reconciled"
  );

  let results = nearby_search(state.store().as_ref(), center, radius_m)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(results))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// A restaurant together with its full menu.
#[derive(Debug, Serialize)]
pub struct RestaurantWithMenu {
  #[serde(flatten)]
  pub restaurant: Restaurant,
  pub menu_items: Vec<MenuItem>,
}

/// `GET /restaurants/{id}`
pub async fn get_one<S, P>(
  State(state): State<AppState<S, P>>,
  ApiPath(id): ApiPath<i64>,
) -> Result<Json<RestaurantWithMenu>, ApiError>
where
  S: RestaurantStore,
  P: PlacesSource,
{
  let store = state.store();
  let restaurant = store
    .get_restaurant(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("restaurant {id} not found")))?;
  let menu_items = store
    .list_menu_items(id, &MenuFilter::default())
    .await
    .map_err(ApiError::store)?;
  Ok(Json(RestaurantWithMenu { restaurant, menu_items }))
}

// ─── Menu ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct MenuParams {
  pub category:  Option<MenuCategory>,
  pub max_price: Option<f64>,
}

/// `GET /restaurants/{id}/menu[?category=..][&max_price=..]`
pub async fn menu<S, P>(
  State(state): State<AppState<S, P>>,
  ApiPath(id): ApiPath<i64>,
  ApiQuery(params): ApiQuery<MenuParams>,
) -> Result<Json<Vec<MenuItem>>, ApiError>
where
  S: RestaurantStore,
  P: PlacesSource,
{
  let store = state.store();
  if store.get_restaurant(id).await.map_err(ApiError::store)?.is_none() {
    return Err(ApiError::NotFound(format!("restaurant {id} not found")));
  }

  let filter = MenuFilter { category: params.category, max_price: params.max_price };
  let items = store
    .list_menu_items(id, &filter)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(items))
}
