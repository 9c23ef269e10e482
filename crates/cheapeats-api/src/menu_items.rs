//! Handlers for `/menu-items` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/menu-items/{id}` | Includes `price_history`; 404 if not found |
//! | `GET`  | `/menu-items/{id}/price-history` | Newest first |

use axum::{Json, extract::State};
use cheapeats_core::{
  menu::{MenuItem, PriceHistory},
  places::PlacesSource,
  store::RestaurantStore,
};
use serde::Serialize;

use crate::{AppState, error::ApiError, extract::ApiPath};

#[derive(Debug, Serialize)]
pub struct MenuItemWithHistory {
  #[serde(flatten)]
  pub item:          MenuItem,
  pub price_history: Vec<PriceHistory>,
}

async fn require_item<S: RestaurantStore>(store: &S, id: i64) -> Result<MenuItem, ApiError> {
  store
    .get_menu_item(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("menu item {id} not found")))
}

/// `GET /menu-items/{id}`
pub async fn get_one<S, P>(
  State(state): State<AppState<S, P>>,
  ApiPath(id): ApiPath<i64>,
) -> Result<Json<MenuItemWithHistory>, ApiError>
where
  S: RestaurantStore,
  P: PlacesSource,
{
  let store = state.store().as_ref();
  let item = require_item(store, id).await?;
  let price_history = store.price_history(id).await.map_err(ApiError::store)?;
  Ok(Json(MenuItemWithHistory { item, price_history }))
}

/// `GET /menu-items/{id}/price-history`
pub async fn history<S, P>(
  State(state): State<AppState<S, P>>,
  ApiPath(id): ApiPath<i64>,
) -> Result<Json<Vec<PriceHistory>>, ApiError>
where
  S: RestaurantStore,
  P: PlacesSource,
{
  let store = state.store().as_ref();
  require_item(store, id).await?;
  let history = store.price_history(id).await.map_err(ApiError::store)?;
  Ok(Json(history))
}
