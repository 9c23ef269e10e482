//! Radius search over the restaurant store.

use cheapeats_core::{
  geo::{Point, Ranked, latitude_band, rank_within},
  restaurant::Restaurant,
  store::RestaurantStore,
};

/// Every stored restaurant within `radius_m` metres of `center`, nearest
/// first. Read-only; reflects whatever the store holds right now.
pub async fn nearby_search<S: RestaurantStore>(
  store: &S,
  center: Point,
  radius_m: u32,
) -> Result<Vec<Ranked<Restaurant>>, S::Error> {
  let radius_m = f64::from(radius_m);
  let (min_lat, max_lat) = latitude_band(center, radius_m / 1000.0);
  let candidates = store.restaurants_in_latitude_band(min_lat, max_lat).await?;
  Ok(rank_within(center, radius_m, candidates))
}
