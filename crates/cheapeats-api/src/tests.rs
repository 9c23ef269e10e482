//! Router tests: in-memory store, scripted places source, `oneshot` requests.

use std::{
  sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
  },
  time::Duration,
};

use axum::{
  body::Body,
  http::{Request, StatusCode},
  response::Response,
};
use cheapeats_core::{
  geo::Point,
  menu::{MenuCategory, NewMenuItem},
  places::{PlaceDetail, PlaceSummary, PlacesSource, UpstreamError},
  restaurant::{AddressParts, PriceRange, Restaurant, RestaurantDraft},
  store::RestaurantStore,
};
use cheapeats_engine::{Jitter, Reconciler, ReconcilerConfig};
use cheapeats_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt as _;

use crate::{AppState, api_router};

// ─── Fixtures ────────────────────────────────────────────────────────────────

struct NoJitter;

impl Jitter for NoJitter {
  fn sample(&self, _upper: f64) -> f64 { 0.0 }
}

#[derive(Default)]
struct FakePlaces {
  results:      Vec<PlaceSummary>,
  fail:         bool,
  search_calls: AtomicUsize,
}

impl PlacesSource for FakePlaces {
  async fn search_nearby(
    &self,
    _center: Point,
    _radius_m: u32,
    _cancel: &CancellationToken,
  ) -> Result<Vec<PlaceSummary>, UpstreamError> {
    self.search_calls.fetch_add(1, Ordering::SeqCst);
    if self.fail {
      return Err(UpstreamError::Http(503));
    }
    Ok(self.results.clone())
  }

  async fn place_details(
    &self,
    place_id: &str,
    _cancel: &CancellationToken,
  ) -> Result<PlaceDetail, UpstreamError> {
    PlaceDetail::from_raw(json!({
      "place_id": place_id,
      "formatted_phone_number": "(217) 555-0100",
    }))
  }
}

fn place(id: &str, lat: f64, lng: f64) -> PlaceSummary {
  PlaceSummary::from_raw(json!({
    "place_id": id,
    "name": format!("Place {id}"),
    "formatted_address": "1 Elm St, Springfield, IL 62701, USA",
    "geometry": { "location": { "lat": lat, "lng": lng } },
    "rating": 4.2,
    "price_level": 1,
    "types": ["cafe", "restaurant"],
  }))
  .unwrap()
}

fn draft(external_id: &str, city: &str, cuisine: &str, price_range: PriceRange) -> RestaurantDraft {
  RestaurantDraft {
    external_id:  external_id.into(),
    name:         format!("Diner {external_id}"),
    address:      format!("1 Main St, {city}, IL 62701, USA"),
    parts:        AddressParts { city: Some(city.into()), ..Default::default() },
    latitude:     39.78,
    longitude:    -89.65,
    cuisine_type: cuisine.into(),
    phone:        None,
    website:      None,
    rating:       4.0,
    price_range,
  }
}

struct Harness {
  store:  Arc<SqliteStore>,
  places: Arc<FakePlaces>,
  state:  AppState<SqliteStore, FakePlaces>,
}

async fn harness(places: FakePlaces) -> Harness {
  let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
  let places = Arc::new(places);
  let config = ReconcilerConfig { throttle: Duration::ZERO, ..Default::default() };
  let reconciler =
    Reconciler::new(Arc::clone(&store), Arc::clone(&places), config).with_jitter(NoJitter);
  let state = AppState::new(reconciler, CancellationToken::new());
  Harness { store, places, state }
}

async fn get(state: &AppState<SqliteStore, FakePlaces>, uri: &str) -> Response {
  let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
  api_router(state.clone()).oneshot(req).await.unwrap()
}

async fn body_json(resp: Response) -> Value {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

async fn seed_menu(store: &SqliteStore, restaurant: &Restaurant) {
  for (name, category, price) in [
    ("Soup", MenuCategory::Appetizers, 6.0),
    ("Steak", MenuCategory::MainCourse, 28.0),
    ("Pasta", MenuCategory::MainCourse, 14.5),
  ] {
    let item = store
      .create_menu_item(NewMenuItem {
        restaurant_id: restaurant.id,
        name: name.into(),
        description: String::new(),
        category,
        price,
        currency: "USD".into(),
        is_available: true,
      })
      .await
      .unwrap();
    store.append_price_history(item.id, price).await.unwrap();
  }
}

// ─── Health ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_healthy() {
  let h = harness(FakePlaces::default()).await;
  let resp = get(&h.state, "/health").await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(body_json(resp).await, json!({ "status": "healthy" }));
}

// ─── Restaurants ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_applies_filters() {
  let h = harness(FakePlaces::default()).await;
  h.store.create_restaurant(draft("a", "Springfield", "Thai", PriceRange::Inexpensive)).await.unwrap();
  h.store.create_restaurant(draft("b", "Springfield", "Pizza", PriceRange::Moderate)).await.unwrap();
  h.store.create_restaurant(draft("c", "Chicago", "Thai", PriceRange::Moderate)).await.unwrap();

  let all = body_json(get(&h.state, "/restaurants").await).await;
  assert_eq!(all.as_array().unwrap().len(), 3);

  let thai = body_json(get(&h.state, "/restaurants?city=Springfield&cuisine=Thai").await).await;
  assert_eq!(thai.as_array().unwrap().len(), 1);
  assert_eq!(thai[0]["external_id"], "a");

  let moderate = body_json(get(&h.state, "/restaurants?price_range=%24%24").await).await;
  let ids: Vec<&str> = moderate
    .as_array()
    .unwrap()
    .iter()
    .map(|r| r["external_id"].as_str().unwrap())
    .collect();
  assert_eq!(ids.len(), 2);
  assert!(ids.contains(&"b") && ids.contains(&"c"));
}

#[tokio::test]
async fn list_rejects_unknown_price_range() {
  let h = harness(FakePlaces::default()).await;
  let resp = get(&h.state, "/restaurants?price_range=cheap").await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert!(body_json(resp).await["error"].is_string());
}

#[tokio::test]
async fn get_one_includes_menu_items() {
  let h = harness(FakePlaces::default()).await;
  let r = h.store.create_restaurant(draft("a", "Springfield", "Thai", PriceRange::Free)).await.unwrap();
  seed_menu(&h.store, &r).await;

  let resp = get(&h.state, &format!("/restaurants/{}", r.id)).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_json(resp).await;
  assert_eq!(body["id"], r.id);
  assert_eq!(body["price_range"], "Free");
  assert_eq!(body["menu_items"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn get_one_missing_is_404() {
  let h = harness(FakePlaces::default()).await;
  let resp = get(&h.state, "/restaurants/42").await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  assert_eq!(body_json(resp).await["error"], "restaurant 42 not found");
}

#[tokio::test]
async fn non_numeric_id_is_400() {
  let h = harness(FakePlaces::default()).await;
  let resp = get(&h.state, "/restaurants/abc").await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn menu_filters_by_category_and_price() {
  let h = harness(FakePlaces::default()).await;
  let r = h.store.create_restaurant(draft("a", "Springfield", "Thai", PriceRange::Free)).await.unwrap();
  seed_menu(&h.store, &r).await;

  let mains = body_json(get(&h.state, &format!("/restaurants/{}/menu?category=Main%20Course", r.id)).await).await;
  assert_eq!(mains.as_array().unwrap().len(), 2);

  let cheap_mains = body_json(
    get(&h.state, &format!("/restaurants/{}/menu?category=Main%20Course&max_price=20", r.id)).await,
  )
  .await;
  assert_eq!(cheap_mains.as_array().unwrap().len(), 1);
  assert_eq!(cheap_mains[0]["name"], "Pasta");

  let missing = get(&h.state, "/restaurants/999/menu").await;
  assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

// ─── Search ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn search_reconciles_then_ranks() {
  let h = harness(FakePlaces {
    results: vec![place("far", 39.7900, -89.6501), place("near", 39.7820, -89.6501)],
    ..Default::default()
  })
  .await;

  let resp = get(&h.state, "/restaurants/search?lat=39.7817&lng=-89.6501&radius=2000").await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_json(resp).await;
  let results = body.as_array().unwrap();
  assert_eq!(results.len(), 2);
  assert_eq!(results[0]["external_id"], "near");
  assert_eq!(results[1]["external_id"], "far");
  assert!(results[0]["distance_km"].as_f64().unwrap() < results[1]["distance_km"].as_f64().unwrap());
  assert_eq!(results[0]["cuisine_type"], "Cafe");
  assert_eq!(results[0]["phone"], "(217) 555-0100");

  assert_eq!(h.places.search_calls.load(Ordering::SeqCst), 1);
  let stored = h.store.find_restaurant_by_external_id("near").await.unwrap().unwrap();
  let menu = get(&h.state, &format!("/restaurants/{}/menu", stored.id)).await;
  assert_eq!(body_json(menu).await.as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn search_excludes_results_outside_radius() {
  let h = harness(FakePlaces {
    results: vec![place("near", 39.7820, -89.6501), place("chicago", 41.8781, -87.6298)],
    ..Default::default()
  })
  .await;

  let body = body_json(get(&h.state, "/restaurants/search?lat=39.7817&lng=-89.6501").await).await;
  let results = body.as_array().unwrap();
  assert_eq!(results.len(), 1);
  assert_eq!(results[0]["external_id"], "near");
  assert!(h.store.find_restaurant_by_external_id("chicago").await.unwrap().is_some());
}

#[tokio::test]
async fn search_requires_coordinates() {
  let h = harness(FakePlaces::default()).await;
  for uri in [
    "/restaurants/search",
    "/restaurants/search?lat=39.78",
    "/restaurants/search?lat=abc&lng=-89.65",
    "/restaurants/search?lat=95&lng=-89.65",
    "/restaurants/search?lat=39.78&lng=-189",
    "/restaurants/search?lat=39.78&lng=-89.65&radius=-5",
    "/restaurants/search?lat=39.78&lng=-89.65&radius=0",
    "/restaurants/search?lat=39.78&lng=-89.65&radius=60000",
  ] {
    let resp = get(&h.state, uri).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
    assert!(body_json(resp).await["error"].is_string(), "{uri}");
  }
  assert_eq!(h.places.search_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn search_upstream_failure_is_502() {
  let h = harness(FakePlaces { fail: true, ..Default::default() }).await;
  let resp = get(&h.state, "/restaurants/search?lat=39.78&lng=-89.65").await;
  assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
  assert!(body_json(resp).await["error"].as_str().unwrap().contains("503"));
}

// ─── Menu items ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn menu_item_includes_history_newest_first() {
  let h = harness(FakePlaces::default()).await;
  let r = h.store.create_restaurant(draft("a", "Springfield", "Thai", PriceRange::Free)).await.unwrap();
  seed_menu(&h.store, &r).await;
  let soup = h.store.find_menu_item(r.id, "Soup").await.unwrap().unwrap();
  h.store.append_price_history(soup.id, 6.5).await.unwrap();
  h.store.update_menu_item_price(soup.id, 6.5).await.unwrap();

  let body = body_json(get(&h.state, &format!("/menu-items/{}", soup.id)).await).await;
  assert_eq!(body["name"], "Soup");
  assert_eq!(body["price"], 6.5);
  let prices: Vec<f64> = body["price_history"]
    .as_array()
    .unwrap()
    .iter()
    .map(|row| row["price"].as_f64().unwrap())
    .collect();
  assert_eq!(prices, vec![6.5, 6.0]);

  let history = body_json(get(&h.state, &format!("/menu-items/{}/price-history", soup.id)).await).await;
  assert_eq!(history, body["price_history"]);
}

#[tokio::test]
async fn missing_menu_item_is_404() {
  let h = harness(FakePlaces::default()).await;
  assert_eq!(get(&h.state, "/menu-items/7").await.status(), StatusCode::NOT_FOUND);
  assert_eq!(get(&h.state, "/menu-items/7/price-history").await.status(), StatusCode::NOT_FOUND);
}
