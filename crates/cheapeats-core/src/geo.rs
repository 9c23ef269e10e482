//! Great-circle distance and radius ranking.
//!
//! Distances use the spherical law of cosines on a sphere of radius
//! [`EARTH_RADIUS_KM`]. Everything here is pure; storage access lives in the
//! engine's `nearby_search`.

use serde::{Deserialize, Serialize};

use crate::restaurant::Restaurant;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Length of one degree of latitude on the same sphere.
pub const KM_PER_DEGREE_LAT: f64 = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
  pub lat: f64,
  pub lng: f64,
}

impl Point {
  pub fn new(lat: f64, lng: f64) -> Self { Self { lat, lng } }
}

impl Restaurant {
  pub fn point(&self) -> Point { Point::new(self.latitude, self.longitude) }
}

/// Great-circle distance between `a` and `b` in kilometres.
///
/// The `acos` argument is clamped into `[-1, 1]`: rounding can push it just
/// past `1.0` for identical or near-identical points.
pub fn distance_km(a: Point, b: Point) -> f64 {
  if a == b {
    return 0.0;
  }

  let (lat1, lng1) = (a.lat.to_radians(), a.lng.to_radians());
  let (lat2, lng2) = (b.lat.to_radians(), b.lng.to_radians());

  let cos_angle =
    lat1.cos() * lat2.cos() * (lng2 - lng1).cos() + lat1.sin() * lat2.sin();

  EARTH_RADIUS_KM * cos_angle.clamp(-1.0, 1.0).acos()
}

/// Latitude bounds (degrees) that contain every point within `radius_km` of
/// `center`. Used as a cheap prefilter before exact distance checks.
pub fn latitude_band(center: Point, radius_km: f64) -> (f64, f64) {
  let delta = radius_km / KM_PER_DEGREE_LAT;
  ((center.lat - delta).max(-90.0), (center.lat + delta).min(90.0))
}

/// A value paired with its distance from a query centre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranked<T> {
  #[serde(flatten)]
  pub item:        T,
  pub distance_km: f64,
}

/// Keep the restaurants within `radius_m` metres of `center`, nearest first.
/// Ties keep their input order.
pub fn rank_within(
  center: Point,
  radius_m: f64,
  restaurants: impl IntoIterator<Item = Restaurant>,
) -> Vec<Ranked<Restaurant>> {
  let radius_km = radius_m / 1000.0;

  let mut ranked: Vec<Ranked<Restaurant>> = restaurants
    .into_iter()
    .map(|r| {
      let distance_km = distance_km(center, r.point());
      Ranked { item: r, distance_km }
    })
    .filter(|r| r.distance_km <= radius_km)
    .collect();

  ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
  ranked
}
