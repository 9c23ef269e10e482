//! The contract for an upstream places provider.
//!
//! The core only needs a handful of typed fields from each payload; the full
//! provider document is carried along untouched as a [`serde_json::Value`] so
//! it can be written to the provenance log.

use std::future::Future;

use serde::Deserialize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::geo::Point;

// ─── Errors ──────────────────────────────────────────────────────────────────

/// A failed call to the places provider.
#[derive(Debug, Error)]
pub enum UpstreamError {
  #[error("transport error: {0}")]
  Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("request timed out")]
  Timeout,

  #[error("provider returned HTTP {0}")]
  Http(u16),

  #[error("provider returned status {0:?}")]
  Status(String),

  #[error("malformed provider response: {0}")]
  Decode(#[from] serde_json::Error),

  #[error("request cancelled")]
  Cancelled,
}

// ─── Payloads ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawLocation {
  lat: f64,
  lng: f64,
}

#[derive(Deserialize)]
struct RawGeometry {
  location: RawLocation,
}

/// The fields of a search result the core reads.
#[derive(Deserialize)]
struct RawSummary {
  place_id:          String,
  name:              String,
  #[serde(default)]
  formatted_address: String,
  geometry:          RawGeometry,
  #[serde(default)]
  rating:            Option<f32>,
  #[serde(default)]
  price_level:       Option<i64>,
  #[serde(default)]
  types:             Vec<String>,
}

/// One result from a nearby search.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceSummary {
  /// The provider's stable identifier for this place.
  pub place_id:          String,
  pub name:              String,
  pub formatted_address: String,
  pub location:          Point,
  pub rating:            Option<f32>,
  /// `0..=4` when the provider knows it.
  pub price_level:       Option<i64>,
  pub types:             Vec<String>,
  /// The untouched result document.
  pub raw:               serde_json::Value,
}

impl PlaceSummary {
  /// Pull the typed fields out of a raw search result.
  pub fn from_raw(raw: serde_json::Value) -> Result<Self, UpstreamError> {
    let parsed = RawSummary::deserialize(&raw)?;
    Ok(Self {
      place_id:          parsed.place_id,
      name:              parsed.name,
      formatted_address: parsed.formatted_address,
      location:          Point::new(
        parsed.geometry.location.lat,
        parsed.geometry.location.lng,
      ),
      rating:            parsed.rating,
      price_level:       parsed.price_level,
      types:             parsed.types,
      raw,
    })
  }
}

#[derive(Deserialize)]
struct RawDetail {
  #[serde(default)]
  formatted_phone_number: Option<String>,
  #[serde(default)]
  website:                Option<String>,
}

/// Contact details for a single place.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceDetail {
  pub phone:   Option<String>,
  pub website: Option<String>,
  pub raw:     serde_json::Value,
}

impl PlaceDetail {
  pub fn from_raw(raw: serde_json::Value) -> Result<Self, UpstreamError> {
    let parsed = RawDetail::deserialize(&raw)?;
    Ok(Self {
      phone:   parsed.formatted_phone_number,
      website: parsed.website,
      raw,
    })
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a places provider.
///
/// Implementations must bound each request with a timeout and return
/// [`UpstreamError::Cancelled`] promptly once `cancel` fires.
pub trait PlacesSource: Send + Sync {
  /// Restaurants within `radius_m` metres of `center`. A provider-reported
  /// "zero results" is an empty success.
  fn search_nearby<'a>(
    &'a self,
    center: Point,
    radius_m: u32,
    cancel: &'a CancellationToken,
  ) -> impl Future<Output = Result<Vec<PlaceSummary>, UpstreamError>> + Send + 'a;

  /// Contact details for the place with the given external id.
  fn place_details<'a>(
    &'a self,
    place_id: &'a str,
    cancel: &'a CancellationToken,
  ) -> impl Future<Output = Result<PlaceDetail, UpstreamError>> + Send + 'a;
}
