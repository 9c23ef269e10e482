//! Async HTTP client for the Google Places web service.
//!
//! | Call | Endpoint |
//! |------|----------|
//! | [`PlacesSource::search_nearby`] | `GET {base_url}/nearbysearch/json` |
//! | [`PlacesSource::place_details`] | `GET {base_url}/details/json` |
//!
//! The provider answers most failures with HTTP 200 and a non-`OK` `status`
//! field, so both the transport status and the envelope status are checked.

use std::time::Duration;

use cheapeats_core::{
  geo::Point,
  places::{PlaceDetail, PlaceSummary, PlacesSource, UpstreamError},
};
use reqwest::Client;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::Result;

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";

/// Fields requested from the details endpoint.
const DETAIL_FIELDS: &str = "place_id,name,formatted_address,formatted_phone_number,website,\
   rating,price_level,types,geometry";

/// Connection settings for the places provider.
#[derive(Debug, Clone)]
pub struct PlacesConfig {
  pub api_key:  String,
  /// Endpoint root without a trailing slash, e.g. [`DEFAULT_BASE_URL`].
  pub base_url: String,
  pub timeout:  Duration,
}

impl PlacesConfig {
  pub fn new(api_key: impl Into<String>) -> Self {
    Self {
      api_key:  api_key.into(),
      base_url: DEFAULT_BASE_URL.to_owned(),
      timeout:  Duration::from_secs(30),
    }
  }
}

/// The envelope shared by both endpoints.
#[derive(Deserialize)]
struct Envelope {
  status:        String,
  #[serde(default)]
  error_message: Option<String>,
  #[serde(default)]
  results:       Vec<serde_json::Value>,
  #[serde(default)]
  result:        Option<serde_json::Value>,
}

/// Google Places implementation of [`PlacesSource`].
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct GooglePlacesClient {
  client: Client,
  config: PlacesConfig,
}

impl GooglePlacesClient {
  pub fn new(config: PlacesConfig) -> Result<Self> {
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  /// Issue a GET and decode the envelope, racing the request against
  /// `cancel`.
  async fn get(
    &self,
    path: &str,
    query: &[(&str, String)],
    cancel: &CancellationToken,
  ) -> Result<Envelope, UpstreamError> {
    tokio::select! {
      biased;
      _ = cancel.cancelled() => Err(UpstreamError::Cancelled),
      res = self.fetch(path, query) => res,
    }
  }

  async fn fetch(&self, path: &str, query: &[(&str, String)]) -> Result<Envelope, UpstreamError> {
    let mut params: Vec<(&str, &str)> = query.iter().map(|(k, v)| (*k, v.as_str())).collect();
    params.push(("key", self.config.api_key.as_str()));

    debug!(path, "places request");
    let resp = self
      .client
      .get(self.url(path))
      .query(&params)
      .send()
      .await
      .map_err(transport)?;

    let status = resp.status();
    if !status.is_success() {
      return Err(UpstreamError::Http(status.as_u16()));
    }

    let body = resp.text().await.map_err(transport)?;
    Ok(serde_json::from_str(&body)?)
  }
}

fn transport(e: reqwest::Error) -> UpstreamError {
  if e.is_timeout() {
    UpstreamError::Timeout
  } else {
    UpstreamError::Transport(Box::new(e))
  }
}

fn status_error(envelope: &Envelope, path: &str) -> UpstreamError {
  warn!(
    path,
    status = %envelope.status,
    message = envelope.error_message.as_deref().unwrap_or(""),
    "places provider rejected request"
  );
  UpstreamError::Status(envelope.status.clone())
}

impl PlacesSource for GooglePlacesClient {
  async fn search_nearby(
    &self,
    center: Point,
    radius_m: u32,
    cancel: &CancellationToken,
  ) -> Result<Vec<PlaceSummary>, UpstreamError> {
    let path = "/nearbysearch/json";
    let query = [
      ("location", format!("{:.6},{:.6}", center.lat, center.lng)),
      ("radius", radius_m.to_string()),
      ("type", "restaurant".to_owned()),
    ];

    let envelope = self.get(path, &query, cancel).await?;
    match envelope.status.as_str() {
      "OK" | "ZERO_RESULTS" => {}
      _ => return Err(status_error(&envelope, path)),
    }

    let places = envelope
      .results
      .into_iter()
      .enumerate()
      .filter_map(|(index, raw)| match PlaceSummary::from_raw(raw) {
        Ok(place) => Some(place),
        Err(e) => {
          warn!(index, error = %e, "dropping malformed search result");
          None
        }
      })
      .collect();
    Ok(places)
  }

  async fn place_details(
    &self,
    place_id: &str,
    cancel: &CancellationToken,
  ) -> Result<PlaceDetail, UpstreamError> {
    let path = "/details/json";
    let query = [
      ("place_id", place_id.to_owned()),
      ("fields", DETAIL_FIELDS.to_owned()),
    ];

    let envelope = self.get(path, &query, cancel).await?;
    if envelope.status != "OK" {
      return Err(status_error(&envelope, path));
    }

    PlaceDetail::from_raw(envelope.result.unwrap_or(serde_json::Value::Null))
  }
}
