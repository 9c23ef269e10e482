//! Provenance records: the raw upstream payloads behind each fetch cycle.
//!
//! These rows are an audit trail only. Nothing on the read path queries them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Source name recorded for payloads fetched from Google Places.
pub const GOOGLE_PLACES_SOURCE: &str = "google_places";

/// A stored provenance record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapedRecord {
  pub id:            i64,
  pub source:        String,
  pub restaurant_id: Option<i64>,
  /// Opaque document; the store does not interpret it.
  pub raw_data:      serde_json::Value,
  pub scraped_at:    DateTime<Utc>,
}

/// Input to [`crate::store::RestaurantStore::append_scraped_record`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewScrapedRecord {
  pub source:        String,
  pub restaurant_id: Option<i64>,
  pub raw_data:      serde_json::Value,
}
