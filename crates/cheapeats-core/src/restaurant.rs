//! Restaurant records and the draft projection built from upstream places.
//!
//! A [`Restaurant`] is the stored row. A [`RestaurantDraft`] carries only the
//! fields that a fetch cycle is allowed to (re)write; identity and creation
//! timestamps are owned by the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

// ─── Price range ─────────────────────────────────────────────────────────────

/// Provider price bracket, rendered the way diners expect to read it.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
pub enum PriceRange {
  #[serde(rename = "Free")]
  #[strum(serialize = "Free")]
  Free,
  #[serde(rename = "$")]
  #[strum(serialize = "$")]
  Inexpensive,
  #[serde(rename = "$$")]
  #[strum(serialize = "$$")]
  Moderate,
  #[serde(rename = "$$$")]
  #[strum(serialize = "$$$")]
  Expensive,
  #[serde(rename = "$$$$")]
  #[strum(serialize = "$$$$")]
  VeryExpensive,
  /// The provider gave no level, or one outside `0..=4`.
  #[default]
  #[serde(rename = "N/A")]
  #[strum(serialize = "N/A")]
  NotAvailable,
}

impl PriceRange {
  /// The label stored in the `price_range` column.
  pub fn as_str(self) -> &'static str { self.into() }
}

// ─── Address ─────────────────────────────────────────────────────────────────

/// Components parsed out of a provider's single-line formatted address.
/// Any component may be missing; parsing never fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressParts {
  pub street:   Option<String>,
  pub city:     Option<String>,
  pub state:    Option<String>,
  pub zip_code: Option<String>,
  pub country:  Option<String>,
}

// ─── Restaurant ──────────────────────────────────────────────────────────────

/// A stored restaurant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
  pub id:           i64,
  /// Stable identifier assigned by the places provider; unique in the store.
  pub external_id:  String,
  pub name:         String,
  /// The full formatted address as returned by the provider.
  pub address:      String,
  pub street:       Option<String>,
  pub city:         Option<String>,
  pub state:        Option<String>,
  pub zip_code:     Option<String>,
  pub country:      Option<String>,
  pub latitude:     f64,
  pub longitude:    f64,
  pub cuisine_type: String,
  pub phone:        Option<String>,
  pub website:      Option<String>,
  pub rating:       f32,
  pub price_range:  PriceRange,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
}

impl Restaurant {
  /// Overwrite every mutable field with the draft's values.
  ///
  /// `id`, `external_id` and `created_at` are left alone. Phone and website
  /// are only replaced when the draft actually knows them.
  pub fn apply(&mut self, draft: &RestaurantDraft) {
    self.name = draft.name.clone();
    self.address = draft.address.clone();
    self.street = draft.parts.street.clone();
    self.city = draft.parts.city.clone();
    self.state = draft.parts.state.clone();
    self.zip_code = draft.parts.zip_code.clone();
    self.country = draft.parts.country.clone();
    self.latitude = draft.latitude;
    self.longitude = draft.longitude;
    self.cuisine_type = draft.cuisine_type.clone();
    self.rating = draft.rating;
    self.price_range = draft.price_range;
    if draft.phone.is_some() {
      self.phone = draft.phone.clone();
    }
    if draft.website.is_some() {
      self.website = draft.website.clone();
    }
  }

  /// Record contact details from a place-details lookup. Empty strings never
  /// replace a known value.
  pub fn enrich(&mut self, phone: Option<&str>, website: Option<&str>) {
    if let Some(phone) = phone.filter(|p| !p.is_empty()) {
      self.phone = Some(phone.to_owned());
    }
    if let Some(website) = website.filter(|w| !w.is_empty()) {
      self.website = Some(website.to_owned());
    }
  }
}

// ─── RestaurantDraft ─────────────────────────────────────────────────────────

/// Input to [`crate::store::RestaurantStore::create_restaurant`] and the
/// source of in-place updates via [`Restaurant::apply`].
#[derive(Debug, Clone, PartialEq)]
pub struct RestaurantDraft {
  pub external_id:  String,
  pub name:         String,
  pub address:      String,
  pub parts:        AddressParts,
  pub latitude:     f64,
  pub longitude:    f64,
  pub cuisine_type: String,
  pub phone:        Option<String>,
  pub website:      Option<String>,
  pub rating:       f32,
  pub price_range:  PriceRange,
}

#[cfg(test)]
mod tests {
  use std::str::FromStr as _;

  use chrono::TimeZone as _;

  use super::*;

  fn stored() -> Restaurant {
    let at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    Restaurant {
      id:           7,
      external_id:  "place-7".into(),
      name:         "Old Name".into(),
      address:      "1 Old Rd, Springfield, IL 62704, USA".into(),
      street:       Some("1 Old Rd".into()),
      city:         Some("Springfield".into()),
      state:        Some("IL".into()),
      zip_code:     Some("62704".into()),
      country:      Some("USA".into()),
      latitude:     39.78,
      longitude:    -89.65,
      cuisine_type: "Other".into(),
      phone:        Some("(217) 555-0100".into()),
      website:      None,
      rating:       3.5,
      price_range:  PriceRange::Inexpensive,
      created_at:   at,
      updated_at:   at,
    }
  }

  fn draft() -> RestaurantDraft {
    RestaurantDraft {
      external_id:  "place-7".into(),
      name:         "New Name".into(),
      address:      "Nowhere".into(),
      parts:        AddressParts::default(),
      latitude:     40.0,
      longitude:    -90.0,
      cuisine_type: "Pizza".into(),
      phone:        None,
      website:      None,
      rating:       4.5,
      price_range:  PriceRange::Moderate,
    }
  }

  #[test]
  fn apply_keeps_identity_and_creation_time() {
    let mut r = stored();
    let before = r.clone();
    r.apply(&draft());

    assert_eq!(r.id, before.id);
    assert_eq!(r.external_id, before.external_id);
    assert_eq!(r.created_at, before.created_at);
    assert_eq!(r.name, "New Name");
    assert_eq!(r.city, None);
    assert_eq!(r.price_range, PriceRange::Moderate);
    // Unknown contact details in the draft don't erase stored ones.
    assert_eq!(r.phone.as_deref(), Some("(217) 555-0100"));
  }

  #[test]
  fn enrich_ignores_empty_values() {
    let mut r = stored();
    r.enrich(Some(""), Some("https://example.com"));
    assert_eq!(r.phone.as_deref(), Some("(217) 555-0100"));
    assert_eq!(r.website.as_deref(), Some("https://example.com"));

    r.enrich(Some("(217) 555-0199"), None);
    assert_eq!(r.phone.as_deref(), Some("(217) 555-0199"));
    assert_eq!(r.website.as_deref(), Some("https://example.com"));
  }

  #[test]
  fn price_range_labels() {
    assert_eq!(PriceRange::Moderate.as_str(), "$$");
    assert_eq!(PriceRange::NotAvailable.to_string(), "N/A");
    assert_eq!(PriceRange::from_str("$$$$").unwrap(), PriceRange::VeryExpensive);
    assert!(PriceRange::from_str("cheap").is_err());
    assert_eq!(
      serde_json::to_string(&PriceRange::Free).unwrap(),
      "\"Free\""
    );
  }
}
