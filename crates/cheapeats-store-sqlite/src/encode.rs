//! Encoding and decoding helpers between domain types and the plain values
//! stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings truncated to a fixed microsecond width so
//! that lexical order matches chronological order. Enums are stored as their
//! display labels. Raw provider documents are stored as compact JSON.

use std::str::FromStr as _;

use chrono::{DateTime, SecondsFormat, SubsecRound as _, Utc};
use cheapeats_core::{
  menu::{MenuCategory, MenuItem, PriceHistory},
  provenance::ScrapedRecord,
  restaurant::{PriceRange, Restaurant},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

/// The current time at the precision the store keeps.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Enums ───────────────────────────────────────────────────────────────────

pub fn decode_price_range(s: &str) -> Result<PriceRange> {
  PriceRange::from_str(s)
    .map_err(|_| cheapeats_core::Error::UnknownPriceRange(s.to_owned()).into())
}

pub fn decode_category(s: &str) -> Result<MenuCategory> {
  MenuCategory::from_str(s)
    .map_err(|_| cheapeats_core::Error::UnknownMenuCategory(s.to_owned()).into())
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const RESTAURANT_COLUMNS: &str = "id, external_id, name, address, street, city, state, \
   zip_code, country, latitude, longitude, cuisine_type, phone, website, rating, \
   price_range, created_at, updated_at";

/// Raw values read directly from a `restaurants` row.
pub struct RawRestaurant {
  pub id:           i64,
  pub external_id:  String,
  pub name:         String,
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
  pub rating:       f64,
  pub price_range:  String,
  pub created_at:   String,
  pub updated_at:   String,
}

impl RawRestaurant {
  /// Read a row selected with [`RESTAURANT_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(0)?,
      external_id:  row.get(1)?,
      name:         row.get(2)?,
      address:      row.get(3)?,
      street:       row.get(4)?,
      city:         row.get(5)?,
      state:        row.get(6)?,
      zip_code:     row.get(7)?,
      country:      row.get(8)?,
      latitude:     row.get(9)?,
      longitude:    row.get(10)?,
      cuisine_type: row.get(11)?,
      phone:        row.get(12)?,
      website:      row.get(13)?,
      rating:       row.get(14)?,
      price_range:  row.get(15)?,
      created_at:   row.get(16)?,
      updated_at:   row.get(17)?,
    })
  }

  pub fn into_restaurant(self) -> Result<Restaurant> {
    Ok(Restaurant {
      id:           self.id,
      external_id:  self.external_id,
      name:         self.name,
      address:      self.address,
      street:       self.street,
      city:         self.city,
      state:        self.state,
      zip_code:     self.zip_code,
      country:      self.country,
      latitude:     self.latitude,
      longitude:    self.longitude,
      cuisine_type: self.cuisine_type,
      phone:        self.phone,
      website:      self.website,
      rating:       self.rating as f32,
      price_range:  decode_price_range(&self.price_range)?,
      created_at:   decode_dt(&self.created_at)?,
      updated_at:   decode_dt(&self.updated_at)?,
    })
  }
}

pub const MENU_ITEM_COLUMNS: &str = "id, restaurant_id, name, description, category, price, \
   currency, is_available, created_at, updated_at";

/// Raw values read directly from a `menu_items` row.
pub struct RawMenuItem {
  pub id:            i64,
  pub restaurant_id: i64,
  pub name:          String,
  pub description:   String,
  pub category:      String,
  pub price:         f64,
  pub currency:      String,
  pub is_available:  bool,
  pub created_at:    String,
  pub updated_at:    String,
}

impl RawMenuItem {
  /// Read a row selected with [`MENU_ITEM_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      restaurant_id: row.get(1)?,
      name:          row.get(2)?,
      description:   row.get(3)?,
      category:      row.get(4)?,
      price:         row.get(5)?,
      currency:      row.get(6)?,
      is_available:  row.get(7)?,
      created_at:    row.get(8)?,
      updated_at:    row.get(9)?,
    })
  }

  pub fn into_menu_item(self) -> Result<MenuItem> {
    Ok(MenuItem {
      id:            self.id,
      restaurant_id: self.restaurant_id,
      name:          self.name,
      description:   self.description,
      category:      decode_category(&self.category)?,
      price:         self.price,
      currency:      self.currency,
      is_available:  self.is_available,
      created_at:    decode_dt(&self.created_at)?,
      updated_at:    decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read directly from a `price_history` row.
pub struct RawPriceHistory {
  pub id:           i64,
  pub menu_item_id: i64,
  pub price:        f64,
  pub recorded_at:  String,
}

impl RawPriceHistory {
  pub fn into_price_history(self) -> Result<PriceHistory> {
    Ok(PriceHistory {
      id:           self.id,
      menu_item_id: self.menu_item_id,
      price:        self.price,
      recorded_at:  decode_dt(&self.recorded_at)?,
    })
  }
}

/// Raw values read directly from a `scraped_data` row.
pub struct RawScrapedRecord {
  pub id:            i64,
  pub source:        String,
  pub restaurant_id: Option<i64>,
  pub raw_data:      String,
  pub scraped_at:    String,
}

impl RawScrapedRecord {
  pub fn into_scraped_record(self) -> Result<ScrapedRecord> {
    Ok(ScrapedRecord {
      id:            self.id,
      source:        self.source,
      restaurant_id: self.restaurant_id,
      raw_data:      serde_json::from_str(&self.raw_data)?,
      scraped_at:    decode_dt(&self.scraped_at)?,
    })
  }
}
