//! Menu items and their append-only price history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// The fixed set of sections a menu item can be filed under.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
pub enum MenuCategory {
  Appetizers,
  #[serde(rename = "Main Course")]
  #[strum(serialize = "Main Course")]
  MainCourse,
  Desserts,
  Beverages,
}

impl MenuCategory {
  pub fn as_str(self) -> &'static str { self.into() }
}

/// A stored menu item. `(restaurant_id, name)` is the lookup key used when a
/// menu is refreshed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
  pub id:            i64,
  pub restaurant_id: i64,
  pub name:          String,
  pub description:   String,
  pub category:      MenuCategory,
  pub price:         f64,
  pub currency:      String,
  pub is_available:  bool,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

/// Input to [`crate::store::RestaurantStore::create_menu_item`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewMenuItem {
  pub restaurant_id: i64,
  pub name:          String,
  pub description:   String,
  pub category:      MenuCategory,
  pub price:         f64,
  pub currency:      String,
  pub is_available:  bool,
}

/// One price point for a menu item. Rows are never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
  pub id:           i64,
  pub menu_item_id: i64,
  pub price:        f64,
  pub recorded_at:  DateTime<Utc>,
}
