//! Deterministic mappings from provider fields onto restaurant attributes.

use crate::restaurant::{AddressParts, PriceRange};

/// Provider category tags in priority order. The first entry whose tag is
/// present on a place decides its cuisine, so reordering changes results.
pub const CUISINES: &[(&str, &str)] = &[
  ("chinese_restaurant", "Chinese"),
  ("italian_restaurant", "Italian"),
  ("mexican_restaurant", "Mexican"),
  ("japanese_restaurant", "Japanese"),
  ("indian_restaurant", "Indian"),
  ("thai_restaurant", "Thai"),
  ("french_restaurant", "French"),
  ("pizza", "Pizza"),
  ("burger", "Burger"),
  ("seafood", "Seafood"),
  ("vegetarian", "Vegetarian"),
  ("cafe", "Cafe"),
  ("bakery", "Bakery"),
  ("bar", "Bar"),
];

pub const GENERAL_CUISINE: &str = "General";
pub const OTHER_CUISINE: &str = "Other";

/// Map a provider price level onto a [`PriceRange`].
///
/// An absent level is `N/A`, not `Free`: only an explicit `0` means free.
pub fn price_range(level: Option<i64>) -> PriceRange {
  match level {
    Some(0) => PriceRange::Free,
    Some(1) => PriceRange::Inexpensive,
    Some(2) => PriceRange::Moderate,
    Some(3) => PriceRange::Expensive,
    Some(4) => PriceRange::VeryExpensive,
    _ => PriceRange::NotAvailable,
  }
}

/// Pick a single cuisine label for a place's category tags.
pub fn cuisine<S: AsRef<str>>(types: &[S]) -> &'static str {
  let has = |tag: &str| types.iter().any(|t| t.as_ref() == tag);

  CUISINES
    .iter()
    .find(|(tag, _)| has(tag))
    .map(|(_, label)| *label)
    .unwrap_or_else(|| {
      if has("restaurant") { GENERAL_CUISINE } else { OTHER_CUISINE }
    })
}

/// Split a single-line formatted address into components.
///
/// The last three `", "`-separated segments are city, `"STATE ZIP"` and
/// country; anything before them is the street. A `"STATE ZIP"` segment
/// without whitespace sets neither state nor zip. Addresses with fewer than
/// three segments yield no components at all.
pub fn parse_address(formatted: &str) -> AddressParts {
  let segments: Vec<&str> = formatted.split(", ").collect();
  let n = segments.len();
  if n < 3 {
    return AddressParts::default();
  }

  let non_empty = |s: &str| {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_owned())
  };

  let (state, zip_code) = match segments[n - 2].trim().split_once(char::is_whitespace) {
    Some((state, zip)) => (non_empty(state), non_empty(zip)),
    None => (None, None),
  };

  AddressParts {
    street: non_empty(&segments[..n - 3].join(", ")),
    city: non_empty(segments[n - 3]),
    state,
    zip_code,
    country: non_empty(segments[n - 1]),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn price_levels_map_to_labels() {
    assert_eq!(price_range(Some(0)), PriceRange::Free);
    assert_eq!(price_range(Some(1)), PriceRange::Inexpensive);
    assert_eq!(price_range(Some(2)).as_str(), "$$");
    assert_eq!(price_range(Some(3)), PriceRange::Expensive);
    assert_eq!(price_range(Some(4)), PriceRange::VeryExpensive);
    assert_eq!(price_range(Some(99)).as_str(), "N/A");
    assert_eq!(price_range(Some(-1)), PriceRange::NotAvailable);
    assert_eq!(price_range(None), PriceRange::NotAvailable);
  }

  #[test]
  fn cuisine_uses_table_order_not_tag_order() {
    // "bar" appears first on the place but "pizza" ranks higher in the table.
    assert_eq!(cuisine(&["bar", "pizza", "restaurant"]), "Pizza");
    assert_eq!(
      cuisine(&["thai_restaurant", "chinese_restaurant"]),
      "Chinese"
    );
  }

  #[test]
  fn cuisine_falls_back_to_general_then_other() {
    assert_eq!(cuisine(&["restaurant", "food", "point_of_interest"]), "General");
    assert_eq!(cuisine(&["food", "establishment"]), "Other");
    assert_eq!(cuisine::<&str>(&[]), "Other");
  }

  #[test]
  fn parses_us_style_address() {
    let parts = parse_address("123 Main St, Springfield, IL 62704, USA");
    assert_eq!(parts.street.as_deref(), Some("123 Main St"));
    assert_eq!(parts.city.as_deref(), Some("Springfield"));
    assert_eq!(parts.state.as_deref(), Some("IL"));
    assert_eq!(parts.zip_code.as_deref(), Some("62704"));
    assert_eq!(parts.country.as_deref(), Some("USA"));
  }

  #[test]
  fn zip_keeps_everything_after_first_space() {
    let parts = parse_address("Unit 4, 10 Downing St, London, SW1A 2AA, UK");
    assert_eq!(parts.street.as_deref(), Some("Unit 4, 10 Downing St"));
    assert_eq!(parts.city.as_deref(), Some("London"));
    assert_eq!(parts.state.as_deref(), Some("SW1A"));
    assert_eq!(parts.zip_code.as_deref(), Some("2AA"));
  }

  #[test]
  fn state_segment_without_space_sets_neither_state_nor_zip() {
    let parts = parse_address("221B Baker St, London, England, GB");
    assert_eq!(parts.street.as_deref(), Some("221B Baker St"));
    assert_eq!(parts.city.as_deref(), Some("London"));
    assert_eq!(parts.state, None);
    assert_eq!(parts.zip_code, None);
    assert_eq!(parts.country.as_deref(), Some("GB"));
  }

  #[test]
  fn exactly_three_segments_has_no_street() {
    let parts = parse_address("Springfield, IL 62704, USA");
    assert_eq!(parts.street, None);
    assert_eq!(parts.city.as_deref(), Some("Springfield"));
  }

  #[test]
  fn short_addresses_leave_components_unset() {
    assert_eq!(parse_address("Springfield, USA"), AddressParts::default());
    assert_eq!(parse_address(""), AddressParts::default());
    // No comma-space separators at all.
    assert_eq!(parse_address("1 Main St,Springfield,IL,USA"), AddressParts::default());
  }
}
