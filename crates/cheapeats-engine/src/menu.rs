//! Placeholder menu synthesis.
//!
//! Every restaurant gets the same six items. Prices scale with the provider's
//! price level and carry a small random jitter so that repeated fetches
//! exercise the price-history ledger.

use cheapeats_core::menu::{MenuCategory, NewMenuItem};
use rand::Rng as _;

pub const CURRENCY: &str = "USD";

/// Source of the random component added to each synthesized price.
pub trait Jitter: Send + Sync {
  /// A value in `[0, upper)`; `0.0` when `upper` is not positive.
  fn sample(&self, upper: f64) -> f64;
}

/// Uniform jitter from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomJitter;

impl Jitter for RandomJitter {
  fn sample(&self, upper: f64) -> f64 {
    if upper <= 0.0 {
      return 0.0;
    }
    rand::thread_rng().gen_range(0.0..upper)
  }
}

#[derive(Debug, Clone, Copy)]
enum Pricing {
  /// `base × multiplier`.
  Scaled(f64),
  /// A fixed amount independent of the base price.
  Flat(f64),
}

#[derive(Debug, Clone, Copy)]
struct Template {
  name:        &'static str,
  description: &'static str,
  category:    MenuCategory,
  pricing:     Pricing,
  /// Upper bound of the jitter added on top.
  jitter:      f64,
}

const MENU: [Template; 6] = [
  Template {
    name:        "Signature Appetizer",
    description: "Chef's special starter",
    category:    MenuCategory::Appetizers,
    pricing:     Pricing::Scaled(0.7),
    jitter:      5.0,
  },
  Template {
    name:        "House Special Main",
    description: "Most popular main dish",
    category:    MenuCategory::MainCourse,
    pricing:     Pricing::Scaled(1.0),
    jitter:      10.0,
  },
  Template {
    name:        "Daily Special",
    description: "Today's featured dish",
    category:    MenuCategory::MainCourse,
    pricing:     Pricing::Scaled(1.2),
    jitter:      8.0,
  },
  Template {
    name:        "Classic Burger",
    description: "Traditional burger with fries",
    category:    MenuCategory::MainCourse,
    pricing:     Pricing::Scaled(0.9),
    jitter:      5.0,
  },
  Template {
    name:        "Dessert of the Day",
    description: "Sweet treat to end your meal",
    category:    MenuCategory::Desserts,
    pricing:     Pricing::Scaled(0.5),
    jitter:      3.0,
  },
  Template {
    name:        "Soft Drink",
    description: "Various sodas available",
    category:    MenuCategory::Beverages,
    pricing:     Pricing::Flat(3.50),
    jitter:      2.0,
  },
];

/// The price a level-`n` restaurant's items scale from.
pub fn base_price(price_level: Option<i64>) -> f64 {
  match price_level {
    Some(level) if level > 0 => level as f64 * 15.0,
    _ => 10.0,
  }
}

fn round_cents(amount: f64) -> f64 { (amount * 100.0).round() / 100.0 }

/// Build the six placeholder items for a restaurant, in menu order.
pub fn synthesize(
  restaurant_id: i64,
  price_level: Option<i64>,
  jitter: &dyn Jitter,
) -> Vec<NewMenuItem> {
  let base = base_price(price_level);

  MENU
    .iter()
    .map(|t| {
      let price = match t.pricing {
        Pricing::Scaled(multiplier) => base * multiplier,
        Pricing::Flat(amount) => amount,
      } + jitter.sample(t.jitter);

      NewMenuItem {
        restaurant_id,
        name: t.name.to_owned(),
        description: t.description.to_owned(),
        category: t.category,
        price: round_cents(price),
        currency: CURRENCY.to_owned(),
        is_available: true,
      }
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  struct NoJitter;

  impl Jitter for NoJitter {
    fn sample(&self, _upper: f64) -> f64 { 0.0 }
  }

  struct MaxJitter;

  impl Jitter for MaxJitter {
    fn sample(&self, upper: f64) -> f64 { upper }
  }

  #[test]
  fn base_price_scales_with_level() {
    assert_eq!(base_price(None), 10.0);
    assert_eq!(base_price(Some(0)), 10.0);
    assert_eq!(base_price(Some(-3)), 10.0);
    assert_eq!(base_price(Some(1)), 15.0);
    assert_eq!(base_price(Some(4)), 60.0);
  }

  #[test]
  fn synthesizes_six_fixed_items() {
    let items = synthesize(3, Some(2), &NoJitter);

    let summary: Vec<(&str, MenuCategory, f64)> = items
      .iter()
      .map(|i| (i.name.as_str(), i.category, i.price))
      .collect();
    assert_eq!(summary, vec![
      ("Signature Appetizer", MenuCategory::Appetizers, 21.0),
      ("House Special Main", MenuCategory::MainCourse, 30.0),
      ("Daily Special", MenuCategory::MainCourse, 36.0),
      ("Classic Burger", MenuCategory::MainCourse, 27.0),
      ("Dessert of the Day", MenuCategory::Desserts, 15.0),
      ("Soft Drink", MenuCategory::Beverages, 3.5),
    ]);
    assert!(items.iter().all(|i| i.restaurant_id == 3));
    assert!(items.iter().all(|i| i.currency == "USD" && i.is_available));
  }

  #[test]
  fn soft_drink_ignores_price_level() {
    let cheap = synthesize(1, Some(1), &MaxJitter);
    let pricey = synthesize(1, Some(4), &MaxJitter);
    assert_eq!(cheap[5].price, 5.5);
    assert_eq!(pricey[5].price, 5.5);
    assert_eq!(pricey[1].price, 70.0);
  }

  #[test]
  fn random_jitter_stays_in_range() {
    for _ in 0..1_000 {
      let j = RandomJitter.sample(5.0);
      assert!((0.0..5.0).contains(&j), "out of range: {j}");
    }
    assert_eq!(RandomJitter.sample(0.0), 0.0);
  }

  #[test]
  fn prices_are_rounded_to_cents() {
    struct Third;
    impl Jitter for Third {
      fn sample(&self, _upper: f64) -> f64 { 1.0 / 3.0 }
    }

    for item in synthesize(1, Some(3), &Third) {
      let cents = item.price * 100.0;
      assert!((cents - cents.round()).abs() < 1e-9, "{} = {}", item.name, item.price);
    }
  }
}
