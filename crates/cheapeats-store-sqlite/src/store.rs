//! [`SqliteStore`]: the SQLite implementation of [`RestaurantStore`].

use std::path::Path;

use cheapeats_core::{
  menu::{MenuItem, NewMenuItem, PriceHistory},
  provenance::{NewScrapedRecord, ScrapedRecord},
  restaurant::{Restaurant, RestaurantDraft},
  store::{MenuFilter, RestaurantFilter, RestaurantStore},
};

use crate::{
  encode::{
    encode_dt, now, RawMenuItem, RawPriceHistory, RawRestaurant, RawScrapedRecord,
    MENU_ITEM_COLUMNS, RESTAURANT_COLUMNS,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A CheapEats store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a `SELECT {RESTAURANT_COLUMNS} ...` query and decode every row.
  async fn query_restaurants(
    &self,
    sql: String,
    params: Vec<rusqlite::types::Value>,
  ) -> Result<Vec<Restaurant>> {
    let raws: Vec<RawRestaurant> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), RawRestaurant::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRestaurant::into_restaurant).collect()
  }

  /// Run a `SELECT {MENU_ITEM_COLUMNS} ...` query and decode every row.
  async fn query_menu_items(
    &self,
    sql: String,
    params: Vec<rusqlite::types::Value>,
  ) -> Result<Vec<MenuItem>> {
    let raws: Vec<RawMenuItem> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), RawMenuItem::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMenuItem::into_menu_item).collect()
  }
}

fn text(s: Option<String>) -> rusqlite::types::Value {
  s.map_or(rusqlite::types::Value::Null, rusqlite::types::Value::Text)
}

// ─── RestaurantStore impl ────────────────────────────────────────────────────

impl RestaurantStore for SqliteStore {
  type Error = Error;

  // ── Restaurants ───────────────────────────────────────────────────────────

  async fn find_restaurant_by_external_id(
    &self,
    external_id: &str,
  ) -> Result<Option<Restaurant>> {
    let sql = format!("SELECT {RESTAURANT_COLUMNS} FROM restaurants WHERE external_id = ?1");
    let mut rows = self
      .query_restaurants(sql, vec![external_id.to_owned().into()])
      .await?;
    Ok(rows.pop())
  }

  async fn get_restaurant(&self, id: i64) -> Result<Option<Restaurant>> {
    let sql = format!("SELECT {RESTAURANT_COLUMNS} FROM restaurants WHERE id = ?1");
    let mut rows = self.query_restaurants(sql, vec![id.into()]).await?;
    Ok(rows.pop())
  }

  async fn create_restaurant(&self, draft: RestaurantDraft) -> Result<Restaurant> {
    let created_at = now();
    let at_str     = encode_dt(created_at);

    let d = draft.clone();
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO restaurants (
             external_id, name, address, street, city, state, zip_code, country,
             latitude, longitude, cuisine_type, phone, website, rating,
             price_range, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?16)",
          rusqlite::params![
            d.external_id,
            d.name,
            d.address,
            d.parts.street,
            d.parts.city,
            d.parts.state,
            d.parts.zip_code,
            d.parts.country,
            d.latitude,
            d.longitude,
            d.cuisine_type,
            d.phone,
            d.website,
            f64::from(d.rating),
            d.price_range.as_str(),
            at_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Restaurant {
      id,
      external_id:  draft.external_id,
      name:         draft.name,
      address:      draft.address,
      street:       draft.parts.street,
      city:         draft.parts.city,
      state:        draft.parts.state,
      zip_code:     draft.parts.zip_code,
      country:      draft.parts.country,
      latitude:     draft.latitude,
      longitude:    draft.longitude,
      cuisine_type: draft.cuisine_type,
      phone:        draft.phone,
      website:      draft.website,
      rating:       draft.rating,
      price_range:  draft.price_range,
      created_at,
      updated_at:   created_at,
    })
  }

  async fn update_restaurant(&self, restaurant: &Restaurant) -> Result<Restaurant> {
    let mut updated = restaurant.clone();
    updated.updated_at = now();

    let r = updated.clone();
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE restaurants SET
             name = ?2, address = ?3, street = ?4, city = ?5, state = ?6,
             zip_code = ?7, country = ?8, latitude = ?9, longitude = ?10,
             cuisine_type = ?11, phone = ?12, website = ?13, rating = ?14,
             price_range = ?15, updated_at = ?16
           WHERE id = ?1",
          rusqlite::params![
            r.id,
            r.name,
            r.address,
            r.street,
            r.city,
            r.state,
            r.zip_code,
            r.country,
            r.latitude,
            r.longitude,
            r.cuisine_type,
            r.phone,
            r.website,
            f64::from(r.rating),
            r.price_range.as_str(),
            encode_dt(r.updated_at),
          ],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::RestaurantNotFound(restaurant.id));
    }
    Ok(updated)
  }

  async fn list_restaurants(&self, filter: &RestaurantFilter) -> Result<Vec<Restaurant>> {
    let sql = format!(
      "SELECT {RESTAURANT_COLUMNS} FROM restaurants
       WHERE (?1 IS NULL OR city = ?1)
         AND (?2 IS NULL OR cuisine_type = ?2)
         AND (?3 IS NULL OR price_range = ?3)
       ORDER BY id"
    );
    let params = vec![
      text(filter.city.clone()),
      text(filter.cuisine.clone()),
      text(filter.price_range.map(|p| p.as_str().to_owned())),
    ];
    self.query_restaurants(sql, params).await
  }

  async fn restaurants_in_latitude_band(
    &self,
    min_lat: f64,
    max_lat: f64,
  ) -> Result<Vec<Restaurant>> {
    let sql = format!(
      "SELECT {RESTAURANT_COLUMNS} FROM restaurants
       WHERE latitude BETWEEN ?1 AND ?2
       ORDER BY id"
    );
    self
      .query_restaurants(sql, vec![min_lat.into(), max_lat.into()])
      .await
  }

  // ── Menu items ────────────────────────────────────────────────────────────

  async fn find_menu_item(&self, restaurant_id: i64, name: &str) -> Result<Option<MenuItem>> {
    let sql = format!(
      "SELECT {MENU_ITEM_COLUMNS} FROM menu_items
       WHERE restaurant_id = ?1 AND name = ?2
       ORDER BY id
       LIMIT 1"
    );
    let mut rows = self
      .query_menu_items(sql, vec![restaurant_id.into(), name.to_owned().into()])
      .await?;
    Ok(rows.pop())
  }

  async fn get_menu_item(&self, id: i64) -> Result<Option<MenuItem>> {
    let sql = format!("SELECT {MENU_ITEM_COLUMNS} FROM menu_items WHERE id = ?1");
    let mut rows = self.query_menu_items(sql, vec![id.into()]).await?;
    Ok(rows.pop())
  }

  async fn create_menu_item(&self, input: NewMenuItem) -> Result<MenuItem> {
    let created_at = now();
    let at_str     = encode_dt(created_at);

    let i = input.clone();
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO menu_items (
             restaurant_id, name, description, category, price, currency,
             is_available, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
          rusqlite::params![
            i.restaurant_id,
            i.name,
            i.description,
            i.category.as_str(),
            i.price,
            i.currency,
            i.is_available,
            at_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(MenuItem {
      id,
      restaurant_id: input.restaurant_id,
      name:          input.name,
      description:   input.description,
      category:      input.category,
      price:         input.price,
      currency:      input.currency,
      is_available:  input.is_available,
      created_at,
      updated_at:    created_at,
    })
  }

  async fn update_menu_item_price(&self, menu_item_id: i64, price: f64) -> Result<()> {
    let at_str = encode_dt(now());

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE menu_items SET price = ?2, updated_at = ?3 WHERE id = ?1",
          rusqlite::params![menu_item_id, price, at_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::MenuItemNotFound(menu_item_id));
    }
    Ok(())
  }

  async fn list_menu_items(
    &self,
    restaurant_id: i64,
    filter: &MenuFilter,
  ) -> Result<Vec<MenuItem>> {
    let sql = format!(
      "SELECT {MENU_ITEM_COLUMNS} FROM menu_items
       WHERE restaurant_id = ?1
         AND (?2 IS NULL OR category = ?2)
         AND (?3 IS NULL OR price <= ?3)
       ORDER BY id"
    );
    let params = vec![
      restaurant_id.into(),
      text(filter.category.map(|c| c.as_str().to_owned())),
      filter
        .max_price
        .map_or(rusqlite::types::Value::Null, rusqlite::types::Value::Real),
    ];
    self.query_menu_items(sql, params).await
  }

  // ── Price history ─────────────────────────────────────────────────────────

  async fn append_price_history(&self, menu_item_id: i64, price: f64) -> Result<PriceHistory> {
    let recorded_at = now();
    let at_str      = encode_dt(recorded_at);

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO price_history (menu_item_id, price, recorded_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![menu_item_id, price, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(PriceHistory { id, menu_item_id, price, recorded_at })
  }

  async fn price_history(&self, menu_item_id: i64) -> Result<Vec<PriceHistory>> {
    let raws: Vec<RawPriceHistory> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, menu_item_id, price, recorded_at
           FROM price_history
           WHERE menu_item_id = ?1
           ORDER BY recorded_at DESC, id DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![menu_item_id], |row| {
            Ok(RawPriceHistory {
              id:           row.get(0)?,
              menu_item_id: row.get(1)?,
              price:        row.get(2)?,
              recorded_at:  row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPriceHistory::into_price_history).collect()
  }

  // ── Provenance ────────────────────────────────────────────────────────────

  async fn append_scraped_record(&self, input: NewScrapedRecord) -> Result<ScrapedRecord> {
    let scraped_at = now();
    let at_str     = encode_dt(scraped_at);
    let raw_str    = input.raw_data.to_string();
    let source     = input.source.clone();
    let rid        = input.restaurant_id;

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO scraped_data (source, restaurant_id, raw_data, scraped_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![source, rid, raw_str, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(ScrapedRecord {
      id,
      source: input.source,
      restaurant_id: input.restaurant_id,
      raw_data: input.raw_data,
      scraped_at,
    })
  }

  async fn scraped_records(&self, restaurant_id: i64) -> Result<Vec<ScrapedRecord>> {
    let raws: Vec<RawScrapedRecord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, source, restaurant_id, raw_data, scraped_at
           FROM scraped_data
           WHERE restaurant_id = ?1
           ORDER BY id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![restaurant_id], |row| {
            Ok(RawScrapedRecord {
              id:            row.get(0)?,
              source:        row.get(1)?,
              restaurant_id: row.get(2)?,
              raw_data:      row.get(3)?,
              scraped_at:    row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawScrapedRecord::into_scraped_record).collect()
  }
}
