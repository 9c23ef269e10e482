//! SQL schema for the CheapEats SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS restaurants (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    external_id   TEXT NOT NULL UNIQUE,   -- provider place id; upsert key
    name          TEXT NOT NULL,
    address       TEXT NOT NULL DEFAULT '',
    street        TEXT,
    city          TEXT,
    state         TEXT,
    zip_code      TEXT,
    country       TEXT,
    latitude      REAL NOT NULL,
    longitude     REAL NOT NULL,
    cuisine_type  TEXT NOT NULL,
    phone         TEXT,
    website       TEXT,
    rating        REAL NOT NULL DEFAULT 0,
    price_range   TEXT NOT NULL DEFAULT 'N/A',
    created_at    TEXT NOT NULL,   -- RFC 3339 UTC, fixed microsecond width
    updated_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS menu_items (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    restaurant_id  INTEGER NOT NULL REFERENCES restaurants(id) ON DELETE CASCADE,
    name           TEXT NOT NULL,
    description    TEXT NOT NULL DEFAULT '',
    category       TEXT NOT NULL,
    price          REAL NOT NULL,
    currency       TEXT NOT NULL DEFAULT 'USD',
    is_available   INTEGER NOT NULL DEFAULT 1,
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL
);

-- Append-only. No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS price_history (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    menu_item_id  INTEGER NOT NULL REFERENCES menu_items(id) ON DELETE CASCADE,
    price         REAL NOT NULL,
    recorded_at   TEXT NOT NULL
);

-- Raw provider payloads, one row per restaurant per fetch cycle.
CREATE TABLE IF NOT EXISTS scraped_data (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    source         TEXT NOT NULL,
    restaurant_id  INTEGER REFERENCES restaurants(id) ON DELETE SET NULL,
    raw_data       TEXT NOT NULL,   -- opaque JSON document
    scraped_at     TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS restaurants_location_idx ON restaurants(latitude, longitude);
CREATE INDEX IF NOT EXISTS menu_items_lookup_idx    ON menu_items(restaurant_id, name);
CREATE INDEX IF NOT EXISTS menu_items_price_idx     ON menu_items(price);
CREATE INDEX IF NOT EXISTS price_history_item_idx   ON price_history(menu_item_id, recorded_at);
CREATE INDEX IF NOT EXISTS scraped_data_source_idx  ON scraped_data(source);

PRAGMA user_version = 1;
";
