//! Layered server configuration: built-in defaults, then an optional TOML
//! file, then `CHEAPEATS_*` environment variables.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;

pub const ENV_PREFIX: &str = "CHEAPEATS";

/// Runtime server configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:                 String,
  pub port:                 u16,
  pub store_path:           PathBuf,
  pub places_api_key:       String,
  pub places_base_url:      String,
  pub request_timeout_secs: u64,
  pub throttle_ms:          u64,
  pub default_radius_m:     u32,
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn request_timeout(&self) -> Duration { Duration::from_secs(self.request_timeout_secs) }

  pub fn throttle(&self) -> Duration { Duration::from_millis(self.throttle_ms) }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
  Config::builder()
    .set_default("host", "0.0.0.0")?
    .set_default("port", 8080)?
    .set_default("store_path", "cheapeats.db")?
    .set_default("places_api_key", "")?
    .set_default("places_base_url", cheapeats_places::client::DEFAULT_BASE_URL)?
    .set_default("request_timeout_secs", 30)?
    .set_default("throttle_ms", 100)?
    .set_default("default_radius_m", i64::from(cheapeats_api::DEFAULT_RADIUS_M))
}

/// Load configuration, reading `path` if it exists.
pub fn load(path: &Path) -> Result<ServerConfig, ConfigError> {
  defaults()?
    .add_source(File::from(path).required(false))
    .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
    .build()?
    .try_deserialize()
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use config::FileFormat;

  use super::*;

  fn from_toml(toml: &str) -> ServerConfig {
    defaults()
      .unwrap()
      .add_source(File::from_str(toml, FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  #[test]
  fn defaults_apply_without_a_file() {
    let cfg = from_toml("");
    assert_eq!(cfg.address(), "0.0.0.0:8080");
    assert_eq!(cfg.store_path, PathBuf::from("cheapeats.db"));
    assert_eq!(cfg.places_api_key, "");
    assert_eq!(cfg.places_base_url, "https://maps.googleapis.com/maps/api/place");
    assert_eq!(cfg.request_timeout(), Duration::from_secs(30));
    assert_eq!(cfg.throttle(), Duration::from_millis(100));
    assert_eq!(cfg.default_radius_m, 1000);
  }

  #[test]
  fn file_values_override_defaults() {
    let cfg = from_toml(
      r#"
        port = 9000
        store_path = "~/data/cheapeats.db"
        places_api_key = "k"
        throttle_ms = 0
      "#,
    );
    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.host, "0.0.0.0");
    assert_eq!(cfg.places_api_key, "k");
    assert!(cfg.throttle().is_zero());
  }

  #[test]
  fn missing_file_is_not_an_error() {
    let cfg = load(Path::new("/nonexistent/cheapeats.toml")).unwrap();
    assert_eq!(cfg.default_radius_m, 1000);
  }

  #[test]
  fn tilde_expands_to_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(expand_tilde(Path::new("~/x.db")), PathBuf::from(home).join("x.db"));
    assert_eq!(expand_tilde(Path::new("/abs/x.db")), PathBuf::from("/abs/x.db"));
  }
}
