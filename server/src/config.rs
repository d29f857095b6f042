// eshop-server/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
  #[default]
  Text,
  Json,
}

impl FromStr for LogFormat {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "text" | "" => Ok(LogFormat::Text),
      "json" => Ok(LogFormat::Json),
      other => Err(AppError::Config(format!("Invalid LOG_FORMAT '{}': expected 'text' or 'json'", other))),
    }
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  /// Absent means the in-memory store.
  pub database_url: Option<String>,
  pub run_migrations: bool,
  pub upload_dir: PathBuf,
  pub receipt_dir: PathBuf,
  pub mail_sender: String,
  pub contact_inbox: String,
  pub shop_name: String,
  pub log_format: LogFormat,
}

impl AppConfig {
  /// Loads `.env` (if present) and reads the process environment.
  pub fn from_env() -> Result<Self> {
    dotenv().ok();
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the configuration from an arbitrary variable lookup.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
    let get_or = |name: &str, default: &str| get(name).unwrap_or_else(|| default.to_string());

    let server_host = get_or("SERVER_HOST", "127.0.0.1");
    let server_port = get_or("SERVER_PORT", "8080")
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let run_migrations = get_or("RUN_MIGRATIONS", "true")
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid RUN_MIGRATIONS value: {}", e)))?;
    let log_format = get_or("LOG_FORMAT", "text").parse::<LogFormat>()?;

    Ok(Self {
      server_host,
      server_port,
      database_url: get("DATABASE_URL"),
      run_migrations,
      upload_dir: PathBuf::from(get_or("UPLOAD_DIR", "wwwroot/uploads")),
      receipt_dir: PathBuf::from(get_or("RECEIPT_DIR", "receipts")),
      mail_sender: get_or("MAIL_SENDER", "noreply@example.com"),
      contact_inbox: get_or("CONTACT_INBOX", "contact@example.com"),
      shop_name: get_or("SHOP_NAME", "eShop"),
      log_format,
    })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig> {
    let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    AppConfig::from_lookup(|name| vars.get(name).cloned())
  }

  #[test]
  fn defaults_apply_when_nothing_is_set() {
    let config = config_from(&[]).unwrap();
    assert_eq!(config.bind_address(), "127.0.0.1:8080");
    assert_eq!(config.database_url, None);
    assert!(config.run_migrations);
    assert_eq!(config.upload_dir, PathBuf::from("wwwroot/uploads"));
    assert_eq!(config.receipt_dir, PathBuf::from("receipts"));
    assert_eq!(config.log_format, LogFormat::Text);
  }

  #[test]
  fn blank_database_url_counts_as_absent() {
    let config = config_from(&[("DATABASE_URL", "  ")]).unwrap();
    assert_eq!(config.database_url, None);
  }

  #[test]
  fn invalid_values_are_config_errors() {
    assert!(matches!(config_from(&[("SERVER_PORT", "http")]), Err(AppError::Config(_))));
    assert!(matches!(config_from(&[("RUN_MIGRATIONS", "yes")]), Err(AppError::Config(_))));
    assert!(matches!(config_from(&[("LOG_FORMAT", "xml")]), Err(AppError::Config(_))));
  }

  #[test]
  fn json_log_format_is_case_insensitive() {
    let config = config_from(&[("LOG_FORMAT", "JSON")]).unwrap();
    assert_eq!(config.log_format, LogFormat::Json);
  }
}
