// eshop-server/src/lib.rs

//! Shop backend: product catalog, order placement with receipts and
//! confirmation emails, and a contact form, served over HTTP.

pub mod config;
pub mod errors;
pub mod models;
pub mod pipelines;
pub mod services;
pub mod state;
pub mod store;
pub mod web;

use std::sync::Arc;

use eshop_flow::Registry;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, LogFormat};
use crate::errors::{AppError, Result};
use crate::services::{CatalogService, ImageStore, MockMailer, NotificationSender, ReceiptRenderer, TextReceiptRenderer};
use crate::state::AppState;
use crate::store::{CatalogStore, MemoryStore, OrderStore, PgStore};

/// Installs the global tracing subscriber. `RUST_LOG` overrides the default `info` level.
pub fn init_tracing(format: LogFormat) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_span_events(FmtSpan::CLOSE);
  let result = match format {
    LogFormat::Text => builder.try_init(),
    LogFormat::Json => builder.json().try_init(),
  };
  if let Err(e) = result {
    eprintln!("Tracing subscriber already installed: {}", e);
  }
}

/// Wires stores and services into an [`AppState`] and registers the pipelines.
pub fn assemble_state(
  config: AppConfig,
  catalog_store: Arc<dyn CatalogStore>,
  order_store: Arc<dyn OrderStore>,
  mailer: Arc<dyn NotificationSender>,
  receipts: Arc<dyn ReceiptRenderer>,
) -> AppState {
  let flow = Arc::new(Registry::<AppError>::new());
  let app_state = AppState {
    catalog: CatalogService::new(catalog_store, ImageStore::new(config.upload_dir.clone())),
    orders: order_store,
    mailer,
    receipts,
    flow: flow.clone(),
    config: Arc::new(config),
  };
  pipelines::register_all_pipelines(&flow);
  app_state
}

/// Builds the production state: PostgreSQL when `DATABASE_URL` is set,
/// the in-memory store otherwise.
pub async fn build_state(config: AppConfig) -> Result<AppState> {
  let (catalog_store, order_store): (Arc<dyn CatalogStore>, Arc<dyn OrderStore>) = match &config.database_url {
    Some(url) => {
      let store = Arc::new(PgStore::connect(url).await?);
      if config.run_migrations {
        store.run_migrations().await?;
      }
      let catalog: Arc<dyn CatalogStore> = store.clone();
      let orders: Arc<dyn OrderStore> = store;
      (catalog, orders)
    }
    None => {
      tracing::warn!("DATABASE_URL not set; using the in-memory store. Data will not survive a restart.");
      let store = Arc::new(MemoryStore::new());
      let catalog: Arc<dyn CatalogStore> = store.clone();
      let orders: Arc<dyn OrderStore> = store;
      (catalog, orders)
    }
  };

  let mailer = Arc::new(MockMailer::new(config.mail_sender.clone()));
  let receipts = Arc::new(TextReceiptRenderer::new(config.shop_name.clone()));
  Ok(assemble_state(config, catalog_store, order_store, mailer, receipts))
}
