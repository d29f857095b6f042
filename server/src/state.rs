// eshop-server/src/state.rs

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::services::{CatalogService, NotificationSender, ReceiptRenderer};
use crate::store::OrderStore;
use eshop_flow::Registry;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub catalog: CatalogService,
  pub orders: Arc<dyn OrderStore>,
  pub mailer: Arc<dyn NotificationSender>,
  pub receipts: Arc<dyn ReceiptRenderer>,
  pub flow: Arc<Registry<AppError>>,
  pub config: Arc<AppConfig>,
}
