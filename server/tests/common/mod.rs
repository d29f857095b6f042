// eshop-server/tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use eshop_server::config::AppConfig;
use eshop_server::errors::{AppError, Result};
use eshop_server::models::{Order, Product};
use eshop_server::services::mailer::{NotificationSender, OutgoingEmail, SentEmail};
use eshop_server::services::receipts::{ReceiptRenderer, TextReceiptRenderer};
use eshop_server::state::AppState;
use eshop_server::store::MemoryStore;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Records every message; fails when `fail` is set.
#[derive(Default)]
pub struct RecordingMailer {
  pub sent: Mutex<Vec<OutgoingEmail>>,
  pub fail: bool,
}

#[async_trait]
impl NotificationSender for RecordingMailer {
  async fn send(&self, email: &OutgoingEmail) -> Result<SentEmail> {
    if self.fail {
      return Err(AppError::Notification("smtp unavailable".to_string()));
    }
    self.sent.lock().push(email.clone());
    Ok(SentEmail {
      to: email.to.clone(),
      from: "noreply@shop.test".to_string(),
      subject: email.subject.clone(),
      body_preview: String::new(),
      message_id: format!("test-{}", self.sent.lock().len()),
    })
  }
}

pub struct FailingRenderer;

#[async_trait]
impl ReceiptRenderer for FailingRenderer {
  async fn render(&self, _path: &Path, _order: &Order) -> Result<()> {
    Err(AppError::Io(std::io::Error::other("disk full")))
  }
}

pub struct TestShop {
  pub dir: TempDir,
  pub state: AppState,
  pub store: Arc<MemoryStore>,
  pub mailer: Arc<RecordingMailer>,
}

impl TestShop {
  pub fn upload_dir(&self) -> std::path::PathBuf {
    self.dir.path().join("uploads")
  }

  pub fn receipt_dir(&self) -> std::path::PathBuf {
    self.dir.path().join("receipts")
  }
}

pub fn product(id: i32, price: &str, quantity: i32) -> Product {
  Product {
    id,
    name: format!("Product {}", id),
    price: price.parse::<Decimal>().expect("price"),
    description: Some("A product".to_string()),
    quantity,
    image_path: Some("/uploads/default.jpg".to_string()),
  }
}

fn config(dir: &Path) -> AppConfig {
  let mut config = AppConfig::from_lookup(|_| None).expect("default config");
  config.upload_dir = dir.join("uploads");
  config.receipt_dir = dir.join("receipts");
  config.contact_inbox = "inbox@shop.test".to_string();
  config
}

pub fn shop_with(products: Vec<Product>, mailer: RecordingMailer, renderer: Option<Arc<dyn ReceiptRenderer>>) -> TestShop {
  let dir = tempfile::tempdir().expect("tempdir");
  std::fs::create_dir_all(dir.path().join("uploads")).expect("upload dir");
  let store = Arc::new(MemoryStore::with_products(products));
  let mailer = Arc::new(mailer);
  let receipts = renderer.unwrap_or_else(|| Arc::new(TextReceiptRenderer::new("Test Shop")) as Arc<dyn ReceiptRenderer>);
  let state = eshop_server::assemble_state(config(dir.path()), store.clone(), store.clone(), mailer.clone(), receipts);
  TestShop {
    dir,
    state,
    store,
    mailer,
  }
}

pub fn shop(products: Vec<Product>) -> TestShop {
  shop_with(products, RecordingMailer::default(), None)
}

/// Builds the actix test service for a [`TestShop`].
#[macro_export]
macro_rules! init_app {
  ($shop:expr) => {{
    let upload_dir = $shop.upload_dir();
    actix_web::test::init_service(
      actix_web::App::new()
        .app_data(actix_web::web::Data::new($shop.state.clone()))
        .configure(move |cfg| eshop_server::web::configure_app_routes(cfg, &upload_dir)),
    )
    .await
  }};
}

pub const BOUNDARY: &str = "----eshop-test-boundary";

/// A multipart/form-data body with text fields and an optional `image` file part.
pub fn multipart_body(fields: &[(&str, &str)], image: Option<(&str, &[u8])>) -> Vec<u8> {
  let mut body = Vec::new();
  for (name, value) in fields {
    body.extend_from_slice(
      format!(
        "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
        BOUNDARY, name, value
      )
      .as_bytes(),
    );
  }
  if let Some((file_name, bytes)) = image {
    body.extend_from_slice(
      format!(
        "--{}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
        BOUNDARY, file_name
      )
      .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(b"\r\n");
  }
  body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
  body
}

pub fn multipart_content_type() -> (&'static str, String) {
  ("content-type", format!("multipart/form-data; boundary={}", BOUNDARY))
}
