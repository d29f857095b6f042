// eshop-server/src/services/receipts.rs

use async_trait::async_trait;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::errors::Result;
use crate::models::Order;

#[async_trait]
pub trait ReceiptRenderer: Send + Sync {
  /// Writes the receipt for `order` to `path`, replacing any existing file.
  async fn render(&self, path: &Path, order: &Order) -> Result<()>;
}

/// `<dir>/order_<id>.txt`
pub fn receipt_path_for(dir: &Path, order_id: i32) -> PathBuf {
  dir.join(format!("order_{}.txt", order_id))
}

pub fn receipt_text(order: &Order, shop_name: &str) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "{} - Receipt", shop_name);
  let _ = writeln!(out, "Order #{}", order.id);
  let _ = writeln!(out, "Date: {}", order.order_date.format("%Y-%m-%d %H:%M UTC"));
  let _ = writeln!(out);
  let _ = writeln!(out, "Customer: {}", order.customer_name);
  let _ = writeln!(out, "Email: {}", order.customer_email);
  let _ = writeln!(out, "Phone: {}", order.customer_phone);
  let _ = writeln!(out, "Address: {}, {} {}, {}", order.street, order.postal_code, order.city, order.country);
  let _ = writeln!(out);
  let _ = writeln!(out, "{:<32} {:>5} {:>10} {:>12}", "Product", "Qty", "Price", "Line total");
  for item in &order.items {
    let name = item
      .product
      .as_ref()
      .map_or_else(|| format!("Product {}", item.product_id), |p| p.name.clone());
    let _ = writeln!(
      out,
      "{:<32} {:>5} {:>10.2} {:>12.2}",
      name,
      item.quantity,
      item.price,
      item.line_total()
    );
  }
  let _ = writeln!(out);
  let _ = writeln!(out, "Total: {:.2}", order.total);
  out
}

/// Renders receipts as plain-text documents.
#[derive(Debug, Clone)]
pub struct TextReceiptRenderer {
  shop_name: String,
}

impl TextReceiptRenderer {
  pub fn new(shop_name: impl Into<String>) -> Self {
    Self {
      shop_name: shop_name.into(),
    }
  }
}

#[async_trait]
impl ReceiptRenderer for TextReceiptRenderer {
  #[instrument(name = "TextReceiptRenderer::render", skip(self, order), fields(order_id = order.id))]
  async fn render(&self, path: &Path, order: &Order) -> Result<()> {
    if let Some(parent) = path.parent() {
      tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, receipt_text(order, &self.shop_name)).await?;
    info!(path = %path.display(), "Receipt written.");
    Ok(())
  }
}
