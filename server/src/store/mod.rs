// eshop-server/src/store/mod.rs

//! Persistence seams for the catalog and for orders.
//!
//! Handlers and pipeline steps only see the traits; the binary picks
//! [`PgStore`] when a database is configured and [`MemoryStore`] otherwise.

use async_trait::async_trait;

use crate::errors::Result;
use crate::models::{NewOrder, Order, Product, ProductDraft};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait CatalogStore: Send + Sync {
  async fn list_products(&self) -> Result<Vec<Product>>;

  async fn get_product(&self, id: i32) -> Result<Option<Product>>;

  async fn insert_product(&self, draft: &ProductDraft, image_path: &str) -> Result<Product>;

  /// Overwrites the product's fields; `image_path` of `None` keeps the current image.
  /// Returns `None` when no product has this id.
  async fn update_product(&self, id: i32, draft: &ProductDraft, image_path: Option<&str>) -> Result<Option<Product>>;

  /// Removes the product and returns what was removed.
  /// A product still referenced by an order item cannot be removed (`AppError::Internal`).
  async fn delete_product(&self, id: i32) -> Result<Option<Product>>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
  /// Persists the order, its items and the stock decrement of every referenced
  /// product as a single unit. Stock is not floored.
  async fn place_order(&self, order: NewOrder) -> Result<Order>;

  /// The order with its items and their products, if it exists.
  async fn get_order(&self, id: i32) -> Result<Option<Order>>;

  /// All orders, newest first, with items and products populated.
  async fn list_orders(&self) -> Result<Vec<Order>>;
}

pub(crate) fn product_in_use(id: i32) -> crate::errors::AppError {
  crate::errors::AppError::Internal(format!(
    "Error deleting product: product {} is referenced by existing orders.",
    id
  ))
}
