// eshop-server/src/models/mod.rs

//! Entity and request types. Foreign keys are plain identifiers; related rows are
//! attached explicitly by the stores.

pub mod order;
pub mod order_item;
pub mod product;

pub use order::{NewOrder, Order, OrderLineRequest, OrderRequest};
pub use order_item::{NewOrderItem, OrderItem};
pub use product::{Product, ProductDraft, ProductListing, DEFAULT_IMAGE_PATH};

use rust_decimal::Decimal;

/// Largest amount a `NUMERIC(18, 2)` column holds.
pub fn max_amount() -> Decimal {
  Decimal::new(999_999_999_999_999_999, 2)
}
