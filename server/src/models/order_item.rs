// eshop-server/src/models/order_item.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use super::product::Product;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
  pub id: i32,
  pub order_id: i32,
  pub product_id: i32,
  pub quantity: i32,
  /// Unit price as submitted with the order, not the catalog price at read time.
  #[serde(with = "rust_decimal::serde::float")]
  pub price: Decimal,
  /// Populated by the store when the order is read back.
  #[sqlx(skip)]
  pub product: Option<Product>,
}

impl OrderItem {
  /// Saturates at `Decimal::MAX`; stored items are bounded by [`super::max_amount`].
  pub fn line_total(&self) -> Decimal {
    line_amount(self.price, self.quantity).unwrap_or(Decimal::MAX)
  }
}

/// `price × quantity`, or `None` on overflow.
pub fn line_amount(price: Decimal, quantity: i32) -> Option<Decimal> {
  price.checked_mul(Decimal::from(quantity))
}

/// An unsaved line of a [`super::NewOrder`], carrying the product it was resolved against.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderItem {
  pub product_id: i32,
  pub quantity: i32,
  pub price: Decimal,
  pub product: Product,
}
