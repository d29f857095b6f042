// eshop-server/src/models/order.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::warn;

use super::max_amount;
use super::order_item::{line_amount, NewOrderItem, OrderItem};
use super::product::Product;
use crate::errors::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
  pub id: i32,
  pub customer_name: String,
  pub customer_email: String,
  pub customer_phone: String,
  pub street: String,
  pub city: String,
  pub postal_code: String,
  pub country: String,
  #[serde(with = "rust_decimal::serde::float")]
  pub total: Decimal,
  pub order_date: DateTime<Utc>,
  #[sqlx(skip)]
  pub items: Vec<OrderItem>,
}

// --- Request DTOs ---

/// Body of `POST /api/order`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderRequest {
  pub customer_name: String,
  pub customer_email: String,
  pub customer_phone: String,
  pub street: String,
  pub city: String,
  pub postal_code: String,
  pub country: String,
  pub products: Option<Vec<OrderLineRequest>>,
  /// Free-text note from the checkout form. Not persisted.
  pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineRequest {
  #[serde(alias = "productId")]
  pub id: i32,
  pub quantity: i32,
  #[serde(with = "rust_decimal::serde::float")]
  pub price: Decimal,
}

impl OrderRequest {
  pub fn lines(&self) -> &[OrderLineRequest] {
    self.products.as_deref().unwrap_or_default()
  }

  /// Rejects a missing or empty product list and lines that cannot form an order item.
  pub fn validate(&self) -> Result<()> {
    let lines = match self.products.as_deref() {
      Some(lines) if !lines.is_empty() => lines,
      _ => {
        return Err(AppError::Validation(
          "Order request or order items cannot be null or empty.".to_string(),
        ))
      }
    };
    for line in lines {
      if line.quantity <= 0 {
        return Err(AppError::Validation(format!(
          "Quantity for product {} must be positive.",
          line.id
        )));
      }
      if line.price < Decimal::ZERO {
        return Err(AppError::Validation(format!(
          "Price for product {} cannot be negative.",
          line.id
        )));
      }
      if line.price > max_amount() {
        return Err(AppError::Validation(format!(
          "Price for product {} is out of range.",
          line.id
        )));
      }
    }
    Ok(())
  }
}

/// The unsaved order aggregate: header fields plus one item per requested line.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
  pub customer_name: String,
  pub customer_email: String,
  pub customer_phone: String,
  pub street: String,
  pub city: String,
  pub postal_code: String,
  pub country: String,
  pub total: Decimal,
  pub order_date: DateTime<Utc>,
  pub items: Vec<NewOrderItem>,
}

impl NewOrder {
  /// Builds the aggregate from a validated request and the products resolved for
  /// its lines, in line order. Unit prices come from the request.
  pub fn from_request(request: &OrderRequest, products: &[Product], order_date: DateTime<Utc>) -> Result<Self> {
    let lines = request.lines();
    if lines.len() != products.len() {
      return Err(AppError::Internal(format!(
        "Resolved {} products for {} order lines.",
        products.len(),
        lines.len()
      )));
    }

    let items: Vec<NewOrderItem> = lines
      .iter()
      .zip(products)
      .map(|(line, product)| {
        if line.price != product.price {
          warn!(
            product_id = product.id,
            submitted_price = %line.price,
            catalog_price = %product.price,
            "Order line price differs from catalog price; keeping submitted price."
          );
        }
        NewOrderItem {
          product_id: product.id,
          quantity: line.quantity,
          price: line.price,
          product: product.clone(),
        }
      })
      .collect();

    let total = items
      .iter()
      .try_fold(Decimal::ZERO, |acc, item| {
        line_amount(item.price, item.quantity).and_then(|amount| acc.checked_add(amount))
      })
      .filter(|total| *total <= max_amount())
      .ok_or_else(|| AppError::Validation("Order total is out of range.".to_string()))?;

    Ok(Self {
      customer_name: request.customer_name.clone(),
      customer_email: request.customer_email.clone(),
      customer_phone: request.customer_phone.clone(),
      street: request.street.clone(),
      city: request.city.clone(),
      postal_code: request.postal_code.clone(),
      country: request.country.clone(),
      total,
      order_date,
      items,
    })
  }
}
