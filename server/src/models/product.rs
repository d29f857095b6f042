// eshop-server/src/models/product.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use crate::errors::{AppError, Result};

/// Image reference stored on products created without an upload.
pub const DEFAULT_IMAGE_PATH: &str = "/uploads/default.jpg";

pub const MAX_NAME_LEN: usize = 255;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
  pub id: i32,
  pub name: String,
  #[serde(with = "rust_decimal::serde::float")]
  pub price: Decimal,
  pub description: Option<String>,
  // Not floored: order placement may drive it negative.
  pub quantity: i32,
  pub image_path: Option<String>,
}

/// List presentation of a product; nullable text comes out as "".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListing {
  pub id: i32,
  pub name: String,
  #[serde(with = "rust_decimal::serde::float")]
  pub price: Decimal,
  pub description: String,
  pub quantity: i32,
  pub image_path: String,
}

impl From<Product> for ProductListing {
  fn from(p: Product) -> Self {
    Self {
      id: p.id,
      name: p.name,
      price: p.price,
      description: p.description.unwrap_or_default(),
      quantity: p.quantity,
      image_path: p.image_path.unwrap_or_default(),
    }
  }
}

/// Validated product fields accepted by create and update.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
  pub name: String,
  pub price: Decimal,
  pub description: Option<String>,
  pub quantity: i32,
}

impl ProductDraft {
  pub fn new(name: &str, price: Decimal, description: Option<&str>, quantity: i32) -> Result<Self> {
    let name = name.trim();
    if name.is_empty() {
      return Err(AppError::Validation("Product name is required.".to_string()));
    }
    if name.chars().count() > MAX_NAME_LEN {
      return Err(AppError::Validation(format!(
        "Product name must be at most {} characters.",
        MAX_NAME_LEN
      )));
    }
    if price < Decimal::ZERO {
      return Err(AppError::Validation("Product price cannot be negative.".to_string()));
    }
    if price > super::max_amount() {
      return Err(AppError::Validation("Product price is out of range.".to_string()));
    }
    let description = description.map(str::trim).filter(|d| !d.is_empty()).map(str::to_string);

    Ok(Self {
      name: name.to_string(),
      price,
      description,
      quantity,
    })
  }
}
