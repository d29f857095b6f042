// eshop-server/src/web/handlers/product_form.rs

//! Reads the product create/update form, either multipart (with an optional
//! `image` file part) or urlencoded.

use actix_multipart::{Field, Multipart};
use actix_web::http::header::{self, HeaderMap};
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::TryStreamExt;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

use crate::errors::{AppError, Result};
use crate::models::ProductDraft;
use crate::services::images::{UploadedImage, MAX_IMAGE_SIZE};

/// Upper bound for a single text field.
const MAX_TEXT_FIELD_SIZE: usize = 64 * 1024;

/// Raw text fields as submitted.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProductFields {
  pub id: Option<String>,
  pub name: Option<String>,
  pub price: Option<String>,
  pub description: Option<String>,
  pub quantity: Option<String>,
}

#[derive(Debug)]
pub struct ProductForm {
  pub body_id: Option<i32>,
  pub draft: ProductDraft,
  pub image: Option<UploadedImage>,
}

fn parse_field<T: FromStr>(value: Option<&str>, field: &str) -> Result<Option<T>> {
  match value.map(str::trim).filter(|v| !v.is_empty()) {
    None => Ok(None),
    Some(v) => v
      .parse::<T>()
      .map(Some)
      .map_err(|_| AppError::Validation(format!("Invalid value for '{}': {}", field, v))),
  }
}

impl ProductFields {
  fn into_form(self, image: Option<UploadedImage>) -> Result<ProductForm> {
    let body_id = parse_field::<i32>(self.id.as_deref(), "id")?;
    let price = parse_field::<Decimal>(self.price.as_deref(), "price")?
      .ok_or_else(|| AppError::Validation("Product price is required.".to_string()))?;
    let quantity = parse_field::<i32>(self.quantity.as_deref(), "quantity")?
      .ok_or_else(|| AppError::Validation("Product quantity is required.".to_string()))?;
    let draft = ProductDraft::new(
      self.name.as_deref().unwrap_or_default(),
      price,
      self.description.as_deref(),
      quantity,
    )?;
    Ok(ProductForm { body_id, draft, image })
  }
}

fn is_multipart(headers: &HeaderMap) -> bool {
  headers
    .get(header::CONTENT_TYPE)
    .and_then(|v| v.to_str().ok())
    .is_some_and(|ct| ct.to_ascii_lowercase().starts_with("multipart/form-data"))
}

pub async fn read_product_form(req: &HttpRequest, payload: web::Payload) -> Result<ProductForm> {
  if is_multipart(req.headers()) {
    let multipart = Multipart::new(req.headers(), payload);
    return read_multipart(multipart).await;
  }

  let mut payload = payload.into_inner();
  let fields = web::Form::<ProductFields>::from_request(req, &mut payload)
    .await
    .map_err(|e| AppError::Validation(format!("Invalid form data: {}", e)))?
    .into_inner();
  fields.into_form(None)
}

async fn read_field_bytes(field: &mut Field, limit: usize) -> Result<Vec<u8>> {
  let mut data = Vec::new();
  while let Some(chunk) = field
    .try_next()
    .await
    .map_err(|e| AppError::Validation(format!("Multipart error: {}", e)))?
  {
    if data.len() + chunk.len() > limit {
      return Err(AppError::Validation(format!(
        "Field '{}' exceeds the maximum size of {} bytes",
        field.name().unwrap_or_default(),
        limit
      )));
    }
    data.extend_from_slice(&chunk);
  }
  Ok(data)
}

async fn read_multipart(mut multipart: Multipart) -> Result<ProductForm> {
  let mut fields = ProductFields::default();
  let mut image = None;

  while let Some(mut field) = multipart
    .try_next()
    .await
    .map_err(|e| AppError::Validation(format!("Invalid multipart request: {}", e)))?
  {
    let name = field.name().unwrap_or_default().to_string();
    let file_name = field
      .content_disposition()
      .and_then(|cd| cd.get_filename())
      .map(str::to_string);

    if name == "image" {
      let bytes = read_field_bytes(&mut field, MAX_IMAGE_SIZE).await?;
      // A file input left blank arrives as an empty part without a file name.
      match file_name.filter(|f| !f.is_empty()) {
        Some(file_name) => image = Some(UploadedImage { file_name, bytes }),
        None if bytes.is_empty() => {}
        None => return Err(AppError::Validation("Image upload is missing a file name".to_string())),
      }
      continue;
    }

    let bytes = read_field_bytes(&mut field, MAX_TEXT_FIELD_SIZE).await?;
    let value = String::from_utf8(bytes)
      .map_err(|_| AppError::Validation(format!("Field '{}' is not valid UTF-8", name)))?;
    match name.as_str() {
      "id" => fields.id = Some(value),
      "name" => fields.name = Some(value),
      "price" => fields.price = Some(value),
      "description" => fields.description = Some(value),
      "quantity" => fields.quantity = Some(value),
      _ => tracing::debug!(field = %name, "Ignoring unknown form field."),
    }
  }

  fields.into_form(image)
}
