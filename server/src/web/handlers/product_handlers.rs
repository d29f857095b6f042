// eshop-server/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpRequest, HttpResponse};
use tracing::{info, instrument};

use super::product_form::read_product_form;
use crate::errors::AppError;
use crate::state::AppState;

#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let products = app_state.catalog.list().await?;
  info!("Successfully fetched {} products.", products.len());
  Ok(HttpResponse::Ok().json(products))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
  let product = app_state.catalog.get(path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(product))
}

#[instrument(name = "handler::create_product", skip_all)]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  payload: web::Payload,
) -> Result<HttpResponse, AppError> {
  let form = read_product_form(&req, payload).await?;
  let product = app_state.catalog.create(form.draft, form.image).await?;
  info!(product_id = product.id, "Product {} created.", product.name);
  Ok(
    HttpResponse::Created()
      .insert_header(("Location", format!("/api/products/{}", product.id)))
      .json(product),
  )
}

#[instrument(name = "handler::update_product", skip(app_state, req, payload, path), fields(product_id = %path.as_ref()))]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i32>,
  req: HttpRequest,
  payload: web::Payload,
) -> Result<HttpResponse, AppError> {
  let id = path.into_inner();
  let form = read_product_form(&req, payload).await?;
  app_state.catalog.update(id, form.body_id, form.draft, form.image).await?;
  Ok(HttpResponse::NoContent().finish())
}

#[instrument(name = "handler::delete_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
  app_state.catalog.delete(path.into_inner()).await?;
  Ok(HttpResponse::NoContent().finish())
}
