// eshop-server/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::models::OrderRequest;
use crate::pipelines::order_pipeline;
use crate::state::AppState;

#[instrument(name = "handler::create_order", skip(app_state, req_body))]
pub async fn create_order_handler(
  app_state: web::Data<AppState>,
  req_body: web::Json<OrderRequest>,
) -> Result<HttpResponse, AppError> {
  let placement = order_pipeline::create_order(app_state.get_ref(), req_body.into_inner()).await?;
  let order_id = placement.order.id;

  match &placement.notification_error {
    None => info!(order_id, "Order created and confirmation sent."),
    Some(reason) => warn!(order_id, %reason, "Order created; confirmation email failed."),
  }

  Ok(
    HttpResponse::Created()
      .insert_header(("Location", format!("/api/order/{}", order_id)))
      .json(json!({
        "orderId": order_id,
        "notificationError": placement.notification_error,
      })),
  )
}

#[instrument(name = "handler::get_order", skip(app_state, path), fields(order_id = %path.as_ref()))]
pub async fn get_order_handler(app_state: web::Data<AppState>, path: web::Path<i32>) -> Result<HttpResponse, AppError> {
  let order = order_pipeline::get_order(app_state.get_ref(), path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(order))
}

#[instrument(name = "handler::list_orders", skip(app_state))]
pub async fn list_orders_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let orders = order_pipeline::list_orders(app_state.get_ref()).await?;
  info!("Successfully fetched {} orders.", orders.len());
  Ok(HttpResponse::Ok().json(orders))
}
