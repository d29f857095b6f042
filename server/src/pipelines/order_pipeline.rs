// eshop-server/src/pipelines/order_pipeline.rs

//! Order placement: validate, resolve products, build the aggregate, persist it
//! with its stock decrements, render the receipt, then notify the customer.

use chrono::Utc;
use eshop_flow::{ContextData, FlowError, Pipeline, PipelineControl, PipelineResult, Registry};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{event, info, instrument, warn, Level};

use crate::errors::{AppError, Result};
use crate::models::{NewOrder, Order, OrderRequest};
use crate::pipelines::common_steps;
use crate::pipelines::contexts::{PlaceOrderCtxData, SendOrderConfirmationEmailCtxData};
use crate::services::catalog::product_not_found;
use crate::services::receipts::receipt_path_for;
use crate::state::AppState;

/// What a successful order placement produced.
#[derive(Debug, Clone)]
pub struct OrderPlacement {
  pub order: Order,
  pub receipt_path: PathBuf,
  /// Set when the confirmation email could not be sent. The order stands regardless.
  pub notification_error: Option<String>,
}

pub fn order_not_found(id: i32) -> AppError {
  AppError::NotFound(format!("Order with ID {} not found.", id))
}

pub fn build_order_pipeline() -> Pipeline<PlaceOrderCtxData, AppError> {
  let mut p = Pipeline::<PlaceOrderCtxData, AppError>::new(&[
    ("validate_order_request", false, None),
    ("resolve_order_products", false, None),
    ("build_order_aggregate", false, None),
    ("persist_order", false, None),
    ("render_order_receipt", false, None),
    ("send_order_confirmation", true, None), // Best-effort
  ]);

  p.on_root("validate_order_request", validate_order_request);
  p.on_root("resolve_order_products", resolve_order_products);
  p.on_root("build_order_aggregate", build_order_aggregate);
  p.on_root("persist_order", persist_order);
  p.on_root("render_order_receipt", render_order_receipt);
  p.on_root("send_order_confirmation", send_order_confirmation);
  p
}

/// Registers the order placement pipeline with the registry.
pub fn register_order_pipeline(registry: &Arc<Registry<AppError>>) {
  registry.register_pipeline(build_order_pipeline());
  info!("Order placement pipeline registered.");
}

// --- Steps ---

async fn validate_order_request(ctx_data: ContextData<PlaceOrderCtxData>) -> Result<PipelineControl> {
  let guard = ctx_data.read();
  guard.request.validate()?;
  if let Some(note) = guard.request.message.as_deref().filter(|m| !m.trim().is_empty()) {
    info!(note, "Order submitted with a customer note.");
  }
  event!(Level::DEBUG, lines = guard.request.lines().len(), "Order request is valid.");
  Ok(PipelineControl::Continue)
}

async fn resolve_order_products(ctx_data: ContextData<PlaceOrderCtxData>) -> Result<PipelineControl> {
  let (product_ids, catalog) = {
    let guard = ctx_data.read();
    let ids: Vec<i32> = guard.request.lines().iter().map(|line| line.id).collect();
    (ids, guard.app_state.catalog.store().clone())
  }; // guard dropped

  let mut resolved = Vec::with_capacity(product_ids.len());
  for id in product_ids {
    match catalog.get_product(id).await? {
      Some(product) => resolved.push(product),
      None => {
        warn!(product_id = id, "Order references an unknown product.");
        return Err(product_not_found(id));
      }
    }
  }

  ctx_data.write().resolved_products = resolved;
  Ok(PipelineControl::Continue)
}

async fn build_order_aggregate(ctx_data: ContextData<PlaceOrderCtxData>) -> Result<PipelineControl> {
  let mut guard = ctx_data.write();
  let new_order = NewOrder::from_request(&guard.request, &guard.resolved_products, Utc::now())?;
  event!(Level::DEBUG, total = %new_order.total, items = new_order.items.len(), "Order aggregate built.");
  guard.new_order = Some(new_order);
  Ok(PipelineControl::Continue)
}

async fn persist_order(ctx_data: ContextData<PlaceOrderCtxData>) -> Result<PipelineControl> {
  let (new_order, orders) = {
    let mut guard = ctx_data.write();
    let new_order = guard
      .new_order
      .take()
      .ok_or_else(|| AppError::Internal("Order aggregate missing before persistence.".to_string()))?;
    (new_order, guard.app_state.orders.clone())
  }; // guard dropped

  let order = orders.place_order(new_order).await?;
  info!(order_id = order.id, total = %order.total, "Order placed.");
  ctx_data.write().placed_order = Some(order);
  Ok(PipelineControl::Continue)
}

async fn render_order_receipt(ctx_data: ContextData<PlaceOrderCtxData>) -> Result<PipelineControl> {
  let (order, renderer, receipt_dir) = {
    let guard = ctx_data.read();
    let order = guard
      .placed_order
      .clone()
      .ok_or_else(|| AppError::Internal("Placed order missing before receipt rendering.".to_string()))?;
    (order, guard.app_state.receipts.clone(), guard.app_state.config.receipt_dir.clone())
  }; // guard dropped

  let path = receipt_path_for(&receipt_dir, order.id);
  // The order is already committed; a rendering failure does not undo it.
  if let Err(e) = renderer.render(&path, &order).await {
    event!(Level::ERROR, order_id = order.id, error = %e, "Receipt rendering failed after commit.");
    return Err(AppError::Internal(format!(
      "Order {} was placed but its receipt could not be generated: {}",
      order.id, e
    )));
  }
  ctx_data.write().receipt_path = Some(path);
  Ok(PipelineControl::Continue)
}

async fn send_order_confirmation(ctx_data: ContextData<PlaceOrderCtxData>) -> Result<PipelineControl> {
  let email_ctx = {
    let guard = ctx_data.read();
    match (&guard.placed_order, &guard.receipt_path) {
      (Some(order), Some(receipt_path)) => SendOrderConfirmationEmailCtxData {
        app_state: guard.app_state.clone(),
        order: order.clone(),
        receipt_path: receipt_path.clone(),
        message_id: None,
      },
      _ => return Err(AppError::Internal("Order confirmation attempted before the receipt was rendered.".to_string())),
    }
  }; // guard dropped

  if let Err(e) = common_steps::send_order_confirmation_email_step(ContextData::new(email_ctx)).await {
    let reason = match e {
      FlowError::HandlerError { source } => source.to_string(),
      other => other.to_string(),
    };
    warn!(%reason, "Order confirmation not delivered; order stands.");
    ctx_data.write().notification_error = Some(reason);
  }
  Ok(PipelineControl::Continue)
}

// --- Entry points ---

/// Runs the order placement pipeline for `request`.
#[instrument(name = "orders::create_order", skip_all, fields(customer = %request.customer_name))]
pub async fn create_order(app_state: &AppState, request: OrderRequest) -> Result<OrderPlacement> {
  let ctx_data = ContextData::new(PlaceOrderCtxData::new(app_state.clone(), request));

  match app_state.flow.run(ctx_data.clone()).await? {
    PipelineResult::Completed => {
      let mut guard = ctx_data.write();
      let order = guard
        .placed_order
        .take()
        .ok_or_else(|| AppError::Internal("Order pipeline completed without an order.".to_string()))?;
      let receipt_path = guard
        .receipt_path
        .take()
        .ok_or_else(|| AppError::Internal("Order pipeline completed without a receipt.".to_string()))?;
      Ok(OrderPlacement {
        order,
        receipt_path,
        notification_error: guard.notification_error.take(),
      })
    }
    PipelineResult::Stopped => {
      warn!("Order pipeline stopped before completion.");
      Err(AppError::Internal("Order placement did not complete.".to_string()))
    }
  }
}

pub async fn get_order(app_state: &AppState, id: i32) -> Result<Order> {
  app_state.orders.get_order(id).await?.ok_or_else(|| order_not_found(id))
}

pub async fn list_orders(app_state: &AppState) -> Result<Vec<Order>> {
  app_state.orders.list_orders().await
}
