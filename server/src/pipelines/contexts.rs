// eshop-server/src/pipelines/contexts.rs

//! Data structs the pipelines operate on, wrapped in `eshop_flow::ContextData`.

use std::path::PathBuf;

use crate::models::{NewOrder, Order, OrderRequest, Product};
use crate::state::AppState;

#[derive(Clone)]
pub struct PlaceOrderCtxData {
  pub app_state: AppState,
  pub request: OrderRequest,
  /// One entry per request line, in line order.
  pub resolved_products: Vec<Product>,
  pub new_order: Option<NewOrder>,
  pub placed_order: Option<Order>,
  pub receipt_path: Option<PathBuf>,
  pub notification_error: Option<String>,
}

impl PlaceOrderCtxData {
  pub fn new(app_state: AppState, request: OrderRequest) -> Self {
    Self {
      app_state,
      request,
      resolved_products: Vec::new(),
      new_order: None,
      placed_order: None,
      receipt_path: None,
      notification_error: None,
    }
  }
}

#[derive(Clone)]
pub struct SendOrderConfirmationEmailCtxData {
  pub app_state: AppState,
  pub order: Order,
  pub receipt_path: PathBuf,
  pub message_id: Option<String>,
}
