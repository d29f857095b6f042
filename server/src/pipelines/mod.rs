// eshop-server/src/pipelines/mod.rs

//! Defines and registers the pipelines used by the shop.

use crate::errors::AppError;
use eshop_flow::Registry;
use std::sync::Arc;

pub mod common_steps;
pub mod contexts;
pub mod order_pipeline;

/// Registers every pipeline with `registry`. Called once at startup.
pub fn register_all_pipelines(registry: &Arc<Registry<AppError>>) {
  tracing::info!("Registering pipelines...");

  order_pipeline::register_order_pipeline(registry);

  tracing::info!("All application pipelines registered.");
}
