// eshop-server/src/pipelines/common_steps.rs

use crate::pipelines::contexts::SendOrderConfirmationEmailCtxData;
use crate::services::mailer::order_confirmation_email;
use eshop_flow::{ContextData, FlowError, FlowResult, PipelineControl};
use tracing::{info, instrument, warn};

#[instrument(name = "common_step::send_order_confirmation", skip(ctx_data), err)]
pub async fn send_order_confirmation_email_step(
  ctx_data: ContextData<SendOrderConfirmationEmailCtxData>,
) -> FlowResult<PipelineControl> {
  let (email, mailer, order_id) = {
    let guard = ctx_data.read();
    info!(
      "Attempting to send order confirmation for order {} to {}",
      guard.order.id, guard.order.customer_email
    );
    let email = order_confirmation_email(&guard.order, &guard.receipt_path, &guard.app_state.config.shop_name);
    (email, guard.app_state.mailer.clone(), guard.order.id)
  }; // guard dropped

  match mailer.send(&email).await {
    Ok(sent_info) => {
      info!(
        "Order confirmation email sent successfully to {}. Message ID: {}",
        sent_info.to, sent_info.message_id
      );
      ctx_data.write().message_id = Some(sent_info.message_id);
      Ok(PipelineControl::Continue)
    }
    Err(e) => {
      warn!(
        "Failed to send order confirmation email for order {} to {}: {}",
        order_id, email.to, e
      );
      Err(FlowError::HandlerError {
        source: anyhow::Error::new(e),
      })
    }
  }
}
