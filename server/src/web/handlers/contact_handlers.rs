// eshop-server/src/web/handlers/contact_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::services::mailer::contact_email;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContactForm {
  pub name: String,
  pub email: String,
  pub subject: String,
  pub message: String,
}

impl ContactForm {
  fn is_complete(&self) -> bool {
    [&self.name, &self.email, &self.subject, &self.message]
      .iter()
      .all(|v| !v.trim().is_empty())
  }
}

#[instrument(name = "handler::submit_contact", skip(app_state, form))]
pub async fn submit_contact_handler(
  app_state: web::Data<AppState>,
  form: web::Form<ContactForm>,
) -> Result<HttpResponse, AppError> {
  let form = form.into_inner();
  if !form.is_complete() {
    warn!("Incomplete contact form submitted.");
    return Ok(HttpResponse::Ok().json(json!({
      "success": false,
      "message": "Please check the submitted details."
    })));
  }

  let email = contact_email(
    &app_state.config.contact_inbox,
    &form.name,
    &form.email,
    &form.subject,
    &form.message,
  );
  let sent = app_state.mailer.send(&email).await?;
  info!(message_id = %sent.message_id, "Contact message forwarded.");

  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "message": "Message sent successfully!"
  })))
}
