// eshop-server/src/services/mailer.rs

use async_trait::async_trait;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::errors::{AppError, Result};
use crate::models::Order;

/// A message handed to a [`NotificationSender`].
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
  pub to: String,
  pub subject: String,
  pub body: String,
  pub attachment: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentEmail {
  pub to: String,
  pub from: String,
  pub subject: String,
  pub body_preview: String,
  pub message_id: String,
}

#[async_trait]
pub trait NotificationSender: Send + Sync {
  async fn send(&self, email: &OutgoingEmail) -> Result<SentEmail>;
}

/// Logs messages instead of delivering them.
///
/// Fails for an empty recipient, and for any subject containing `fail_test`.
#[derive(Debug, Clone)]
pub struct MockMailer {
  sender: String,
  latency: Duration,
}

impl MockMailer {
  pub fn new(sender: impl Into<String>) -> Self {
    Self {
      sender: sender.into(),
      latency: Duration::from_millis(20),
    }
  }

  pub fn with_latency(mut self, latency: Duration) -> Self {
    self.latency = latency;
    self
  }
}

#[async_trait]
impl NotificationSender for MockMailer {
  async fn send(&self, email: &OutgoingEmail) -> Result<SentEmail> {
    info!(
      "Simulating sending email: To='{}', From='{}', Subject='{}'",
      email.to, self.sender, email.subject
    );
    tokio::time::sleep(self.latency).await;

    if email.to.trim().is_empty() {
      warn!("Refusing to send email without a recipient.");
      return Err(AppError::Notification("Recipient address is empty".to_string()));
    }
    if email.subject.to_lowercase().contains("fail_test") {
      warn!("Simulated email failure for subject: {}", email.subject);
      return Err(AppError::Notification("Simulated email send failure".to_string()));
    }

    let body_preview = email.body.chars().take(50).collect::<String>() + "...";
    let message_id = format!("mock_email_{}", uuid::Uuid::new_v4());
    info!(
      attachment = ?email.attachment,
      "Mock email sent successfully. Message ID: {}", message_id
    );

    Ok(SentEmail {
      to: email.to.clone(),
      from: self.sender.clone(),
      subject: email.subject.clone(),
      body_preview,
      message_id,
    })
  }
}

/// The confirmation sent to the customer once an order is placed.
pub fn order_confirmation_email(order: &Order, receipt_path: &Path, shop_name: &str) -> OutgoingEmail {
  let mut body = String::new();
  let _ = writeln!(body, "Dear {},", order.customer_name);
  let _ = writeln!(body);
  let _ = writeln!(body, "Thank you for your order #{} at {}.", order.id, shop_name);
  let _ = writeln!(body);
  let _ = writeln!(body, "Items:");
  for item in &order.items {
    let name = item.product.as_ref().map_or("Unknown product", |p| p.name.as_str());
    let _ = writeln!(
      body,
      "  {} x {} @ {:.2} = {:.2}",
      item.quantity,
      name,
      item.price,
      item.line_total()
    );
  }
  let _ = writeln!(body);
  let _ = writeln!(body, "Total: {:.2}", order.total);
  let _ = writeln!(body);
  let _ = writeln!(body, "Shipping to:");
  let _ = writeln!(body, "  {}", order.street);
  let _ = writeln!(body, "  {} {}", order.postal_code, order.city);
  let _ = writeln!(body, "  {}", order.country);
  let _ = writeln!(body);
  let _ = writeln!(body, "Your receipt is attached.");

  OutgoingEmail {
    to: order.customer_email.clone(),
    subject: format!("Order Confirmation - Order #{}", order.id),
    body,
    attachment: Some(receipt_path.to_path_buf()),
  }
}

/// A contact-form submission forwarded to the shop's inbox.
pub fn contact_email(inbox: &str, name: &str, email: &str, subject: &str, message: &str) -> OutgoingEmail {
  OutgoingEmail {
    to: inbox.to_string(),
    subject: subject.to_string(),
    body: format!("Name: {}\nEmail: {}\nMessage:\n{}", name, email, message),
    attachment: None,
  }
}
