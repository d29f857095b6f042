// eshop-server/src/services/mod.rs

pub mod catalog;
pub mod images;
pub mod mailer;
pub mod receipts;

pub use catalog::CatalogService;
pub use images::{ImageStore, UploadedImage};
pub use mailer::{MockMailer, NotificationSender, OutgoingEmail, SentEmail};
pub use receipts::{ReceiptRenderer, TextReceiptRenderer};
