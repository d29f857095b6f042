// eshop-server/src/web/handlers/mod.rs

pub mod contact_handlers;
pub mod order_handlers;
pub mod product_form;
pub mod product_handlers;
