// eshop-server/src/web/routes.rs

use actix_web::{error, web, HttpRequest, HttpResponse};
use std::path::Path;

use crate::errors::AppError;
use crate::services::images::UPLOADS_PREFIX;
use crate::web::handlers::{contact_handlers, order_handlers, product_handlers};

async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> error::Error {
  AppError::Validation(format!("Invalid JSON body: {}", err)).into()
}

fn form_error_handler(err: error::UrlencodedError, _req: &HttpRequest) -> error::Error {
  AppError::Validation(format!("Invalid form data: {}", err)).into()
}

fn path_error_handler(err: error::PathError, _req: &HttpRequest) -> error::Error {
  AppError::Validation(format!("Invalid path parameter: {}", err)).into()
}

/// Registers every route. `upload_dir` is served read-only under `/uploads`.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig, upload_dir: &Path) {
  cfg
    .app_data(web::JsonConfig::default().error_handler(json_error_handler))
    .app_data(web::FormConfig::default().error_handler(form_error_handler))
    .app_data(web::PathConfig::default().error_handler(path_error_handler))
    .route("/health", web::get().to(health_check_handler))
    .route("/contact", web::post().to(contact_handlers::submit_contact_handler))
    .service(
      web::scope("/api")
        .service(
          web::scope("/products")
            .route("", web::get().to(product_handlers::list_products_handler))
            .route("", web::post().to(product_handlers::create_product_handler))
            .route("/{product_id}", web::get().to(product_handlers::get_product_handler))
            .route("/{product_id}", web::put().to(product_handlers::update_product_handler))
            .route("/{product_id}", web::delete().to(product_handlers::delete_product_handler)),
        )
        .service(
          web::scope("/order")
            .route("", web::get().to(order_handlers::list_orders_handler))
            .route("", web::post().to(order_handlers::create_order_handler))
            .route("/{order_id}", web::get().to(order_handlers::get_order_handler)),
        ),
    )
    .service(actix_files::Files::new(UPLOADS_PREFIX, upload_dir));
}
