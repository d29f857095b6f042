// eshop-server/src/main.rs

use actix_web::{web, App, HttpServer};
use eshop_server::config::AppConfig;
use eshop_server::errors::AppError;
use std::io;

fn to_io_error(context: &str, e: AppError) -> io::Error {
  tracing::error!(error = %e, "{}", context);
  io::Error::other(format!("{}: {}", context, e))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
  let app_config = match AppConfig::from_env() {
    Ok(cfg) => cfg,
    Err(e) => {
      eprintln!("Failed to load application configuration: {}", e);
      return Err(io::Error::new(io::ErrorKind::InvalidInput, e.to_string()));
    }
  };
  eshop_server::init_tracing(app_config.log_format);
  tracing::info!("Starting shop server...");

  std::fs::create_dir_all(&app_config.upload_dir)?;
  let server_address = app_config.bind_address();

  let app_state = eshop_server::build_state(app_config)
    .await
    .map_err(|e| to_io_error("Failed to initialize application state", e))?;
  let upload_dir = app_state.config.upload_dir.clone();

  tracing::info!("Attempting to bind server to {}...", server_address);
  HttpServer::new(move || {
    let upload_dir = upload_dir.clone();
    App::new()
      .app_data(web::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(move |cfg| eshop_server::web::configure_app_routes(cfg, &upload_dir))
  })
  .bind(&server_address)?
  .run()
  .await
}
