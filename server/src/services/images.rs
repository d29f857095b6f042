// eshop-server/src/services/images.rs

//! Product image files under the upload directory.
//!
//! Stored paths are web-relative (`/uploads/<name>`) and are served from the
//! upload directory by the static file service.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::models::DEFAULT_IMAGE_PATH;

/// Maximum accepted upload size (5MB).
pub const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;

pub const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Web prefix under which the upload directory is served.
pub const UPLOADS_PREFIX: &str = "/uploads";

/// An image received with a create or update request.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedImage {
  pub file_name: String,
  pub bytes: Vec<u8>,
}

impl UploadedImage {
  /// The lowercased extension of the client file name, if it is a supported image format.
  fn extension(&self) -> Result<String> {
    let ext = Path::new(&self.file_name)
      .extension()
      .and_then(|ext| ext.to_str())
      .map(str::to_ascii_lowercase)
      .ok_or_else(|| AppError::Validation(format!("Invalid file extension for: {}", self.file_name)))?;
    if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
      return Err(AppError::Validation(format!(
        "Unsupported file format '{}'. Supported: {}",
        ext,
        SUPPORTED_FORMATS.join(", ")
      )));
    }
    Ok(ext)
  }
}

#[derive(Debug, Clone)]
pub struct ImageStore {
  root: PathBuf,
}

impl ImageStore {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn is_default(path: &str) -> bool {
    path == DEFAULT_IMAGE_PATH
  }

  /// Writes the image under a generated name and returns its web path.
  #[instrument(name = "ImageStore::save", skip_all, fields(file_name = %image.file_name, size = image.bytes.len()))]
  pub async fn save(&self, image: &UploadedImage) -> Result<String> {
    if image.bytes.is_empty() {
      return Err(AppError::Validation("Empty file provided".to_string()));
    }
    if image.bytes.len() > MAX_IMAGE_SIZE {
      return Err(AppError::Validation(format!(
        "File too large. Maximum size is {}MB",
        MAX_IMAGE_SIZE / 1024 / 1024
      )));
    }
    let ext = image.extension()?;

    tokio::fs::create_dir_all(&self.root).await?;
    let file_name = format!("{}.{}", Uuid::new_v4(), ext);
    tokio::fs::write(self.root.join(&file_name), &image.bytes).await?;

    let web_path = format!("{}/{}", UPLOADS_PREFIX, file_name);
    info!(%web_path, "Image stored.");
    Ok(web_path)
  }

  /// Removes a previously stored image. The default image, foreign paths and
  /// files that are already gone are left alone.
  #[instrument(name = "ImageStore::delete", skip(self))]
  pub async fn delete(&self, web_path: &str) -> Result<()> {
    if Self::is_default(web_path) {
      return Ok(());
    }
    let Some(file_path) = self.resolve(web_path) else {
      warn!("Image path outside the upload directory, not deleting.");
      return Ok(());
    };
    match tokio::fs::remove_file(&file_path).await {
      Ok(()) => {
        info!("Image deleted.");
        Ok(())
      }
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
      Err(e) => Err(e.into()),
    }
  }

  /// Maps `/uploads/<name>` to a file directly inside the upload directory.
  fn resolve(&self, web_path: &str) -> Option<PathBuf> {
    let name = web_path.strip_prefix(UPLOADS_PREFIX)?.strip_prefix('/')?;
    let is_plain_name = !name.is_empty() && !name.contains(['/', '\\']) && name != "." && name != "..";
    is_plain_name.then(|| self.root.join(name))
  }
}
