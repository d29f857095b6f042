// eshop-server/src/services/catalog.rs

use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::images::{ImageStore, UploadedImage};
use crate::errors::{AppError, Result};
use crate::models::{Product, ProductDraft, ProductListing, DEFAULT_IMAGE_PATH};
use crate::store::CatalogStore;

pub(crate) fn product_not_found(id: i32) -> AppError {
  AppError::NotFound(format!("Product with ID {} not found.", id))
}

/// Product CRUD together with the image files products point at.
#[derive(Clone)]
pub struct CatalogService {
  store: Arc<dyn CatalogStore>,
  images: ImageStore,
}

impl CatalogService {
  pub fn new(store: Arc<dyn CatalogStore>, images: ImageStore) -> Self {
    Self { store, images }
  }

  pub fn store(&self) -> &Arc<dyn CatalogStore> {
    &self.store
  }

  pub async fn list(&self) -> Result<Vec<ProductListing>> {
    let products = self.store.list_products().await?;
    Ok(products.into_iter().map(ProductListing::from).collect())
  }

  pub async fn get(&self, id: i32) -> Result<Product> {
    self.store.get_product(id).await?.ok_or_else(|| product_not_found(id))
  }

  #[instrument(name = "CatalogService::create", skip_all, fields(name = %draft.name))]
  pub async fn create(&self, draft: ProductDraft, image: Option<UploadedImage>) -> Result<Product> {
    let image_path = match &image {
      Some(image) => self.images.save(image).await?,
      None => DEFAULT_IMAGE_PATH.to_string(),
    };

    match self.store.insert_product(&draft, &image_path).await {
      Ok(product) => {
        info!(product_id = product.id, "Product created.");
        Ok(product)
      }
      Err(e) => {
        self.discard_image(&image_path).await;
        Err(e)
      }
    }
  }

  /// `body_id` is the id carried in the request body, if any; it must match `id`.
  #[instrument(name = "CatalogService::update", skip(self, draft, image))]
  pub async fn update(
    &self,
    id: i32,
    body_id: Option<i32>,
    draft: ProductDraft,
    image: Option<UploadedImage>,
  ) -> Result<Product> {
    if body_id.is_some_and(|body_id| body_id != id) {
      return Err(AppError::Validation("Product ID mismatch.".to_string()));
    }
    let existing = self.get(id).await?;

    let new_image_path = match &image {
      Some(image) => Some(self.images.save(image).await?),
      None => None,
    };

    let updated = match self.store.update_product(id, &draft, new_image_path.as_deref()).await {
      Ok(Some(product)) => product,
      Ok(None) => {
        if let Some(path) = &new_image_path {
          self.discard_image(path).await;
        }
        return Err(product_not_found(id));
      }
      Err(e) => {
        if let Some(path) = &new_image_path {
          self.discard_image(path).await;
        }
        return Err(e);
      }
    };

    if new_image_path.is_some() {
      if let Some(old_path) = existing.image_path.as_deref() {
        self.discard_image(old_path).await;
      }
    }
    info!("Product updated.");
    Ok(updated)
  }

  #[instrument(name = "CatalogService::delete", skip(self))]
  pub async fn delete(&self, id: i32) -> Result<()> {
    let removed = self.store.delete_product(id).await?.ok_or_else(|| product_not_found(id))?;
    if let Some(path) = removed.image_path.as_deref() {
      self.discard_image(path).await;
    }
    info!("Product deleted.");
    Ok(())
  }

  /// Best-effort removal; the record change has already happened.
  async fn discard_image(&self, path: &str) {
    if let Err(e) = self.images.delete(path).await {
      warn!(path, error = %e, "Failed to delete product image.");
    }
  }
}
