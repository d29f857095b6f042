// eshop-server/src/store/postgres.rs

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashMap;
use tracing::{event, info, instrument, Level};

use super::{product_in_use, CatalogStore, OrderStore};
use crate::errors::{AppError, Result};
use crate::models::{NewOrder, Order, OrderItem, Product, ProductDraft};

const PRODUCT_COLUMNS: &str = "id, name, price, description, quantity, image_path";
const ORDER_COLUMNS: &str =
  "id, customer_name, customer_email, customer_phone, street, city, postal_code, country, total, order_date";
const ORDER_ITEM_COLUMNS: &str = "id, order_id, product_id, quantity, price";

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

#[derive(Debug, Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  pub async fn connect(database_url: &str) -> Result<Self> {
    let pool = PgPoolOptions::new().max_connections(10).connect(database_url).await?;
    info!("Successfully connected to the database.");
    Ok(Self::new(pool))
  }

  pub async fn run_migrations(&self) -> Result<()> {
    MIGRATOR.run(&self.pool).await?;
    info!("Database migrations applied.");
    Ok(())
  }

  /// Fills in `items` (and each item's `product`) for the given orders.
  async fn hydrate(&self, mut orders: Vec<Order>) -> Result<Vec<Order>> {
    if orders.is_empty() {
      return Ok(orders);
    }
    let order_ids: Vec<i32> = orders.iter().map(|o| o.id).collect();

    let items = sqlx::query_as::<_, OrderItem>(&format!(
      "SELECT {} FROM order_items WHERE order_id = ANY($1) ORDER BY id",
      ORDER_ITEM_COLUMNS
    ))
    .bind(&order_ids)
    .fetch_all(&self.pool)
    .await?;

    let mut product_ids: Vec<i32> = items.iter().map(|i| i.product_id).collect();
    product_ids.sort_unstable();
    product_ids.dedup();
    let products: HashMap<i32, Product> = sqlx::query_as::<_, Product>(&format!(
      "SELECT {} FROM products WHERE id = ANY($1)",
      PRODUCT_COLUMNS
    ))
    .bind(&product_ids)
    .fetch_all(&self.pool)
    .await?
    .into_iter()
    .map(|p| (p.id, p))
    .collect();

    let mut by_order: HashMap<i32, Vec<OrderItem>> = HashMap::new();
    for mut item in items {
      item.product = products.get(&item.product_id).cloned();
      by_order.entry(item.order_id).or_default().push(item);
    }
    for order in &mut orders {
      order.items = by_order.remove(&order.id).unwrap_or_default();
    }
    Ok(orders)
  }
}

async fn decrement_stock(tx: &mut Transaction<'_, Postgres>, product_id: i32, quantity: i32) -> Result<Product> {
  sqlx::query_as::<_, Product>(&format!(
    "UPDATE products SET quantity = quantity - $1 WHERE id = $2 RETURNING {}",
    PRODUCT_COLUMNS
  ))
  .bind(quantity)
  .bind(product_id)
  .fetch_optional(&mut **tx)
  .await?
  .ok_or_else(|| AppError::NotFound(format!("Product with ID {} not found.", product_id)))
}

#[async_trait]
impl CatalogStore for PgStore {
  async fn list_products(&self) -> Result<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(&format!("SELECT {} FROM products ORDER BY id", PRODUCT_COLUMNS))
      .fetch_all(&self.pool)
      .await?;
    Ok(products)
  }

  async fn get_product(&self, id: i32) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS))
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(product)
  }

  async fn insert_product(&self, draft: &ProductDraft, image_path: &str) -> Result<Product> {
    let product = sqlx::query_as::<_, Product>(&format!(
      "INSERT INTO products (name, price, description, quantity, image_path) \
       VALUES ($1, $2, $3, $4, $5) RETURNING {}",
      PRODUCT_COLUMNS
    ))
    .bind(&draft.name)
    .bind(draft.price)
    .bind(&draft.description)
    .bind(draft.quantity)
    .bind(image_path)
    .fetch_one(&self.pool)
    .await?;
    Ok(product)
  }

  async fn update_product(&self, id: i32, draft: &ProductDraft, image_path: Option<&str>) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!(
      "UPDATE products SET name = $2, price = $3, description = $4, quantity = $5, \
       image_path = COALESCE($6, image_path) WHERE id = $1 RETURNING {}",
      PRODUCT_COLUMNS
    ))
    .bind(id)
    .bind(&draft.name)
    .bind(draft.price)
    .bind(&draft.description)
    .bind(draft.quantity)
    .bind(image_path)
    .fetch_optional(&self.pool)
    .await?;
    Ok(product)
  }

  async fn delete_product(&self, id: i32) -> Result<Option<Product>> {
    let result = sqlx::query_as::<_, Product>(&format!("DELETE FROM products WHERE id = $1 RETURNING {}", PRODUCT_COLUMNS))
      .bind(id)
      .fetch_optional(&self.pool)
      .await;
    match result {
      Ok(product) => Ok(product),
      Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => Err(product_in_use(id)),
      Err(e) => Err(e.into()),
    }
  }
}

#[async_trait]
impl OrderStore for PgStore {
  #[instrument(name = "PgStore::place_order", skip_all, fields(items = order.items.len()))]
  async fn place_order(&self, order: NewOrder) -> Result<Order> {
    let mut tx = self.pool.begin().await?;

    let mut stored = sqlx::query_as::<_, Order>(&format!(
      "INSERT INTO orders (customer_name, customer_email, customer_phone, street, city, postal_code, country, total, order_date) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {}",
      ORDER_COLUMNS
    ))
    .bind(&order.customer_name)
    .bind(&order.customer_email)
    .bind(&order.customer_phone)
    .bind(&order.street)
    .bind(&order.city)
    .bind(&order.postal_code)
    .bind(&order.country)
    .bind(order.total)
    .bind(order.order_date)
    .fetch_one(&mut *tx)
    .await?;

    for new_item in &order.items {
      // Dropping `tx` on error rolls everything back.
      let product = decrement_stock(&mut tx, new_item.product_id, new_item.quantity).await?;
      let mut item = sqlx::query_as::<_, OrderItem>(&format!(
        "INSERT INTO order_items (order_id, product_id, quantity, price) VALUES ($1, $2, $3, $4) RETURNING {}",
        ORDER_ITEM_COLUMNS
      ))
      .bind(stored.id)
      .bind(new_item.product_id)
      .bind(new_item.quantity)
      .bind(new_item.price)
      .fetch_one(&mut *tx)
      .await?;
      item.product = Some(product);
      stored.items.push(item);
    }

    tx.commit().await?;
    event!(Level::INFO, order_id = stored.id, "Order committed.");
    Ok(stored)
  }

  async fn get_order(&self, id: i32) -> Result<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(&format!("SELECT {} FROM orders WHERE id = $1", ORDER_COLUMNS))
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;
    match order {
      Some(order) => Ok(self.hydrate(vec![order]).await?.pop()),
      None => Ok(None),
    }
  }

  async fn list_orders(&self) -> Result<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>(&format!(
      "SELECT {} FROM orders ORDER BY order_date DESC, id DESC",
      ORDER_COLUMNS
    ))
    .fetch_all(&self.pool)
    .await?;
    self.hydrate(orders).await
  }
}
