// eshop-server/src/store/memory.rs

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

use super::{product_in_use, CatalogStore, OrderStore};
use crate::errors::{AppError, Result};
use crate::models::{NewOrder, Order, OrderItem, Product, ProductDraft};

#[derive(Debug, Default)]
struct Tables {
  products: BTreeMap<i32, Product>,
  orders: BTreeMap<i32, Order>,
  next_product_id: i32,
  next_order_id: i32,
  next_item_id: i32,
}

impl Tables {
  fn next_id(counter: &mut i32) -> i32 {
    *counter += 1;
    *counter
  }

  fn hydrate(&self, order: &Order) -> Order {
    let mut order = order.clone();
    for item in &mut order.items {
      item.product = self.products.get(&item.product_id).cloned();
    }
    order
  }
}

/// In-process store with the same semantics as [`super::PgStore`].
///
/// A single lock guards all tables, so `place_order` is atomic.
#[derive(Debug, Default)]
pub struct MemoryStore {
  tables: RwLock<Tables>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Seeds products as given, keeping their ids.
  pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
    let store = Self::new();
    {
      let mut tables = store.tables.write();
      for product in products {
        tables.next_product_id = tables.next_product_id.max(product.id);
        tables.products.insert(product.id, product);
      }
    }
    store
  }
}

#[async_trait]
impl CatalogStore for MemoryStore {
  async fn list_products(&self) -> Result<Vec<Product>> {
    Ok(self.tables.read().products.values().cloned().collect())
  }

  async fn get_product(&self, id: i32) -> Result<Option<Product>> {
    Ok(self.tables.read().products.get(&id).cloned())
  }

  async fn insert_product(&self, draft: &ProductDraft, image_path: &str) -> Result<Product> {
    let mut tables = self.tables.write();
    let id = Tables::next_id(&mut tables.next_product_id);
    let product = Product {
      id,
      name: draft.name.clone(),
      price: draft.price,
      description: draft.description.clone(),
      quantity: draft.quantity,
      image_path: Some(image_path.to_string()),
    };
    tables.products.insert(id, product.clone());
    Ok(product)
  }

  async fn update_product(&self, id: i32, draft: &ProductDraft, image_path: Option<&str>) -> Result<Option<Product>> {
    let mut tables = self.tables.write();
    let Some(product) = tables.products.get_mut(&id) else {
      return Ok(None);
    };
    product.name = draft.name.clone();
    product.price = draft.price;
    product.description = draft.description.clone();
    product.quantity = draft.quantity;
    if let Some(path) = image_path {
      product.image_path = Some(path.to_string());
    }
    Ok(Some(product.clone()))
  }

  async fn delete_product(&self, id: i32) -> Result<Option<Product>> {
    let mut tables = self.tables.write();
    let referenced = tables
      .orders
      .values()
      .any(|order| order.items.iter().any(|item| item.product_id == id));
    if referenced {
      return Err(product_in_use(id));
    }
    Ok(tables.products.remove(&id))
  }
}

#[async_trait]
impl OrderStore for MemoryStore {
  async fn place_order(&self, order: NewOrder) -> Result<Order> {
    let mut tables = self.tables.write();

    // Work out every new stock level before touching anything.
    let mut new_stock: HashMap<i32, i32> = HashMap::new();
    for item in &order.items {
      let current = match new_stock.get(&item.product_id) {
        Some(quantity) => *quantity,
        None => tables
          .products
          .get(&item.product_id)
          .map(|p| p.quantity)
          .ok_or_else(|| AppError::NotFound(format!("Product with ID {} not found.", item.product_id)))?,
      };
      let remaining = current.checked_sub(item.quantity).ok_or_else(|| {
        AppError::Internal(format!("Stock for product {} is out of range.", item.product_id))
      })?;
      new_stock.insert(item.product_id, remaining);
    }

    for (product_id, quantity) in new_stock {
      if let Some(product) = tables.products.get_mut(&product_id) {
        product.quantity = quantity;
      }
    }

    let order_id = Tables::next_id(&mut tables.next_order_id);
    let mut items = Vec::with_capacity(order.items.len());
    for new_item in &order.items {
      let item_id = Tables::next_id(&mut tables.next_item_id);
      items.push(OrderItem {
        id: item_id,
        order_id,
        product_id: new_item.product_id,
        quantity: new_item.quantity,
        price: new_item.price,
        product: None,
      });
    }

    let stored = Order {
      id: order_id,
      customer_name: order.customer_name,
      customer_email: order.customer_email,
      customer_phone: order.customer_phone,
      street: order.street,
      city: order.city,
      postal_code: order.postal_code,
      country: order.country,
      total: order.total,
      order_date: order.order_date,
      items,
    };
    tables.orders.insert(order_id, stored.clone());
    Ok(tables.hydrate(&stored))
  }

  async fn get_order(&self, id: i32) -> Result<Option<Order>> {
    let tables = self.tables.read();
    Ok(tables.orders.get(&id).map(|order| tables.hydrate(order)))
  }

  async fn list_orders(&self) -> Result<Vec<Order>> {
    let tables = self.tables.read();
    Ok(tables.orders.values().rev().map(|order| tables.hydrate(order)).collect())
  }
}
