// eshop-server/tests/catalog_api_tests.rs

#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use common::{multipart_body, multipart_content_type, product, shop};
use eshop_server::store::CatalogStore;
use serde_json::{json, Value};

fn file_for(shop: &common::TestShop, web_path: &str) -> std::path::PathBuf {
  shop.upload_dir().join(web_path.trim_start_matches("/uploads/"))
}

#[actix_web::test]
async fn health_check_reports_ok() {
  let shop = shop(vec![]);
  let app = init_app!(shop);
  let req = test::TestRequest::get().uri("/health").to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body, json!({ "status": "ok" }));
}

#[actix_web::test]
async fn list_and_get_products() {
  let mut no_text = product(2, "3.00", 1);
  no_text.description = None;
  no_text.image_path = None;
  let shop = shop(vec![product(1, "12.50", 5), no_text]);
  let app = init_app!(shop);

  let req = test::TestRequest::get().uri("/api/products").to_request();
  let list: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(list.as_array().map(Vec::len), Some(2));
  assert_eq!(list[0]["price"].as_f64(), Some(12.5));
  assert_eq!(list[1]["description"], "");
  assert_eq!(list[1]["imagePath"], "");

  let req = test::TestRequest::get().uri("/api/products/1").to_request();
  let one: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(one["name"], "Product 1");

  let req = test::TestRequest::get().uri("/api/products/77").to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "Product with ID 77 not found.");
}

#[actix_web::test]
async fn create_with_image_stores_and_serves_the_file() {
  let shop = shop(vec![]);
  let app = init_app!(shop);

  let body = multipart_body(
    &[("name", "Lamp"), ("price", "19.90"), ("description", "Warm light"), ("quantity", "4")],
    Some(("lamp.PNG", b"not-really-a-png".as_slice())),
  );
  let req = test::TestRequest::post()
    .uri("/api/products")
    .insert_header(multipart_content_type())
    .set_payload(body)
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let created: Value = test::read_body_json(resp).await;

  let image_path = created["imagePath"].as_str().unwrap().to_string();
  assert!(image_path.starts_with("/uploads/") && image_path.ends_with(".png"));
  assert!(file_for(&shop, &image_path).exists());
  assert_eq!(created["price"].as_f64(), Some(19.9));

  let req = test::TestRequest::get().uri(&image_path).to_request();
  let served = test::call_and_read_body(&app, req).await;
  assert_eq!(&served[..], b"not-really-a-png");
}

#[actix_web::test]
async fn create_without_image_uses_default_and_urlencoded_works() {
  let shop = shop(vec![]);
  let app = init_app!(shop);

  let req = test::TestRequest::post()
    .uri("/api/products")
    .set_form(json!({ "name": "Mug", "price": "5", "quantity": "10" }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let created: Value = test::read_body_json(resp).await;
  assert_eq!(created["imagePath"], "/uploads/default.jpg");
  assert!(created["description"].is_null());
}

#[actix_web::test]
async fn create_rejects_invalid_fields() {
  let shop = shop(vec![]);
  let app = init_app!(shop);

  for fields in [
    vec![("name", ""), ("price", "1"), ("quantity", "1")],
    vec![("name", "Mug"), ("price", "-1"), ("quantity", "1")],
    vec![("name", "Mug"), ("price", "abc"), ("quantity", "1")],
  ] {
    let req = test::TestRequest::post()
      .uri("/api/products")
      .insert_header(multipart_content_type())
      .set_payload(multipart_body(&fields, None))
      .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
  }

  let long_name = "x".repeat(256);
  let req = test::TestRequest::post()
    .uri("/api/products")
    .insert_header(multipart_content_type())
    .set_payload(multipart_body(&[("name", long_name.as_str()), ("price", "1"), ("quantity", "1")], None))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
  assert!(shop.store.list_products().await.unwrap().is_empty());
}

#[actix_web::test]
async fn update_replaces_fields_and_image() {
  let shop = shop(vec![]);
  let app = init_app!(shop);

  let req = test::TestRequest::post()
    .uri("/api/products")
    .insert_header(multipart_content_type())
    .set_payload(multipart_body(
      &[("name", "Lamp"), ("price", "10"), ("quantity", "1")],
      Some(("old.jpg", b"old".as_slice())),
    ))
    .to_request();
  let created: Value = test::call_and_read_body_json(&app, req).await;
  let id = created["id"].as_i64().unwrap();
  let old_file = file_for(&shop, created["imagePath"].as_str().unwrap());
  assert!(old_file.exists());

  let id_text = id.to_string();
  let req = test::TestRequest::put()
    .uri(&format!("/api/products/{}", id))
    .insert_header(multipart_content_type())
    .set_payload(multipart_body(
      &[("id", id_text.as_str()), ("name", "Desk Lamp"), ("price", "12.00"), ("quantity", "7")],
      Some(("new.webp", b"new".as_slice())),
    ))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::NO_CONTENT);

  let updated = shop.store.get_product(id as i32).await.unwrap().unwrap();
  assert_eq!(updated.name, "Desk Lamp");
  assert_eq!(updated.quantity, 7);
  let new_path = updated.image_path.unwrap();
  assert!(new_path.ends_with(".webp"));
  assert!(file_for(&shop, &new_path).exists());
  assert!(!old_file.exists());
}

#[actix_web::test]
async fn update_rejects_mismatched_and_unknown_ids() {
  let shop = shop(vec![product(1, "1.00", 1)]);
  let app = init_app!(shop);

  let req = test::TestRequest::put()
    .uri("/api/products/1")
    .insert_header(multipart_content_type())
    .set_payload(multipart_body(&[("id", "2"), ("name", "X"), ("price", "1"), ("quantity", "1")], None))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "Product ID mismatch.");

  let req = test::TestRequest::put()
    .uri("/api/products/5")
    .insert_header(multipart_content_type())
    .set_payload(multipart_body(&[("name", "X"), ("price", "1"), ("quantity", "1")], None))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn delete_removes_custom_images_only() {
  let shop = shop(vec![product(1, "1.00", 1)]);
  let app = init_app!(shop);
  let default_file = shop.upload_dir().join("default.jpg");
  std::fs::write(&default_file, b"default").unwrap();

  let req = test::TestRequest::post()
    .uri("/api/products")
    .insert_header(multipart_content_type())
    .set_payload(multipart_body(
      &[("name", "Lamp"), ("price", "10"), ("quantity", "1")],
      Some(("lamp.gif", b"gif".as_slice())),
    ))
    .to_request();
  let created: Value = test::call_and_read_body_json(&app, req).await;
  let custom_file = file_for(&shop, created["imagePath"].as_str().unwrap());

  let req = test::TestRequest::delete()
    .uri(&format!("/api/products/{}", created["id"]))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);
  assert!(!custom_file.exists());

  let req = test::TestRequest::delete().uri("/api/products/1").to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);
  assert!(default_file.exists());

  let req = test::TestRequest::delete().uri("/api/products/1").to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn ordered_products_cannot_be_deleted() {
  let shop = shop(vec![product(1, "1.00", 3)]);
  let app = init_app!(shop);

  let req = test::TestRequest::post()
    .uri("/api/order")
    .set_json(json!({ "customerName": "A", "products": [{ "id": 1, "quantity": 1, "price": 1.0 }] }))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

  let req = test::TestRequest::delete().uri("/api/products/1").to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::INTERNAL_SERVER_ERROR);
  assert!(shop.store.get_product(1).await.unwrap().is_some());
}
