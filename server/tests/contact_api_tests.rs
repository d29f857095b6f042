// eshop-server/tests/contact_api_tests.rs

#[macro_use]
mod common;

use actix_web::test;
use common::shop;
use serde_json::{json, Value};

#[actix_web::test]
async fn complete_contact_form_is_forwarded_to_the_inbox() {
  let shop = shop(vec![]);
  let app = init_app!(shop);

  let req = test::TestRequest::post()
    .uri("/contact")
    .set_form(json!({
      "name": "Bob",
      "email": "bob@example.com",
      "subject": "Opening hours",
      "message": "Are you open on Sundays?"
    }))
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;

  assert_eq!(body, json!({ "success": true, "message": "Message sent successfully!" }));
  let sent = shop.mailer.sent.lock();
  assert_eq!(sent.len(), 1);
  assert_eq!(sent[0].to, "inbox@shop.test");
  assert_eq!(sent[0].subject, "Opening hours");
  assert!(sent[0].body.starts_with("Name: Bob\nEmail: bob@example.com\nMessage:\n"));
}

#[actix_web::test]
async fn incomplete_contact_form_is_not_sent() {
  let shop = shop(vec![]);
  let app = init_app!(shop);

  let req = test::TestRequest::post()
    .uri("/contact")
    .set_form(json!({ "name": "Bob", "email": "", "subject": "Hi" }))
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;

  assert_eq!(body, json!({ "success": false, "message": "Please check the submitted details." }));
  assert!(shop.mailer.sent.lock().is_empty());
}
