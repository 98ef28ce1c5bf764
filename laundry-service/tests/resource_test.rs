mod common;

use axum::http::StatusCode;
use common::TestApp;
use mongodb::bson::oid::ObjectId;
use serde_json::json;

#[tokio::test]
async fn test_empty_list_is_not_found() {
    let app = TestApp::spawn().await;
    let token = app.staff_token();

    for path in [
        "/customer",
        "/supplier",
        "/item",
        "/item-transaction",
        "/stock-transaction",
        "/transaction",
        "/employee",
        "/customer-names",
        "/item-transaction-summary",
    ] {
        let (status, body) = app.get(path, &token).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", path);
        assert!(body["error"].as_str().unwrap().starts_with("No "), "{}", path);
    }
}

#[tokio::test]
async fn test_customer_crud() {
    let app = TestApp::spawn().await;
    let token = app.staff_token();

    let (status, body) = app
        .post(
            "/customer",
            &token,
            json!({ "name": "Budi", "phone": "0812", "address": "Bandung", "email": "budi@mail.id" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Customer created successfully");
    let id = body["customer"]["id"].as_str().unwrap().to_string();
    assert_eq!(id.len(), 24);

    let (status, list) = app.get("/customer", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, body) = app
        .put(
            &format!("/customer-id?id={}", id),
            &token,
            json!({ "name": "Budi", "phone": "0899", "address": "Bandung", "email": "budi@mail.id" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Customer updated successfully");

    let (status, customer) = app.get(&format!("/customer-id?id={}", id), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(customer["phone"], "0899");
    assert_eq!(customer["name"], "Budi");

    let (status, contact) = app.get(&format!("/customer-name?id={}", id), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(contact, json!({ "name": "Budi", "phone": "0899" }));

    let (status, names) = app.get("/customer-names", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names, json!([{ "id": id, "name": "Budi", "phone": "0899" }]));

    let (status, body) = app.delete(&format!("/customer-id?id={}", id), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Customer deleted successfully");

    let (status, _) = app.delete(&format!("/customer-id?id={}", id), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_replaces_every_allow_listed_field() {
    let app = TestApp::spawn().await;
    let token = app.staff_token();

    let (_, body) = app
        .post(
            "/customer",
            &token,
            json!({ "name": "Budi", "phone": "0812", "address": "Bandung", "email": "budi@mail.id" }),
        )
        .await;
    let uri = format!("/customer-id?id={}", body["customer"]["id"].as_str().unwrap());

    let (status, _) = app.put(&uri, &token, json!({ "name": "Sari" })).await;
    assert_eq!(status, StatusCode::OK);

    let (_, customer) = app.get(&uri, &token).await;
    assert_eq!(customer["name"], "Sari");
    assert_eq!(customer["phone"], "");
    assert_eq!(customer["address"], "");
    assert_eq!(customer["email"], "");

    // An empty object is a valid body that clears the record.
    let (status, _) = app.put(&uri, &token, json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let (_, customer) = app.get(&uri, &token).await;
    assert_eq!(customer["name"], "");

    let (status, body) = app.put(&uri, &token, json!({ "name": 7 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid input");
}

#[tokio::test]
async fn test_sales_update_keeps_payment_method() {
    let app = TestApp::spawn().await;
    let token = app.staff_token();

    let (_, body) = app
        .post(
            "/transaction",
            &token,
            json!({
                "customer_name": "Sari",
                "service_type": "setrika",
                "total_price": 10000,
                "payment_method": "cash",
                "transaction_date": "2024-02-14T09:30:00Z"
            }),
        )
        .await;
    let uri = format!("/transaction-id?id={}", body["transaction"]["id"].as_str().unwrap());

    let (status, _) = app
        .put(
            &uri,
            &token,
            json!({ "customer_name": "Sari", "total_price": 12000, "payment_method": "transfer" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, sale) = app.get(&uri, &token).await;
    assert_eq!(sale["total_price"], 12000.0);
    assert_eq!(sale["service_type"], "");
    assert_eq!(sale["payment_method"], "cash");
    assert_eq!(sale["formatted_date"], "14/02/2024");
}

#[tokio::test]
async fn test_create_accepts_body_without_content_type() {
    let app = TestApp::spawn().await;
    let token = app.staff_token();

    let request = axum::http::Request::builder()
        .method(axum::http::Method::POST)
        .uri("/item")
        .header("authorization", format!("Bearer {}", token))
        .body(axum::body::Body::from(
            json!({ "item_name": "Deterjen", "quantity": 10, "price": 15000 }).to_string(),
        ))
        .unwrap();
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["item"]["item_name"], "Deterjen");
}

#[tokio::test]
async fn test_get_by_id_errors() {
    let app = TestApp::spawn().await;
    let token = app.staff_token();

    let (status, body) = app
        .get(&format!("/customer-id?id={}", ObjectId::new().to_hex()), &token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Customer not found");

    let (status, body) = app.get("/customer-id", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ID not provided");

    let (status, body) = app.get("/customer-id?id=xyz", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid ID");
}

#[tokio::test]
async fn test_update_checks_id_before_body() {
    let app = TestApp::spawn().await;
    let token = app.staff_token();

    let (status, body) = app
        .request(
            axum::http::Method::PUT,
            "/item-id?id=bad",
            Some(&token),
            Some(json!("not an object")),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid ID");

    let missing = ObjectId::new().to_hex();
    let (status, body) = app
        .put(&format!("/item-id?id={}", missing), &token, json!({ "quantity": 3 }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Item not found");
}

#[tokio::test]
async fn test_item_transaction_is_stamped_and_summarised() {
    let app = TestApp::spawn().await;
    let token = app.staff_token();

    let (status, body) = app
        .post(
            "/item-transaction",
            &token,
            json!({
                "item_id": "65a000000000000000000001",
                "item_name": "Deterjen",
                "transaction_type": "usage",
                "quantity": -2,
                "stock_after": 8
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Transaction created successfully");
    assert!(body["transaction"]["date"].is_string());
    let id = body["transaction"]["id"].as_str().unwrap().to_string();

    let (status, summary) = app.get("/item-transaction-summary", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        summary,
        json!([{ "id": id, "item_id": "65a000000000000000000001", "item_name": "Deterjen" }])
    );

    let (status, _) = app
        .post(
            "/item-transaction",
            &token,
            json!({ "item_name": "Deterjen", "transaction_type": "refund" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let uri = format!("/item-transaction-id?id={}", id);
    let (status, _) = app
        .put(
            &uri,
            &token,
            json!({
                "item_name": "Deterjen",
                "date": "2024-03-01T08:00:00Z",
                "transaction_type": "purchase",
                "quantity": 5
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, updated) = app.get(&uri, &token).await;
    assert_eq!(updated["transaction_type"], "purchase");
    assert_eq!(updated["item_id"], "");
    assert_eq!(updated["stock_after"], 0);
    assert!(updated["date"].as_str().unwrap().starts_with("2024-03-01T08:00:00"));

    // The type has no empty value, so it cannot be left out.
    let (status, _) = app
        .put(&uri, &token, json!({ "date": "2024-03-01T08:00:00Z" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sales_transaction_has_formatted_date() {
    let app = TestApp::spawn().await;
    let token = app.staff_token();

    let (status, body) = app
        .post(
            "/transaction",
            &token,
            json!({
                "customer_name": "Sari",
                "phone_number": "0813",
                "service_type": "cuci kering",
                "weight_per_kg": 3.5,
                "total_price": 24500,
                "payment_method": "cash",
                "transaction_date": "2024-02-14T09:30:00Z"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["transaction"]["id"].as_str().unwrap().to_string();

    let (status, sale) = app.get(&format!("/transaction-id?id={}", id), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sale["formatted_date"], "14/02/2024");
    assert_eq!(sale["total_price"], 24500.0);
}

#[tokio::test]
async fn test_stock_transaction_is_free_form() {
    let app = TestApp::spawn().await;
    let token = app.staff_token();

    let (status, body) = app
        .post(
            "/stock-transaction",
            &token,
            json!({ "id": "client-id", "nama_barang": "Pewangi", "jumlah": 4, "catatan": "restock" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["transaction"]["id"].as_str().unwrap().to_string();
    assert_ne!(id, "client-id");
    assert!(ObjectId::parse_str(&id).is_ok());

    let (status, _) = app
        .put(
            &format!("/stock-transaction-id?id={}", id),
            &token,
            json!({ "id": "other", "nama_barang": "Pewangi", "jumlah": 6 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // The body replaces the record; its id stays.
    let (status, stock) = app
        .get(&format!("/stock-transaction-id?id={}", id), &token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stock["id"], id.as_str());
    assert_eq!(stock["nama_barang"], "Pewangi");
    assert_eq!(stock["jumlah"], 6);
    assert!(stock.get("catatan").is_none());
}

#[tokio::test]
async fn test_wrong_method_is_rejected() {
    let app = TestApp::spawn().await;

    let (status, _) = app
        .request(axum::http::Method::GET, "/login", None, None)
        .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
