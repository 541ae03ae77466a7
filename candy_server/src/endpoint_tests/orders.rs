use actix_web::{http::StatusCode, test::TestRequest};
use candy_engine::{
    db_types::{Assignment, CourierId, OrderId},
    helpers::parse_timestamp,
    DeliveryError,
};
use serde_json::json;

use super::{
    helpers::{json_of, send_request},
    mocks::MockStore,
};

#[actix_web::test]
async fn register_orders() {
    let mut store = MockStore::new();
    store.expect_existing_order_ids().returning(|_| Ok(vec![]));
    store.expect_insert_orders().times(1).returning(|orders| {
        assert_eq!(orders[0].delivery_hours[0].to_string(), "09:00-18:00");
        Ok(orders.iter().map(|o| o.id).collect())
    });
    let req = TestRequest::post().uri("/orders").set_json(json!({"data": [
        {"order_id": 1, "weight": 0.23, "region": 12, "delivery_hours": ["09:00-18:00"]},
        {"order_id": 2, "weight": 15, "region": 1, "delivery_hours": ["09:00-18:00"]},
        {"order_id": 3, "weight": 0.01, "region": 22, "delivery_hours": ["09:00-12:00", "16:00-21:30"]}
    ]}));
    let (status, body) = send_request(req, MockStore::new(), store).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json_of(&body), json!({"orders": [{"id": 1}, {"id": 2}, {"id": 3}]}));
}

#[actix_web::test]
async fn bad_orders_reject_the_batch() {
    let mut store = MockStore::new();
    store.expect_existing_order_ids().returning(|_| Ok(vec![]));
    store.expect_insert_orders().never();
    let req = TestRequest::post().uri("/orders").set_json(json!({"data": [
        {"order_id": 1, "weight": 0.23, "region": 12, "delivery_hours": ["09:00-18:00"]},
        {"order_id": 2, "weight": 50.01, "region": 1, "delivery_hours": ["09:00-18:00"]},
        {"order_id": 3, "weight": "light", "region": 22, "delivery_hours": ["09:00-12:00"]},
        {"weight": 1, "region": 22, "delivery_hours": ["09:00-12:00"]}
    ]}));
    let (status, body) = send_request(req, MockStore::new(), store).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json_of(&body), json!({"validation_error": {"orders": [{"id": 2}, {"id": 3}, {"id": null}]}}));
}

#[actix_web::test]
async fn assign_orders() {
    let mut store = MockStore::new();
    store.expect_assign_orders().withf(|id, _| *id == CourierId(2)).times(1).returning(|_, _| {
        let assign_time = parse_timestamp("2021-01-10T09:32:14.42Z").ok();
        Ok(Assignment { orders: vec![OrderId(1), OrderId(3)], assign_time })
    });
    let req = TestRequest::post().uri("/orders/assign").set_json(json!({"courier_id": 2}));
    let (status, body) = send_request(req, MockStore::new(), store).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_of(&body), json!({"orders": [{"id": 1}, {"id": 3}], "assign_time": "2021-01-10T09:32:14.420"}));
}

#[actix_web::test]
async fn assign_nothing() {
    let mut store = MockStore::new();
    store.expect_assign_orders().returning(|_, _| Ok(Assignment { orders: vec![], assign_time: None }));
    let req = TestRequest::post().uri("/orders/assign").set_json(json!({"courier_id": 2}));
    let (status, body) = send_request(req, MockStore::new(), store).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_of(&body), json!({"orders": []}));
}

#[actix_web::test]
async fn assign_to_unknown_courier() {
    let mut store = MockStore::new();
    store.expect_assign_orders().returning(|id, _| Err(DeliveryError::CourierNotFound(id)));
    let req = TestRequest::post().uri("/orders/assign").set_json(json!({"courier_id": 7}));
    let (status, _) = send_request(req, MockStore::new(), store).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn busy_store() {
    let mut store = MockStore::new();
    store.expect_assign_orders().returning(|_, _| Err(DeliveryError::StoreBusy));
    let req = TestRequest::post().uri("/orders/assign").set_json(json!({"courier_id": 7}));
    let (status, body) = send_request(req, MockStore::new(), store).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json_of(&body), json!({"error": "The server is busy. Try again shortly."}));
}

#[actix_web::test]
async fn complete_order() {
    let mut store = MockStore::new();
    let expected = parse_timestamp("2021-01-10T10:33:01.420").unwrap();
    store
        .expect_complete_order()
        .withf(move |courier, order, at| *courier == CourierId(2) && *order == OrderId(33) && *at == expected)
        .times(1)
        .returning(|_, order, _| Ok(order));
    let req = TestRequest::post().uri("/orders/complete").set_json(json!({
        "courier_id": 2, "order_id": 33, "complete_time": "2021-01-10T10:33:01.42Z"
    }));
    let (status, body) = send_request(req, MockStore::new(), store).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_of(&body), json!({"order_id": 33}));
}

#[actix_web::test]
async fn completion_needs_a_readable_time() {
    let mut store = MockStore::new();
    store.expect_complete_order().never();
    let req = TestRequest::post().uri("/orders/complete").set_json(json!({
        "courier_id": 2, "order_id": 33, "complete_time": "yesterday"
    }));
    let (status, _) = send_request(req, MockStore::new(), store).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn bad_completions_are_bad_requests() {
    let refusals = [
        DeliveryError::OrderNotFound(OrderId(33)),
        DeliveryError::CourierNotFound(CourierId(2)),
        DeliveryError::OrderNotAssigned { order_id: OrderId(33), courier_id: CourierId(2) },
    ];
    for refusal in refusals {
        let mut store = MockStore::new();
        store.expect_complete_order().returning(move |_, _, _| Err(refusal.clone()));
        let req = TestRequest::post().uri("/orders/complete").set_json(json!({
            "courier_id": 2, "order_id": 33, "complete_time": "2021-01-10 10:33:01"
        }));
        let (status, body) = send_request(req, MockStore::new(), store).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    }
}
