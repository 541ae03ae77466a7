use actix_web::{
    http::{header::ContentType, StatusCode},
    test::TestRequest,
};
use candy_common::Earnings;
use candy_engine::{
    db_types::{CompletedDelivery, Courier, CourierId, CourierType, NewCourier, OrderId},
    helpers::TimeInterval,
    DeliveryError,
};
use serde_json::json;

use super::{
    helpers::{json_of, send_request},
    mocks::MockStore,
};

fn courier(id: i64, courier_type: CourierType) -> Courier {
    Courier::from(NewCourier {
        id: CourierId(id),
        courier_type,
        regions: vec![1, 12, 22],
        working_hours: vec![TimeInterval::new(11 * 60 + 35, 14 * 60 + 5).unwrap()],
    })
}

#[actix_web::test]
async fn health_check() {
    let req = TestRequest::get().uri("/health");
    let (status, body) = send_request(req, MockStore::new(), MockStore::new()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "👍️\n");
}

#[actix_web::test]
async fn one_bad_courier_rejects_the_batch() {
    let mut store = MockStore::new();
    store.expect_existing_courier_ids().returning(|_| Ok(vec![]));
    store.expect_insert_couriers().never();
    let req = TestRequest::post().uri("/couriers").set_json(json!({"data": [
        {"courier_id": 1, "courier_type": "foot", "regions": [1, 12, 22], "working_hours": ["11:35-14:05", "09:00-11:00"]},
        {"courier_id": 2, "courier_type": "bike", "regions": [22], "working_hours": ["09:00-18:00"]},
        {"courier_id": 3, "courier_type": "car", "regions": [12, 22, 23, 33], "working_hours": []}
    ]}));
    let (status, body) = send_request(req, store, MockStore::new()).await;
    // courier 3 has no working hours, so nothing is stored
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json_of(&body), json!({"validation_error": {"couriers": [{"id": 3}]}}));
}

#[actix_web::test]
async fn register_valid_couriers() {
    let mut store = MockStore::new();
    store.expect_existing_courier_ids().returning(|_| Ok(vec![]));
    store.expect_insert_couriers().times(1).returning(|couriers| Ok(couriers.iter().map(|c| c.id).collect()));
    let req = TestRequest::post().uri("/couriers").set_json(json!({"data": [
        {"courier_id": 1, "courier_type": "foot", "regions": [1, 12, 22], "working_hours": ["11:35-14:05", "09:00-11:00"]},
        {"courier_id": 2, "courier_type": "bike", "regions": [22], "working_hours": ["09:00-18:00"]}
    ]}));
    let (status, body) = send_request(req, store, MockStore::new()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json_of(&body), json!({"couriers": [{"id": 1}, {"id": 2}]}));
}

#[actix_web::test]
async fn every_bad_courier_is_named() {
    let mut store = MockStore::new();
    store.expect_existing_courier_ids().returning(|_| Ok(vec![CourierId(2)]));
    store.expect_insert_couriers().never();
    let req = TestRequest::post().uri("/couriers").set_json(json!({"data": [
        {"courier_id": 1, "courier_type": "foot", "regions": [1], "working_hours": ["09:00-18:00"]},
        {"courier_id": 2, "courier_type": "foot", "regions": [1], "working_hours": ["09:00-18:00"]},
        {"courier_id": 3, "courier_type": "truck", "regions": [1], "working_hours": ["09:00-18:00"]},
        {"courier_id": 4, "courier_type": "car", "regions": [1], "working_hours": ["09:00-18:00"], "salary": 9},
        {"courier_id": 1, "courier_type": "car", "regions": [1], "working_hours": ["09:00-18:00"]}
    ]}));
    let (status, body) = send_request(req, store, MockStore::new()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json_of(&body), json!({"validation_error": {"couriers": [{"id": 2}, {"id": 3}, {"id": 4}, {"id": 1}]}}));
}

#[actix_web::test]
async fn malformed_body() {
    let req = TestRequest::post()
        .uri("/couriers")
        .insert_header(ContentType::json())
        .set_payload(r#"{"data": [{"courier_id": 1,"#);
    let (status, body) = send_request(req, MockStore::new(), MockStore::new()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json_of(&body)["error"].as_str().unwrap().starts_with("Could not read request body"));
}

#[actix_web::test]
async fn update_courier() {
    let mut store = MockStore::new();
    store
        .expect_update_courier()
        .withf(|id, update| {
            *id == CourierId(2) && update.courier_type == Some(CourierType::Bike) && update.regions.is_none()
        })
        .times(1)
        .returning(|id, _| Ok(courier(id.value(), CourierType::Bike)));
    let req = TestRequest::patch().uri("/couriers/2").set_json(json!({"courier_type": "bike"}));
    let (status, body) = send_request(req, store, MockStore::new()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json_of(&body),
        json!({"courier_id": 2, "courier_type": "bike", "regions": [1, 12, 22], "working_hours": ["11:35-14:05"]})
    );
}

#[actix_web::test]
async fn bad_updates_are_refused() {
    let mut store = MockStore::new();
    store.expect_update_courier().never();
    let req = TestRequest::patch().uri("/couriers/2").set_json(json!({}));
    let (status, _) = send_request(req, store, MockStore::new()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut store = MockStore::new();
    store.expect_update_courier().never();
    let req = TestRequest::patch().uri("/couriers/2").set_json(json!({"working_hours": ["9am-5pm"]}));
    let (status, _) = send_request(req, store, MockStore::new()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut store = MockStore::new();
    store.expect_update_courier().never();
    let req = TestRequest::patch().uri("/couriers/2").set_json(json!({"earnings": 100}));
    let (status, _) = send_request(req, store, MockStore::new()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn update_unknown_courier() {
    let mut store = MockStore::new();
    store.expect_update_courier().returning(|id, _| Err(DeliveryError::CourierNotFound(id)));
    let req = TestRequest::patch().uri("/couriers/9").set_json(json!({"regions": [4]}));
    let (status, body) = send_request(req, store, MockStore::new()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json_of(&body), json!({"error": "The data was not found. Courier #9 does not exist"}));
}

#[actix_web::test]
async fn courier_profile() {
    let mut store = MockStore::new();
    store.expect_fetch_courier().returning(|id| {
        let mut c = courier(id.value(), CourierType::Foot);
        c.earnings = Earnings::from(1000);
        Ok(Some(c))
    });
    store.expect_fetch_completed_deliveries().returning(|_| {
        Ok(vec![CompletedDelivery { order_id: OrderId(1), region: 1, complete_time: 300 }])
    });
    let req = TestRequest::get().uri("/couriers/1");
    let (status, body) = send_request(req, store, MockStore::new()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json_of(&body),
        json!({
            "courier_id": 1,
            "courier_type": "foot",
            "regions": [1, 12, 22],
            "working_hours": ["11:35-14:05"],
            "rating": 4.58,
            "earnings": 1000
        })
    );
}

#[actix_web::test]
async fn unrated_courier_profile() {
    let mut store = MockStore::new();
    store.expect_fetch_courier().returning(|id| Ok(Some(courier(id.value(), CourierType::Car))));
    store.expect_fetch_completed_deliveries().returning(|_| Ok(vec![]));
    let req = TestRequest::get().uri("/couriers/5");
    let (status, body) = send_request(req, store, MockStore::new()).await;
    assert_eq!(status, StatusCode::OK);
    let json = json_of(&body);
    assert!(json.get("rating").is_none());
    assert_eq!(json["earnings"], 0);
}

#[actix_web::test]
async fn unknown_courier_profile() {
    let mut store = MockStore::new();
    store.expect_fetch_courier().returning(|_| Ok(None));
    let req = TestRequest::get().uri("/couriers/5");
    let (status, _) = send_request(req, store, MockStore::new()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn courier_id_must_be_a_number() {
    let req = TestRequest::get().uri("/couriers/five");
    let (status, body) = send_request(req, MockStore::new(), MockStore::new()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json_of(&body)["error"].as_str().unwrap().starts_with("Could not read request path"));
}
