use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use candy_engine::{CourierApi, OrderFlowApi};
use log::debug;

use super::mocks::MockStore;
use crate::routes::configure_routes;

/// Sends the request to an app whose courier and order APIs are backed by the given mocks.
pub async fn send_request(req: TestRequest, couriers: MockStore, orders: MockStore) -> (StatusCode, String) {
    let _ = env_logger::try_init().ok();
    let app = App::new()
        .app_data(web::Data::new(CourierApi::new(couriers)))
        .app_data(web::Data::new(OrderFlowApi::new(orders)))
        .configure(configure_routes::<MockStore>);
    let service = test::init_service(app).await;
    debug!("Making request");
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let body = test::read_body(res).await;
    (status, String::from_utf8_lossy(&body).into_owned())
}

pub fn json_of(body: &str) -> serde_json::Value {
    serde_json::from_str(body).expect("Response was not JSON")
}
