//! HTTP routes for couriers and orders.
//!
//! Handlers are generic over the store so that endpoint tests can run them against mocks. Keep them thin: every
//! decision lives in [`CourierApi`] or [`OrderFlowApi`].
use actix_web::{get, web, HttpResponse, Responder};
use candy_engine::{
    db_types::{CourierId, OrderId},
    helpers::parse_timestamp,
    CourierApi,
    CourierDraft,
    CourierUpdateDraft,
    DeliveryDatabase,
    OrderDraft,
    OrderFlowApi,
};
use log::*;

use crate::{
    data_objects::{
        AssignRequest,
        AssignResponse,
        BatchRequest,
        CompleteRequest,
        CompleteResponse,
        CreatedCouriers,
        CreatedOrders,
        IdRecord,
    },
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

/// Registers every route, plus the extractor settings that turn unreadable requests into `400` responses.
pub fn configure_routes<B: DeliveryDatabase + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .service(health)
        .service(CreateCouriersRoute::<B>::new())
        .service(UpdateCourierRoute::<B>::new())
        .service(CourierProfileRoute::<B>::new())
        .service(CreateOrdersRoute::<B>::new())
        .service(AssignOrdersRoute::<B>::new())
        .service(CompleteOrderRoute::<B>::new());
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        debug!("💻️ Could not read request body. {err}");
        ServerError::InvalidRequestBody(err.to_string()).into()
    })
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        debug!("💻️ Could not read request path. {err}");
        ServerError::InvalidRequestPath(err.to_string()).into()
    })
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Couriers  ----------------------------------------------------
route!(create_couriers => Post "/couriers" impl DeliveryDatabase);
/// Registers a batch of couriers.
///
/// The body is `{"data": [...]}`. Either every courier is stored and the response is `201` with their ids, or nothing
/// is stored and the response is `400` with `{"validation_error": {"couriers": [{"id": ..}]}}` naming every courier
/// that could not be accepted.
pub async fn create_couriers<B: DeliveryDatabase>(
    body: web::Json<BatchRequest>,
    api: web::Data<CourierApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let batch = body.into_inner().into_batch::<CourierDraft>("courier_id");
    trace!("💻️ Received request to register {} couriers", batch.len());
    let ids = api.create_couriers(batch).await?;
    let couriers = IdRecord::list(ids.iter().map(CourierId::value));
    Ok(HttpResponse::Created().json(CreatedCouriers { couriers }))
}

route!(update_courier => Patch "/couriers/{courier_id}" impl DeliveryDatabase);
pub async fn update_courier<B: DeliveryDatabase>(
    path: web::Path<i64>,
    body: web::Json<CourierUpdateDraft>,
    api: web::Data<CourierApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let courier_id = CourierId(path.into_inner());
    trace!("💻️ Received update for courier {courier_id}");
    let courier = api.update_courier(courier_id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(courier))
}

route!(courier_profile => Get "/couriers/{courier_id}" impl DeliveryDatabase);
/// The courier's details with its `earnings`, and a `rating` once it has delivered something.
pub async fn courier_profile<B: DeliveryDatabase>(
    path: web::Path<i64>,
    api: web::Data<CourierApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let courier_id = CourierId(path.into_inner());
    trace!("💻️ Received profile request for courier {courier_id}");
    let profile = api.courier_profile(courier_id).await?;
    Ok(HttpResponse::Ok().json(profile))
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(create_orders => Post "/orders" impl DeliveryDatabase);
/// Registers a batch of orders. All or nothing, as for couriers.
pub async fn create_orders<B: DeliveryDatabase>(
    body: web::Json<BatchRequest>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let batch = body.into_inner().into_batch::<OrderDraft>("order_id");
    trace!("💻️ Received request to register {} orders", batch.len());
    let ids = api.create_orders(batch).await?;
    let orders = IdRecord::list(ids.iter().map(OrderId::value));
    Ok(HttpResponse::Created().json(CreatedOrders { orders }))
}

route!(assign_orders => Post "/orders/assign" impl DeliveryDatabase);
/// Hands the courier whatever waiting orders it can carry and returns everything it now holds.
///
/// `assign_time` is left out of the response when the courier holds nothing.
pub async fn assign_orders<B: DeliveryDatabase>(
    body: web::Json<AssignRequest>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let courier_id = CourierId(body.courier_id);
    trace!("💻️ Received assignment request for courier {courier_id}");
    let assignment = api.assign_orders(courier_id).await.map_err(ServerError::from_body_reference)?;
    Ok(HttpResponse::Ok().json(AssignResponse::from(assignment)))
}

route!(complete_order => Post "/orders/complete" impl DeliveryDatabase);
pub async fn complete_order<B: DeliveryDatabase>(
    body: web::Json<CompleteRequest>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let CompleteRequest { courier_id, order_id, complete_time } = body.into_inner();
    trace!("💻️ Received completion of order {order_id} by courier {courier_id} at {complete_time}");
    let completed_at = parse_timestamp(&complete_time).map_err(|e| ServerError::InvalidRequestBody(e.to_string()))?;
    let order_id = api
        .complete_order(CourierId(courier_id), OrderId(order_id), completed_at)
        .await
        .map_err(ServerError::from_body_reference)?;
    Ok(HttpResponse::Ok().json(CompleteResponse { order_id: order_id.value() }))
}
