//! Candy Delivery Engine
//!
//! This library holds the core logic of the candy delivery service. It registers couriers and orders, hands out
//! batches of orders to couriers, keeps those batches valid when a courier changes, records completed deliveries and
//! computes courier earnings and ratings. It is transport-agnostic: the HTTP layer lives in `candy_server`.
//!
//! The library is divided into three main sections:
//! 1. Database management and control ([`mod@db`]). SQLite is the supported backend. You should never need to access
//!    the database directly. Instead, use the public API provided by the engine. The exception is the data types used
//!    in the database. These are defined in the [`mod@db_types`] module and are public.
//! 2. The pure fulfilment rules ([`mod@fulfilment`]): who may carry what, when a delivery is complete and how fast a
//!    courier is. These functions never touch storage.
//! 3. The engine public API ([`CourierApi`] and [`OrderFlowApi`]). This is the public-facing functionality of the
//!    engine. Backends need to implement the traits in [`mod@db`] in order to act as a store for the delivery server.
mod db;
mod delivery_api;

pub mod db_types;
pub mod fulfilment;
pub mod helpers;

#[cfg(feature = "sqlite")]
pub use db::sqlite::SqliteDatabase;
pub use db::traits::{
    ClaimResult,
    CourierManagement,
    DeliveryDatabase,
    DeliveryError,
    ErrorKind,
    OrderManagement,
};
pub use delivery_api::{
    batch_objects::{Batch, BatchRejection, Draft, FieldError, RecordKind, RejectedRecord},
    courier_api::CourierApi,
    courier_objects::{CourierDraft, CourierProfile, CourierSummary, CourierUpdateDraft},
    order_flow_api::OrderFlowApi,
    order_objects::{OrderDraft, MAX_ORDER_WEIGHT, MIN_ORDER_WEIGHT},
};
