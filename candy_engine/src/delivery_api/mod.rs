//! The engine's public use-case API.
//!
//! [`courier_api::CourierApi`] registers couriers, changes them and reports on them. [`order_flow_api::OrderFlowApi`]
//! registers orders and drives them through assignment and delivery. Both wrap a storage backend that is handed in
//! explicitly.
pub mod batch_objects;
pub mod courier_api;
pub mod courier_objects;
pub mod order_flow_api;
pub mod order_objects;
