//! #  Database management and control.
//!
//! This module provides the interface contracts that delivery engine database *backends* must honour.
//!
//! ## Couriers and orders
//! Couriers are registered with a type, a set of regions and their working hours. Orders carry a weight, a region and
//! the hours they may be delivered in. An order is handed to at most one courier and, once delivered, stays with that
//! courier for good.
//!
//! ## Traits
//! * [`DeliveryDatabase`] defines the state-changing behaviour: registration, assignment, courier updates and
//!   completion. Every method is a single atomic unit of work.
//! * [`CourierManagement`] provides read-only queries over couriers.
//! * [`OrderManagement`] provides read-only queries over orders and their delivery history.
mod courier_management;
mod data_objects;
mod delivery_database;
mod order_management;

pub use courier_management::CourierManagement;
pub use data_objects::ClaimResult;
pub use delivery_database::{DeliveryDatabase, DeliveryError, ErrorKind};
pub use order_management::OrderManagement;
