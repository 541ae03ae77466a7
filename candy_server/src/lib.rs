//! # Candy delivery server
//! This crate hosts the HTTP front end for the candy delivery service. It is responsible for:
//! Accepting courier and order registrations in batches.
//! Handing waiting orders to couriers that ask for them, and recording deliveries.
//! Reporting each courier's earnings and rating.
//!
//! All of the rules live in `candy_engine`. The handlers here only translate JSON to engine calls and engine errors to
//! status codes.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `POST /couriers`, `PATCH /couriers/{id}`, `GET /couriers/{id}`: courier registration, changes and profiles.
//! * `POST /orders`, `POST /orders/assign`, `POST /orders/complete`: order registration, assignment and delivery.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
