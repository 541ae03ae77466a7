use chrono::NaiveDateTime;
use thiserror::Error;

use crate::{
    db::traits::{CourierManagement, OrderManagement},
    db_types::{Assignment, Courier, CourierId, CourierUpdate, NewCourier, NewOrder, OrderId},
    delivery_api::batch_objects::BatchRejection,
};

/// Broad classes of failure. Transports map these onto their own status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Concurrency,
    Internal,
}

#[derive(Debug, Clone, Error)]
pub enum DeliveryError {
    #[error("Internal database error: {0}")]
    DatabaseError(String),
    #[error("A stored record could not be read: {0}")]
    CorruptRecord(String),
    #[error("Courier {0} does not exist")]
    CourierNotFound(CourierId),
    #[error("Order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("Courier {0} already exists")]
    CourierAlreadyExists(CourierId),
    #[error("Order {0} already exists")]
    OrderAlreadyExists(OrderId),
    #[error("Order {order_id} is not assigned to courier {courier_id}")]
    OrderNotAssigned { order_id: OrderId, courier_id: CourierId },
    #[error("Courier {0} holds orders but has no assignment time")]
    MissingAssignTime(CourierId),
    #[error("Completion time {completed_at} is earlier than {reference}, when the delivery started")]
    CompletionBeforeStart { completed_at: NaiveDateTime, reference: NaiveDateTime },
    #[error("The courier update is empty. Supply at least one of courier_type, regions or working_hours")]
    EmptyUpdate,
    #[error("Invalid courier update. {0}")]
    InvalidUpdate(String),
    #[error("{0}")]
    BatchRejected(BatchRejection),
    #[error("The record store is busy. Try again shortly.")]
    StoreBusy,
}

impl DeliveryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DatabaseError(_) | Self::CorruptRecord(_) | Self::MissingAssignTime(_) => ErrorKind::Internal,
            Self::CourierNotFound(_) | Self::OrderNotFound(_) => ErrorKind::NotFound,
            Self::CourierAlreadyExists(_) | Self::OrderAlreadyExists(_) => ErrorKind::Conflict,
            Self::OrderNotAssigned { .. }
            | Self::CompletionBeforeStart { .. }
            | Self::EmptyUpdate
            | Self::InvalidUpdate(_)
            | Self::BatchRejected(_) => ErrorKind::Validation,
            Self::StoreBusy => ErrorKind::Concurrency,
        }
    }
}

impl From<sqlx::Error> for DeliveryError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut => Self::StoreBusy,
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => Self::CorruptRecord(e.to_string()),
            e => Self::DatabaseError(e.to_string()),
        }
    }
}

/// This trait defines the state-changing behaviour for backends supporting the delivery engine.
///
/// Each method is one atomic unit of work. Two calls never observe each other's partial effects, and an error leaves
/// the store exactly as it was.
#[allow(async_fn_in_trait)]
pub trait DeliveryDatabase: CourierManagement + OrderManagement {
    /// The URL of the database
    fn url(&self) -> &str;

    /// Stores a batch of validated couriers. Either all of them are stored or none are.
    async fn insert_couriers(&self, couriers: Vec<NewCourier>) -> Result<Vec<CourierId>, DeliveryError>;

    /// Stores a batch of validated orders. Either all of them are stored or none are.
    async fn insert_orders(&self, orders: Vec<NewOrder>) -> Result<Vec<OrderId>, DeliveryError>;

    /// Tops up the courier's batch with every unclaimed order it can take on, considering candidates in ascending id
    /// order.
    ///
    /// An order that another courier claims in the meantime is skipped. If nothing new was added, the courier's
    /// current batch is returned unchanged. The batch start time is `now` if the courier was idle beforehand.
    async fn assign_orders(&self, courier_id: CourierId, now: NaiveDateTime) -> Result<Assignment, DeliveryError>;

    /// Applies the update to the courier and then re-checks every order it holds against the new profile.
    ///
    /// Orders the courier can no longer carry (no overlapping hours, or over the new weight limit once earlier orders
    /// are counted) are released back into the pool. Regions are not re-checked: a held order stays with the courier
    /// even if it is outside the new regions. The updated courier is returned.
    async fn update_courier(&self, courier_id: CourierId, update: CourierUpdate) -> Result<Courier, DeliveryError>;

    /// Records that the courier delivered the order at `completed_at`.
    ///
    /// Completing an order that is already complete is a no-op and succeeds.
    async fn complete_order(
        &self,
        courier_id: CourierId,
        order_id: OrderId,
        completed_at: NaiveDateTime,
    ) -> Result<OrderId, DeliveryError>;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), DeliveryError> {
        Ok(())
    }
}
