use std::fmt::Debug;

use chrono::{NaiveDateTime, Utc};
use log::*;

use crate::{
    db::traits::{DeliveryDatabase, DeliveryError},
    db_types::{Assignment, CourierId, Order, OrderId},
    delivery_api::{
        batch_objects::{Batch, RecordKind},
        order_objects::OrderDraft,
    },
};

/// `OrderFlowApi` is the primary API for moving orders through their life: registration, assignment to a courier and
/// delivery.
pub struct OrderFlowApi<B> {
    db: B,
}

impl<B: Debug> Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi ({:?})", self.db)
    }
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B> OrderFlowApi<B>
where B: DeliveryDatabase
{
    /// Registers every order in the batch, or none of them. See [`crate::CourierApi::create_couriers`] for the rules.
    pub async fn create_orders(&self, batch: Batch<OrderDraft>) -> Result<Vec<OrderId>, DeliveryError> {
        let ids = batch.ids().into_iter().map(OrderId).collect::<Vec<_>>();
        let existing = self.db.existing_order_ids(&ids).await?.into_iter().map(|id| id.value()).collect::<Vec<_>>();
        let orders = batch.validate(RecordKind::Orders, &existing).map_err(DeliveryError::BatchRejected)?;
        let created = self.db.insert_orders(orders).await?;
        info!("🚚️ {} orders registered", created.len());
        Ok(created)
    }

    /// Hands the courier every waiting order it can fit, using the current time as the batch start.
    pub async fn assign_orders(&self, courier_id: CourierId) -> Result<Assignment, DeliveryError> {
        self.assign_orders_at(courier_id, Utc::now().naive_utc()).await
    }

    /// As [`Self::assign_orders`], with an explicit clock reading.
    pub async fn assign_orders_at(&self, courier_id: CourierId, now: NaiveDateTime) -> Result<Assignment, DeliveryError> {
        let assignment = self.db.assign_orders(courier_id, now).await?;
        debug!("🚚️ Courier {courier_id} is assigned {:?} since {:?}", assignment.orders, assignment.assign_time);
        Ok(assignment)
    }

    /// Records a delivery. Reporting the same delivery again is harmless and returns the same order id.
    pub async fn complete_order(
        &self,
        courier_id: CourierId,
        order_id: OrderId,
        completed_at: NaiveDateTime,
    ) -> Result<OrderId, DeliveryError> {
        let id = self.db.complete_order(courier_id, order_id, completed_at).await?;
        debug!("🚚️ Courier {courier_id} completed order {id} at {completed_at}");
        Ok(id)
    }

    pub async fn fetch_order(&self, order_id: OrderId) -> Result<Option<Order>, DeliveryError> {
        self.db.fetch_order(order_id).await
    }
}
