use std::fmt::Debug;

use log::*;

use crate::{
    db::traits::{CourierManagement, DeliveryDatabase, DeliveryError, OrderManagement},
    db_types::{Courier, CourierId},
    delivery_api::{
        batch_objects::{Batch, RecordKind},
        courier_objects::{CourierDraft, CourierProfile, CourierSummary, CourierUpdateDraft},
    },
    fulfilment::rating,
};

/// `CourierApi` registers couriers, applies changes to them and reports on how they are doing.
pub struct CourierApi<B> {
    db: B,
}

impl<B: Debug> Debug for CourierApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CourierApi ({:?})", self.db)
    }
}

impl<B> CourierApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B> CourierApi<B>
where B: DeliveryDatabase
{
    /// Registers every courier in the batch, or none of them.
    ///
    /// If any record is invalid, or reuses an id that is already taken (in storage or earlier in the same batch), the
    /// whole batch is refused with [`DeliveryError::BatchRejected`], listing each offending record.
    pub async fn create_couriers(&self, batch: Batch<CourierDraft>) -> Result<Vec<CourierId>, DeliveryError> {
        let ids = batch.ids().into_iter().map(CourierId).collect::<Vec<_>>();
        let existing = self.db.existing_courier_ids(&ids).await?.into_iter().map(|id| id.value()).collect::<Vec<_>>();
        let couriers = batch.validate(RecordKind::Couriers, &existing).map_err(DeliveryError::BatchRejected)?;
        let created = self.db.insert_couriers(couriers).await?;
        info!("🚚️ {} couriers registered", created.len());
        Ok(created)
    }

    /// Changes some of a courier's details. Orders the courier can no longer carry go back into the pool.
    pub async fn update_courier(
        &self,
        courier_id: CourierId,
        update: CourierUpdateDraft,
    ) -> Result<CourierSummary, DeliveryError> {
        let update = update.validate()?;
        let courier = self.db.update_courier(courier_id, update).await?;
        debug!("🚚️ Courier {courier_id} now holds {:?}", courier.assigns);
        Ok(CourierSummary::from(&courier))
    }
}

impl<B> CourierApi<B>
where B: CourierManagement + OrderManagement
{
    pub async fn fetch_courier(&self, courier_id: CourierId) -> Result<Option<Courier>, DeliveryError> {
        self.db.fetch_courier(courier_id).await
    }

    /// The courier's details, earnings and rating. There is no rating until the courier has delivered something.
    pub async fn courier_profile(&self, courier_id: CourierId) -> Result<CourierProfile, DeliveryError> {
        let courier = self.db.fetch_courier(courier_id).await?.ok_or(DeliveryError::CourierNotFound(courier_id))?;
        let deliveries = self.db.fetch_completed_deliveries(courier_id).await?;
        let rating = rating(&deliveries);
        trace!("🚚️ Courier {courier_id} has {} deliveries. Rating: {rating:?}", deliveries.len());
        Ok(CourierProfile { courier: CourierSummary::from(&courier), rating, earnings: courier.earnings.value() })
    }
}
