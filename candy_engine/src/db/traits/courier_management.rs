use crate::{
    db::traits::DeliveryError,
    db_types::{Courier, CourierId},
};

/// Read-only queries over the couriers in the system.
#[allow(async_fn_in_trait)]
pub trait CourierManagement {
    /// Fetches the courier with the given id. If no such courier exists, `None` is returned.
    async fn fetch_courier(&self, courier_id: CourierId) -> Result<Option<Courier>, DeliveryError>;

    async fn courier_exists(&self, courier_id: CourierId) -> Result<bool, DeliveryError> {
        Ok(self.fetch_courier(courier_id).await?.is_some())
    }

    /// Returns the subset of `ids` that are already registered.
    async fn existing_courier_ids(&self, ids: &[CourierId]) -> Result<Vec<CourierId>, DeliveryError>;
}
