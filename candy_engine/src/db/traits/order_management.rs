use crate::{
    db::traits::DeliveryError,
    db_types::{CompletedDelivery, CourierId, Order, OrderId},
};

/// Read-only queries over orders and delivery history.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// Fetches the order with the given id. If no such order exists, `None` is returned.
    async fn fetch_order(&self, order_id: OrderId) -> Result<Option<Order>, DeliveryError>;

    /// Returns the subset of `ids` that are already registered.
    async fn existing_order_ids(&self, ids: &[OrderId]) -> Result<Vec<OrderId>, DeliveryError>;

    /// Every order the courier has delivered, in ascending id order.
    async fn fetch_completed_deliveries(&self, courier_id: CourierId) -> Result<Vec<CompletedDelivery>, DeliveryError>;
}
