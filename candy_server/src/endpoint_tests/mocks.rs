use candy_engine::{
    db_types::{Assignment, CompletedDelivery, Courier, CourierId, CourierUpdate, NewCourier, NewOrder, Order, OrderId},
    CourierManagement,
    DeliveryDatabase,
    DeliveryError,
    OrderManagement,
};
use chrono::NaiveDateTime;
use mockall::mock;

mock! {
    pub Store {}
    impl CourierManagement for Store {
        async fn fetch_courier(&self, courier_id: CourierId) -> Result<Option<Courier>, DeliveryError>;
        async fn existing_courier_ids(&self, ids: &[CourierId]) -> Result<Vec<CourierId>, DeliveryError>;
    }
    impl OrderManagement for Store {
        async fn fetch_order(&self, order_id: OrderId) -> Result<Option<Order>, DeliveryError>;
        async fn existing_order_ids(&self, ids: &[OrderId]) -> Result<Vec<OrderId>, DeliveryError>;
        async fn fetch_completed_deliveries(&self, courier_id: CourierId) -> Result<Vec<CompletedDelivery>, DeliveryError>;
    }
    impl DeliveryDatabase for Store {
        fn url(&self) -> &str;
        async fn insert_couriers(&self, couriers: Vec<NewCourier>) -> Result<Vec<CourierId>, DeliveryError>;
        async fn insert_orders(&self, orders: Vec<NewOrder>) -> Result<Vec<OrderId>, DeliveryError>;
        async fn assign_orders(&self, courier_id: CourierId, now: NaiveDateTime) -> Result<Assignment, DeliveryError>;
        async fn update_courier(&self, courier_id: CourierId, update: CourierUpdate) -> Result<Courier, DeliveryError>;
        async fn complete_order(&self, courier_id: CourierId, order_id: OrderId, completed_at: NaiveDateTime) -> Result<OrderId, DeliveryError>;
    }
}
