use candy_engine::{db_types::Assignment, CourierApi, DeliveryError, OrderFlowApi, SqliteDatabase};
use cucumber::World;
use log::*;
use tokio::time::sleep;

use crate::support::prepare_env::{prepare_test_env, random_db_path};

#[derive(Default, Debug, World)]
pub struct DeliveryWorld {
    pub system: Option<DeliverySystem>,
    pub last_assignment: Option<Assignment>,
    pub last_error: Option<DeliveryError>,
}

#[derive(Debug)]
pub struct DeliverySystem {
    pub db_path: String,
    pub couriers: CourierApi<SqliteDatabase>,
    pub orders: OrderFlowApi<SqliteDatabase>,
}

impl DeliveryWorld {
    pub fn couriers(&self) -> &CourierApi<SqliteDatabase> {
        &self.system.as_ref().expect("CourierApi not initialised").couriers
    }

    pub fn orders(&self) -> &OrderFlowApi<SqliteDatabase> {
        &self.system.as_ref().expect("OrderFlowApi not initialised").orders
    }
}

impl DeliverySystem {
    pub async fn new() -> Self {
        let url = random_db_path();
        prepare_test_env(&url).await;
        let db = SqliteDatabase::new_with_url(&url, 1).await.expect("Error creating connection to database");
        debug!("Created database: {url}");
        sleep(std::time::Duration::from_millis(50)).await;
        Self { db_path: url, couriers: CourierApi::new(db.clone()), orders: OrderFlowApi::new(db) }
    }
}
