use std::{fmt::Debug, sync::Arc, time::Duration};

use chrono::NaiveDateTime;
use log::*;
use sqlx::SqlitePool;
use tokio::sync::{Mutex, MutexGuard};

use super::{couriers, db_url, new_pool, orders};
use crate::{
    db::traits::{ClaimResult, CourierManagement, DeliveryDatabase, DeliveryError, OrderManagement},
    db_types::{Assignment, CompletedDelivery, Courier, CourierId, CourierUpdate, NewCourier, NewOrder, Order, OrderId},
    fulfilment::{complete_delivery, Completion, Matcher},
};

pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed store.
///
/// Clones share one pool and one write gate. Every state-changing call holds the gate for the whole of its
/// transaction, so writes are serialised across the process. A call that cannot get the gate within `lock_timeout`
/// fails with [`DeliveryError::StoreBusy`].
#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
    write_gate: Arc<Mutex<()>>,
    lock_timeout: Duration,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Connects to the database named by `CANDY_DATABASE_URL`, or the default location.
    pub async fn new() -> Result<Self, DeliveryError> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), DEFAULT_MAX_CONNECTIONS).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, DeliveryError> {
        let pool = new_pool(url, max_connections).await?;
        info!("🗃️ Connected to {url} with up to {max_connections} connections");
        Ok(Self { url: url.to_string(), pool, write_gate: Arc::new(Mutex::new(())), lock_timeout: DEFAULT_LOCK_TIMEOUT })
    }

    pub fn with_lock_timeout(mut self, lock_timeout: Duration) -> Self {
        self.lock_timeout = lock_timeout;
        self
    }

    /// Brings the schema up to date.
    pub async fn migrate(&self) -> Result<(), DeliveryError> {
        sqlx::migrate!("./src/db/sqlite/migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DeliveryError::DatabaseError(format!("Migration failed: {e}")))?;
        info!("🗃️ Database schema is up to date");
        Ok(())
    }

    async fn write_lock(&self) -> Result<MutexGuard<'_, ()>, DeliveryError> {
        tokio::time::timeout(self.lock_timeout, self.write_gate.lock()).await.map_err(|_| {
            warn!("🗃️ Gave up waiting {}ms for the write gate", self.lock_timeout.as_millis());
            DeliveryError::StoreBusy
        })
    }
}

impl CourierManagement for SqliteDatabase {
    async fn fetch_courier(&self, courier_id: CourierId) -> Result<Option<Courier>, DeliveryError> {
        let mut conn = self.pool.acquire().await?;
        couriers::fetch_courier(courier_id, &mut conn).await
    }

    async fn existing_courier_ids(&self, ids: &[CourierId]) -> Result<Vec<CourierId>, DeliveryError> {
        let mut conn = self.pool.acquire().await?;
        couriers::existing_ids(ids, &mut conn).await
    }
}

impl OrderManagement for SqliteDatabase {
    async fn fetch_order(&self, order_id: OrderId) -> Result<Option<Order>, DeliveryError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_order(order_id, &mut conn).await
    }

    async fn existing_order_ids(&self, ids: &[OrderId]) -> Result<Vec<OrderId>, DeliveryError> {
        let mut conn = self.pool.acquire().await?;
        orders::existing_ids(ids, &mut conn).await
    }

    async fn fetch_completed_deliveries(&self, courier_id: CourierId) -> Result<Vec<CompletedDelivery>, DeliveryError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_completed_deliveries(courier_id, &mut conn).await
    }
}

impl DeliveryDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn insert_couriers(&self, new_couriers: Vec<NewCourier>) -> Result<Vec<CourierId>, DeliveryError> {
        let _gate = self.write_lock().await?;
        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(new_couriers.len());
        for courier in new_couriers {
            ids.push(couriers::insert_courier(courier, &mut tx).await?);
        }
        tx.commit().await?;
        debug!("🗃️ {} couriers registered", ids.len());
        Ok(ids)
    }

    async fn insert_orders(&self, new_orders: Vec<NewOrder>) -> Result<Vec<OrderId>, DeliveryError> {
        let _gate = self.write_lock().await?;
        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(new_orders.len());
        for order in new_orders {
            ids.push(orders::insert_order(order, &mut tx).await?);
        }
        tx.commit().await?;
        debug!("🗃️ {} orders registered", ids.len());
        Ok(ids)
    }

    async fn assign_orders(&self, courier_id: CourierId, now: NaiveDateTime) -> Result<Assignment, DeliveryError> {
        let _gate = self.write_lock().await?;
        let mut tx = self.pool.begin().await?;
        let mut courier =
            couriers::fetch_courier(courier_id, &mut tx).await?.ok_or(DeliveryError::CourierNotFound(courier_id))?;
        let held = orders::fetch_orders(&courier.assigns, &mut tx).await?;
        let candidates = orders::fetch_candidates(&courier, &mut tx).await?;
        let mut claimed = Vec::new();
        let mut matcher = Matcher::new(&courier, &held);
        for order in &candidates {
            if matcher.delivery_window(order).is_none() {
                continue;
            }
            match orders::claim_order(order.id, courier_id, &mut tx).await? {
                ClaimResult::Claimed => {
                    matcher.accept(order);
                    claimed.push(order.id);
                },
                ClaimResult::Taken => warn!("🗃️ Order {} was taken before courier {courier_id} could claim it", order.id),
            }
        }
        trace!("🗃️ Courier {courier_id} is carrying {} after matching", matcher.load());
        if !claimed.is_empty() {
            courier.add_to_batch(&claimed, now);
            couriers::save_courier(&courier, &mut tx).await?;
        }
        tx.commit().await?;
        debug!("🗃️ Courier {courier_id} received {} new orders. Batch is now {:?}", claimed.len(), courier.assigns);
        Ok(Assignment::from(&courier))
    }

    async fn update_courier(&self, courier_id: CourierId, update: CourierUpdate) -> Result<Courier, DeliveryError> {
        let _gate = self.write_lock().await?;
        let mut tx = self.pool.begin().await?;
        let mut courier =
            couriers::fetch_courier(courier_id, &mut tx).await?.ok_or(DeliveryError::CourierNotFound(courier_id))?;
        update.apply_to(&mut courier);
        let held_ids = courier.release_batch();
        let held = orders::fetch_orders(&held_ids, &mut tx).await?;
        for order in &held {
            orders::release_order(order.id, courier_id, &mut tx).await?;
        }
        let mut kept = Vec::new();
        let mut matcher = Matcher::idle(&courier);
        for order in &held {
            if matcher.carry_window(order).is_none() {
                debug!("🗃️ Order {} no longer suits courier {courier_id}. Releasing it", order.id);
                continue;
            }
            match orders::claim_order(order.id, courier_id, &mut tx).await? {
                ClaimResult::Claimed => {
                    matcher.accept(order);
                    kept.push(order.id);
                },
                ClaimResult::Taken => warn!("🗃️ Order {} could not be reclaimed by courier {courier_id}", order.id),
            }
        }
        courier.assigns = kept;
        couriers::save_courier(&courier, &mut tx).await?;
        tx.commit().await?;
        info!(
            "🗃️ Courier {courier_id} updated. Kept {} of {} held orders",
            courier.assigns.len(),
            held_ids.len()
        );
        Ok(courier)
    }

    async fn complete_order(
        &self,
        courier_id: CourierId,
        order_id: OrderId,
        completed_at: NaiveDateTime,
    ) -> Result<OrderId, DeliveryError> {
        let _gate = self.write_lock().await?;
        let mut tx = self.pool.begin().await?;
        let mut order = orders::fetch_order(order_id, &mut tx).await?.ok_or(DeliveryError::OrderNotFound(order_id))?;
        if order.courier_id != Some(courier_id) {
            return Err(DeliveryError::OrderNotAssigned { order_id, courier_id });
        }
        let mut courier =
            couriers::fetch_courier(courier_id, &mut tx).await?.ok_or(DeliveryError::CourierNotFound(courier_id))?;
        match complete_delivery(&mut courier, &mut order, completed_at)? {
            Completion::AlreadyRecorded => {
                debug!("🗃️ Order {order_id} was already delivered by courier {courier_id}");
            },
            Completion::Recorded(seconds) => {
                couriers::save_courier(&courier, &mut tx).await?;
                orders::mark_completed(&order, &mut tx).await?;
                tx.commit().await?;
                info!("🗃️ Order {order_id} delivered by courier {courier_id} in {seconds}s");
            },
        }
        Ok(order_id)
    }

    async fn close(&mut self) -> Result<(), DeliveryError> {
        self.pool.close().await;
        Ok(())
    }
}
