use candy_common::Kilograms;
use log::{debug, trace};
use sqlx::{types::Json, FromRow, QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    db::traits::{ClaimResult, DeliveryError},
    db_types::{CompletedDelivery, Courier, CourierId, NewOrder, Order, OrderId},
    helpers::TimeInterval,
};

const ORDER_COLUMNS: &str = "id, weight, region, delivery_hours, courier_id, completed, complete_time";

#[derive(Debug, FromRow)]
struct OrderRow {
    id: i64,
    weight: f64,
    region: i64,
    delivery_hours: Json<Vec<TimeInterval>>,
    courier_id: Option<i64>,
    completed: bool,
    complete_time: Option<i64>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: OrderId(row.id),
            weight: Kilograms::from(row.weight),
            region: row.region,
            delivery_hours: row.delivery_hours.0,
            courier_id: row.courier_id.map(CourierId),
            completed: row.completed,
            complete_time: row.complete_time,
        }
    }
}

#[derive(Debug, FromRow)]
struct CompletedRow {
    id: i64,
    region: i64,
    complete_time: i64,
}

/// Inserts a new order using the given connection. This is not atomic. You can embed this call inside a
/// transaction if you need to ensure atomicity, and pass `&mut *tx` as the connection argument.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<OrderId, DeliveryError> {
    let result = sqlx::query(
        r#"
            INSERT INTO orders (id, weight, region, delivery_hours)
            VALUES ($1, $2, $3, $4);
        "#,
    )
    .bind(order.id)
    .bind(order.weight)
    .bind(order.region)
    .bind(Json(&order.delivery_hours))
    .execute(conn)
    .await;
    match result {
        Ok(_) => {
            trace!("🗃️ Order {} inserted", order.id);
            Ok(order.id)
        },
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(DeliveryError::OrderAlreadyExists(order.id)),
        Err(e) => Err(e.into()),
    }
}

pub async fn fetch_order(id: OrderId, conn: &mut SqliteConnection) -> Result<Option<Order>, DeliveryError> {
    let order = sqlx::query_as::<_, OrderRow>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
        .bind(id)
        .fetch_optional(conn)
        .await?
        .map(Order::from);
    Ok(order)
}

/// Fetches the given orders, returned in the same sequence as `ids`. Ids without a record are left out.
pub async fn fetch_orders(ids: &[OrderId], conn: &mut SqliteConnection) -> Result<Vec<Order>, DeliveryError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut builder = QueryBuilder::<Sqlite>::new(format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id IN ("));
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
    let mut orders =
        builder.build_query_as::<OrderRow>().fetch_all(conn).await?.into_iter().map(Order::from).collect::<Vec<_>>();
    orders.sort_by_key(|o| ids.iter().position(|id| *id == o.id));
    Ok(orders)
}

/// Returns those of `ids` that already have an order record.
pub async fn existing_ids(ids: &[OrderId], conn: &mut SqliteConnection) -> Result<Vec<OrderId>, DeliveryError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut builder = QueryBuilder::new("SELECT id FROM orders WHERE id IN (");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(") ORDER BY id");
    let found = builder.build_query_scalar::<OrderId>().fetch_all(conn).await?;
    Ok(found)
}

/// Unclaimed, undelivered orders in the courier's regions that the courier type could carry on its own, in ascending
/// id order.
pub async fn fetch_candidates(courier: &Courier, conn: &mut SqliteConnection) -> Result<Vec<Order>, DeliveryError> {
    if courier.regions.is_empty() {
        return Ok(Vec::new());
    }
    let mut builder = QueryBuilder::<Sqlite>::new(format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE courier_id IS NULL AND completed = FALSE AND weight <= "
    ));
    builder.push_bind(courier.max_weight());
    builder.push(" AND region IN (");
    let mut separated = builder.separated(", ");
    for region in &courier.regions {
        separated.push_bind(*region);
    }
    separated.push_unseparated(") ORDER BY id");
    let candidates =
        builder.build_query_as::<OrderRow>().fetch_all(conn).await?.into_iter().map(Order::from).collect::<Vec<_>>();
    trace!("🗃️ {} candidate orders for courier {}", candidates.len(), courier.id);
    Ok(candidates)
}

/// Hands the order to the courier, but only if nobody holds it and it has not been delivered.
pub async fn claim_order(
    order_id: OrderId,
    courier_id: CourierId,
    conn: &mut SqliteConnection,
) -> Result<ClaimResult, DeliveryError> {
    let result = sqlx::query(
        r#"
            UPDATE orders SET courier_id = $1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $2 AND courier_id IS NULL AND completed = FALSE;
        "#,
    )
    .bind(courier_id)
    .bind(order_id)
    .execute(conn)
    .await?;
    if result.rows_affected() == 1 {
        trace!("🗃️ Order {order_id} claimed by courier {courier_id}");
        Ok(ClaimResult::Claimed)
    } else {
        debug!("🗃️ Order {order_id} could not be claimed by courier {courier_id}. It is no longer available");
        Ok(ClaimResult::Taken)
    }
}

/// Returns an undelivered order held by `courier_id` to the pool.
pub async fn release_order(
    order_id: OrderId,
    courier_id: CourierId,
    conn: &mut SqliteConnection,
) -> Result<(), DeliveryError> {
    sqlx::query(
        r#"
            UPDATE orders SET courier_id = NULL, updated_at = CURRENT_TIMESTAMP
            WHERE id = $1 AND courier_id = $2 AND completed = FALSE;
        "#,
    )
    .bind(order_id)
    .bind(courier_id)
    .execute(conn)
    .await?;
    trace!("🗃️ Order {order_id} released by courier {courier_id}");
    Ok(())
}

pub async fn mark_completed(order: &Order, conn: &mut SqliteConnection) -> Result<(), DeliveryError> {
    sqlx::query(
        r#"
            UPDATE orders SET completed = TRUE, complete_time = $1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $2;
        "#,
    )
    .bind(order.complete_time)
    .bind(order.id)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn fetch_completed_deliveries(
    courier_id: CourierId,
    conn: &mut SqliteConnection,
) -> Result<Vec<CompletedDelivery>, DeliveryError> {
    let rows = sqlx::query_as::<_, CompletedRow>(
        r#"
            SELECT id, region, complete_time FROM orders
            WHERE courier_id = $1 AND completed = TRUE AND complete_time IS NOT NULL
            ORDER BY id;
        "#,
    )
    .bind(courier_id)
    .fetch_all(conn)
    .await?;
    let deliveries = rows
        .into_iter()
        .map(|r| CompletedDelivery { order_id: OrderId(r.id), region: r.region, complete_time: r.complete_time })
        .collect();
    Ok(deliveries)
}
