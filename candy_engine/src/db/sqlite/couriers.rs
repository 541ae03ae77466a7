use candy_common::Earnings;
use chrono::NaiveDateTime;
use log::{debug, trace};
use sqlx::{types::Json, FromRow, QueryBuilder, SqliteConnection};

use crate::{
    db::traits::DeliveryError,
    db_types::{Courier, CourierId, NewCourier, OrderId},
    helpers::TimeInterval,
};

#[derive(Debug, FromRow)]
struct CourierRow {
    id: i64,
    courier_type: String,
    regions: Json<Vec<i64>>,
    working_hours: Json<Vec<TimeInterval>>,
    assign_time: Option<NaiveDateTime>,
    assigns: Json<Vec<OrderId>>,
    completed: Json<Vec<OrderId>>,
    last_completed: Option<NaiveDateTime>,
    earnings: i64,
}

impl TryFrom<CourierRow> for Courier {
    type Error = DeliveryError;

    fn try_from(row: CourierRow) -> Result<Self, Self::Error> {
        let courier_type = row
            .courier_type
            .parse()
            .map_err(|e| DeliveryError::CorruptRecord(format!("Courier #{}: {e}", row.id)))?;
        Ok(Self {
            id: CourierId(row.id),
            courier_type,
            regions: row.regions.0,
            working_hours: row.working_hours.0,
            assign_time: row.assign_time,
            assigns: row.assigns.0,
            completed: row.completed.0,
            last_completed: row.last_completed,
            earnings: Earnings::from(row.earnings),
        })
    }
}

/// Inserts a new courier using the given connection. This is not atomic. You can embed this call inside a
/// transaction if you need to ensure atomicity, and pass `&mut *tx` as the connection argument.
pub async fn insert_courier(courier: NewCourier, conn: &mut SqliteConnection) -> Result<CourierId, DeliveryError> {
    let result = sqlx::query(
        r#"
            INSERT INTO couriers (id, courier_type, regions, working_hours)
            VALUES ($1, $2, $3, $4);
        "#,
    )
    .bind(courier.id)
    .bind(courier.courier_type.to_string())
    .bind(Json(&courier.regions))
    .bind(Json(&courier.working_hours))
    .execute(conn)
    .await;
    match result {
        Ok(_) => {
            trace!("🗃️ Courier {} inserted", courier.id);
            Ok(courier.id)
        },
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(DeliveryError::CourierAlreadyExists(courier.id)),
        Err(e) => Err(e.into()),
    }
}

pub async fn fetch_courier(id: CourierId, conn: &mut SqliteConnection) -> Result<Option<Courier>, DeliveryError> {
    let row = sqlx::query_as::<_, CourierRow>(
        r#"
            SELECT id, courier_type, regions, working_hours, assign_time, assigns, completed, last_completed, earnings
            FROM couriers
            WHERE id = $1;
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;
    row.map(Courier::try_from).transpose()
}

/// Returns those of `ids` that already have a courier record.
pub async fn existing_ids(ids: &[CourierId], conn: &mut SqliteConnection) -> Result<Vec<CourierId>, DeliveryError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut builder = QueryBuilder::new("SELECT id FROM couriers WHERE id IN (");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(") ORDER BY id");
    let found = builder.build_query_scalar::<CourierId>().fetch_all(conn).await?;
    Ok(found)
}

/// Writes every mutable courier field back to the store.
pub async fn save_courier(courier: &Courier, conn: &mut SqliteConnection) -> Result<(), DeliveryError> {
    let result = sqlx::query(
        r#"
            UPDATE couriers SET
                courier_type = $1,
                regions = $2,
                working_hours = $3,
                assign_time = $4,
                assigns = $5,
                completed = $6,
                last_completed = $7,
                earnings = $8,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $9;
        "#,
    )
    .bind(courier.courier_type.to_string())
    .bind(Json(&courier.regions))
    .bind(Json(&courier.working_hours))
    .bind(courier.assign_time)
    .bind(Json(&courier.assigns))
    .bind(Json(&courier.completed))
    .bind(courier.last_completed)
    .bind(courier.earnings)
    .bind(courier.id)
    .execute(conn)
    .await?;
    if result.rows_affected() == 0 {
        return Err(DeliveryError::CourierNotFound(courier.id));
    }
    debug!("🗃️ Courier {} saved. {} orders outstanding", courier.id, courier.assigns.len());
    Ok(())
}
