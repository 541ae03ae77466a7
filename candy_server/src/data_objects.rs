use candy_engine::{
    db_types::{Assignment, OrderId},
    helpers::format_timestamp,
    Batch,
};
use log::*;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

/// The envelope for batch creation requests. Records are kept as raw JSON so that each one can be read (or rejected)
/// on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchRequest {
    pub data: Vec<Value>,
}

impl BatchRequest {
    /// Reads every record into a draft. Records that do not deserialize are noted against the id found under
    /// `id_field`, if there is one.
    pub fn into_batch<T: DeserializeOwned>(self, id_field: &str) -> Batch<T> {
        let mut batch = Batch::new();
        for value in self.data {
            let id = value.get(id_field).and_then(Value::as_i64);
            match serde_json::from_value::<T>(value) {
                Ok(draft) => batch.push(draft),
                Err(e) => {
                    debug!("💻️ Could not read record {id:?}. {e}");
                    batch.push_unreadable(id, e.to_string());
                },
            }
        }
        batch
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRecord {
    pub id: i64,
}

impl IdRecord {
    pub fn list<I: IntoIterator<Item = i64>>(ids: I) -> Vec<Self> {
        ids.into_iter().map(|id| Self { id }).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedCouriers {
    pub couriers: Vec<IdRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedOrders {
    pub orders: Vec<IdRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssignRequest {
    pub courier_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignResponse {
    pub orders: Vec<IdRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assign_time: Option<String>,
}

impl From<Assignment> for AssignResponse {
    fn from(assignment: Assignment) -> Self {
        let assign_time = match assignment.is_empty() {
            true => None,
            false => assignment.assign_time.as_ref().map(format_timestamp),
        };
        Self { orders: IdRecord::list(assignment.orders.iter().map(OrderId::value)), assign_time }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompleteRequest {
    pub courier_id: i64,
    pub order_id: i64,
    pub complete_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteResponse {
    pub order_id: i64,
}
