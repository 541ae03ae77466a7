use candy_common::Kilograms;
use serde::{Deserialize, Serialize};

use crate::{
    db_types::{NewOrder, OrderId},
    delivery_api::{
        batch_objects::{Draft, FieldError},
        courier_objects::parse_intervals,
    },
};

pub const MIN_ORDER_WEIGHT: f64 = 0.01;
pub const MAX_ORDER_WEIGHT: f64 = 50.0;

/// An order registration, exactly as submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderDraft {
    pub order_id: i64,
    pub weight: f64,
    pub region: i64,
    pub delivery_hours: Vec<String>,
}

impl Draft for OrderDraft {
    type Record = NewOrder;

    fn record_id(&self) -> i64 {
        self.order_id
    }

    fn validate(self) -> Result<NewOrder, Vec<FieldError>> {
        let mut errors = Vec::new();
        if !(MIN_ORDER_WEIGHT..=MAX_ORDER_WEIGHT).contains(&self.weight) {
            errors.push(FieldError::new(
                "weight",
                format!("{} is outside {MIN_ORDER_WEIGHT}-{MAX_ORDER_WEIGHT}kg", self.weight),
            ));
        }
        if self.region < 0 {
            errors.push(FieldError::new("region", format!("region {} is negative", self.region)));
        }
        let delivery_hours = parse_intervals("delivery_hours", &self.delivery_hours).map_err(|e| errors.extend(e)).ok();
        match delivery_hours {
            Some(delivery_hours) if errors.is_empty() => Ok(NewOrder {
                id: OrderId(self.order_id),
                weight: Kilograms::from(self.weight),
                region: self.region,
                delivery_hours,
            }),
            _ => Err(errors),
        }
    }
}
