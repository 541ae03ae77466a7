use serde::{Deserialize, Serialize};

use crate::{
    db::traits::DeliveryError,
    db_types::{Courier, CourierId, CourierType, CourierUpdate, NewCourier},
    delivery_api::batch_objects::{Draft, FieldError},
    helpers::TimeInterval,
};

/// A courier registration, exactly as submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CourierDraft {
    pub courier_id: i64,
    pub courier_type: String,
    pub regions: Vec<i64>,
    pub working_hours: Vec<String>,
}

impl Draft for CourierDraft {
    type Record = NewCourier;

    fn record_id(&self) -> i64 {
        self.courier_id
    }

    fn validate(self) -> Result<NewCourier, Vec<FieldError>> {
        let mut errors = Vec::new();
        let courier_type = parse_courier_type(&self.courier_type).map_err(|e| errors.push(e)).ok();
        validate_regions(&self.regions).unwrap_or_else(|e| errors.push(e));
        let working_hours = parse_working_hours(&self.working_hours).map_err(|e| errors.extend(e)).ok();
        match (courier_type, working_hours) {
            (Some(courier_type), Some(working_hours)) if errors.is_empty() => Ok(NewCourier {
                id: CourierId(self.courier_id),
                courier_type,
                regions: self.regions,
                working_hours,
            }),
            _ => Err(errors),
        }
    }
}

/// A partial courier change, exactly as submitted. Absent (or `null`) fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CourierUpdateDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courier_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regions: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_hours: Option<Vec<String>>,
}

impl CourierUpdateDraft {
    /// Applies the same field rules as registration. An update that changes nothing is an error.
    pub fn validate(self) -> Result<CourierUpdate, DeliveryError> {
        let mut errors = Vec::new();
        let mut update = CourierUpdate::default();
        if let Some(courier_type) = self.courier_type {
            match parse_courier_type(&courier_type) {
                Ok(t) => update = update.with_courier_type(t),
                Err(e) => errors.push(e),
            }
        }
        if let Some(regions) = self.regions {
            match validate_regions(&regions) {
                Ok(()) => update = update.with_regions(regions),
                Err(e) => errors.push(e),
            }
        }
        if let Some(working_hours) = self.working_hours {
            match parse_working_hours(&working_hours) {
                Ok(hours) => update = update.with_working_hours(hours),
                Err(e) => errors.extend(e),
            }
        }
        if !errors.is_empty() {
            let details = errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ");
            return Err(DeliveryError::InvalidUpdate(details));
        }
        if update.is_empty() {
            return Err(DeliveryError::EmptyUpdate);
        }
        Ok(update)
    }
}

/// What a courier looks like from the outside, without any performance figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourierSummary {
    pub courier_id: CourierId,
    pub courier_type: CourierType,
    pub regions: Vec<i64>,
    pub working_hours: Vec<TimeInterval>,
}

impl From<&Courier> for CourierSummary {
    fn from(courier: &Courier) -> Self {
        Self {
            courier_id: courier.id,
            courier_type: courier.courier_type,
            regions: courier.regions.clone(),
            working_hours: courier.working_hours.clone(),
        }
    }
}

/// A courier together with its earnings and, once it has delivered something, its rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourierProfile {
    #[serde(flatten)]
    pub courier: CourierSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    pub earnings: i64,
}

fn parse_courier_type(value: &str) -> Result<CourierType, FieldError> {
    value.parse::<CourierType>().map_err(|e| FieldError::new("courier_type", e.to_string()))
}

fn validate_regions(regions: &[i64]) -> Result<(), FieldError> {
    if regions.is_empty() {
        return Err(FieldError::new("regions", "at least one region is required"));
    }
    match regions.iter().find(|r| **r < 0) {
        Some(r) => Err(FieldError::new("regions", format!("region {r} is negative"))),
        None => Ok(()),
    }
}

/// Also used for order delivery hours.
pub(crate) fn parse_intervals(field: &'static str, values: &[String]) -> Result<Vec<TimeInterval>, Vec<FieldError>> {
    if values.is_empty() {
        return Err(vec![FieldError::new(field, "at least one interval is required")]);
    }
    let mut errors = Vec::new();
    let mut intervals = Vec::with_capacity(values.len());
    for value in values {
        match value.parse::<TimeInterval>() {
            Ok(i) => intervals.push(i),
            Err(e) => errors.push(FieldError::new(field, e.to_string())),
        }
    }
    if errors.is_empty() {
        Ok(intervals)
    } else {
        Err(errors)
    }
}

fn parse_working_hours(values: &[String]) -> Result<Vec<TimeInterval>, Vec<FieldError>> {
    parse_intervals("working_hours", values)
}
