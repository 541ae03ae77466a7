use std::{fmt::Display, str::FromStr};

use candy_common::{Earnings, Kilograms};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

use crate::helpers::TimeInterval;

/// Per-delivery payout base. A courier earns `PAYOUT_BASE * coefficient` for every completed order.
pub const PAYOUT_BASE: i64 = 500;

//--------------------------------------     CourierId       ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct CourierId(pub i64);

impl CourierId {
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for CourierId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Display for CourierId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

//--------------------------------------      OrderId        ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct OrderId(pub i64);

impl OrderId {
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for OrderId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

//--------------------------------------    CourierType      ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourierType {
    Foot,
    Bike,
    Car,
}

#[derive(Debug, Clone, Error)]
#[error("Invalid conversion: {0}")]
pub struct ConversionError(String);

impl CourierType {
    /// The heaviest total load a courier of this type may carry at any one time.
    pub fn max_weight(&self) -> Kilograms {
        match self {
            CourierType::Foot => Kilograms::from(10.0),
            CourierType::Bike => Kilograms::from(12.0),
            CourierType::Car => Kilograms::from(50.0),
        }
    }

    pub fn payout_coefficient(&self) -> i64 {
        match self {
            CourierType::Foot => 2,
            CourierType::Bike => 5,
            CourierType::Car => 9,
        }
    }

    /// What a courier of this type earns for one delivery.
    pub fn payout(&self) -> Earnings {
        Earnings::from(PAYOUT_BASE) * self.payout_coefficient()
    }
}

impl Display for CourierType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CourierType::Foot => write!(f, "foot"),
            CourierType::Bike => write!(f, "bike"),
            CourierType::Car => write!(f, "car"),
        }
    }
}

impl FromStr for CourierType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "foot" => Ok(Self::Foot),
            "bike" => Ok(Self::Bike),
            "car" => Ok(Self::Car),
            s => Err(ConversionError(format!("'{s}' is not a courier type. Expected one of foot, bike or car"))),
        }
    }
}

//--------------------------------------      Courier        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Courier {
    pub id: CourierId,
    pub courier_type: CourierType,
    pub regions: Vec<i64>,
    pub working_hours: Vec<TimeInterval>,
    /// When the current batch was handed out. Only meaningful while `assigns` is not empty.
    pub assign_time: Option<NaiveDateTime>,
    /// Orders in the current batch that have not been delivered yet, in the order they were assigned.
    pub assigns: Vec<OrderId>,
    pub completed: Vec<OrderId>,
    pub last_completed: Option<NaiveDateTime>,
    pub earnings: Earnings,
}

impl Courier {
    pub fn max_weight(&self) -> Kilograms {
        self.courier_type.max_weight()
    }

    pub fn serves_region(&self, region: i64) -> bool {
        self.regions.contains(&region)
    }

    pub fn holds(&self, order_id: OrderId) -> bool {
        self.assigns.contains(&order_id)
    }

    /// Adds freshly claimed orders to the courier's batch. The batch clock only starts when the courier was idle.
    pub fn add_to_batch(&mut self, orders: &[OrderId], now: NaiveDateTime) {
        if orders.is_empty() {
            return;
        }
        if self.assigns.is_empty() {
            self.assign_time = Some(now);
        }
        self.assigns.extend_from_slice(orders);
    }

    /// Empties the batch and hands back what was in it.
    pub fn release_batch(&mut self) -> Vec<OrderId> {
        std::mem::take(&mut self.assigns)
    }
}

impl From<NewCourier> for Courier {
    fn from(value: NewCourier) -> Self {
        Self {
            id: value.id,
            courier_type: value.courier_type,
            regions: value.regions,
            working_hours: value.working_hours,
            assign_time: None,
            assigns: Vec::new(),
            completed: Vec::new(),
            last_completed: None,
            earnings: Earnings::default(),
        }
    }
}

/// A validated courier that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCourier {
    pub id: CourierId,
    pub courier_type: CourierType,
    pub regions: Vec<i64>,
    pub working_hours: Vec<TimeInterval>,
}

/// The parts of a courier that may change after registration. `None` leaves the field alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourierUpdate {
    pub courier_type: Option<CourierType>,
    pub regions: Option<Vec<i64>>,
    pub working_hours: Option<Vec<TimeInterval>>,
}

impl CourierUpdate {
    pub fn is_empty(&self) -> bool {
        self.courier_type.is_none() && self.regions.is_none() && self.working_hours.is_none()
    }

    pub fn with_courier_type(mut self, courier_type: CourierType) -> Self {
        self.courier_type = Some(courier_type);
        self
    }

    pub fn with_regions(mut self, regions: Vec<i64>) -> Self {
        self.regions = Some(regions);
        self
    }

    pub fn with_working_hours(mut self, working_hours: Vec<TimeInterval>) -> Self {
        self.working_hours = Some(working_hours);
        self
    }

    pub fn apply_to(self, courier: &mut Courier) {
        if let Some(courier_type) = self.courier_type {
            courier.courier_type = courier_type;
        }
        if let Some(regions) = self.regions {
            courier.regions = regions;
        }
        if let Some(working_hours) = self.working_hours {
            courier.working_hours = working_hours;
        }
    }
}

//--------------------------------------       Order         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub weight: Kilograms,
    pub region: i64,
    pub delivery_hours: Vec<TimeInterval>,
    /// The courier holding the order. Stays set once the order has been delivered.
    pub courier_id: Option<CourierId>,
    pub completed: bool,
    /// Seconds it took to deliver, measured from the previous delivery or the batch start.
    pub complete_time: Option<i64>,
}

impl Order {
    pub fn is_available(&self) -> bool {
        self.courier_id.is_none() && !self.completed
    }
}

impl From<NewOrder> for Order {
    fn from(value: NewOrder) -> Self {
        Self {
            id: value.id,
            weight: value.weight,
            region: value.region,
            delivery_hours: value.delivery_hours,
            courier_id: None,
            completed: false,
            complete_time: None,
        }
    }
}

/// A validated order that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub id: OrderId,
    pub weight: Kilograms,
    pub region: i64,
    pub delivery_hours: Vec<TimeInterval>,
}

/// One delivered order, as the rating calculation sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletedDelivery {
    pub order_id: OrderId,
    pub region: i64,
    pub complete_time: i64,
}

//--------------------------------------     Assignment      ---------------------------------------------------------
/// The outcome of asking for orders: the courier's whole outstanding batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub orders: Vec<OrderId>,
    /// `None` when the courier holds no orders.
    pub assign_time: Option<NaiveDateTime>,
}

impl Assignment {
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

impl From<&Courier> for Assignment {
    fn from(courier: &Courier) -> Self {
        let assign_time = if courier.assigns.is_empty() { None } else { courier.assign_time };
        Self { orders: courier.assigns.clone(), assign_time }
    }
}
