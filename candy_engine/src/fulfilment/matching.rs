use candy_common::Kilograms;
use log::trace;

use crate::{
    db_types::{Courier, Order},
    helpers::TimeInterval,
};

/// Tracks what a courier is carrying while orders are offered to it one at a time.
///
/// Offer candidates in ascending id order with [`Matcher::delivery_window`]. When it returns a window the courier can
/// take the order; call [`Matcher::accept`] once the order is actually yours, so that later candidates see the extra
/// load.
#[derive(Debug, Clone)]
pub struct Matcher<'c> {
    courier: &'c Courier,
    load: Kilograms,
}

impl<'c> Matcher<'c> {
    /// A matcher for a courier that already carries `held`.
    pub fn new(courier: &'c Courier, held: &[Order]) -> Self {
        let load = held.iter().map(|o| o.weight).sum();
        Self { courier, load }
    }

    /// A matcher for a courier carrying nothing.
    pub fn idle(courier: &'c Courier) -> Self {
        Self { courier, load: Kilograms::default() }
    }

    pub fn load(&self) -> Kilograms {
        self.load
    }

    pub fn can_carry(&self, weight: Kilograms) -> bool {
        (self.load + weight).fits_within(self.courier.max_weight())
    }

    /// The first of the order's delivery windows that meets one of the courier's working windows, provided the order is
    /// in a region the courier serves and still fits in the courier's bag. `None` means the courier cannot take it.
    pub fn delivery_window(&self, order: &Order) -> Option<TimeInterval> {
        if !self.courier.serves_region(order.region) {
            return None;
        }
        self.carry_window(order)
    }

    /// As [`Matcher::delivery_window`], but without the region test. Orders a courier already holds are re-checked
    /// with this after the courier changes, so only capacity and hours decide whether it keeps them.
    pub fn carry_window(&self, order: &Order) -> Option<TimeInterval> {
        if !self.can_carry(order.weight) {
            return None;
        }
        let window = order
            .delivery_hours
            .iter()
            .find(|d| self.courier.working_hours.iter().any(|w| d.overlaps(w)))
            .copied();
        if let Some(w) = window {
            trace!("🚚️ Order {} fits courier {} during {w}", order.id, self.courier.id);
        }
        window
    }

    pub fn accept(&mut self, order: &Order) {
        self.load += order.weight;
    }
}
