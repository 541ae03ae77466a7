use chrono::NaiveDateTime;
use log::debug;

use crate::{
    db::traits::DeliveryError,
    db_types::{Courier, Order},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The delivery was recorded and took this many seconds.
    Recorded(i64),
    /// The order had already been delivered. Nothing changed.
    AlreadyRecorded,
}

/// The instant a delivery is timed from: the previous delivery in the current batch, or the start of the batch if
/// this is the first one.
pub fn reference_time(courier: &Courier) -> Option<NaiveDateTime> {
    match (courier.assign_time, courier.last_completed) {
        (Some(assigned), Some(last)) if last > assigned => Some(last),
        (Some(assigned), _) => Some(assigned),
        (None, last) => last,
    }
}

/// Whole seconds from `reference` to `at`, or `None` if `at` comes first.
pub fn elapsed_seconds(reference: NaiveDateTime, at: NaiveDateTime) -> Option<i64> {
    if at < reference {
        return None;
    }
    Some((at - reference).num_seconds())
}

/// Marks `order` as delivered by `courier` at `completed_at`.
///
/// The courier must hold the order in its current batch. On success the order leaves the batch, the courier is paid
/// according to its current type, and the delivery time is stored on the order.
pub fn complete_delivery(
    courier: &mut Courier,
    order: &mut Order,
    completed_at: NaiveDateTime,
) -> Result<Completion, DeliveryError> {
    if order.courier_id != Some(courier.id) {
        return Err(DeliveryError::OrderNotAssigned { order_id: order.id, courier_id: courier.id });
    }
    if order.completed {
        return Ok(Completion::AlreadyRecorded);
    }
    if !courier.holds(order.id) {
        return Err(DeliveryError::OrderNotAssigned { order_id: order.id, courier_id: courier.id });
    }
    let reference = reference_time(courier).ok_or(DeliveryError::MissingAssignTime(courier.id))?;
    let seconds = elapsed_seconds(reference, completed_at)
        .ok_or(DeliveryError::CompletionBeforeStart { completed_at, reference })?;
    courier.assigns.retain(|id| *id != order.id);
    courier.completed.push(order.id);
    courier.last_completed = Some(completed_at);
    courier.earnings += courier.courier_type.payout();
    order.completed = true;
    order.complete_time = Some(seconds);
    debug!("🚚️ Courier {} delivered order {} in {seconds}s. Earnings now {}", courier.id, order.id, courier.earnings);
    Ok(Completion::Recorded(seconds))
}
