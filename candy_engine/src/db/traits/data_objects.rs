/// The outcome of trying to hand an order to a courier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimResult {
    Claimed,
    /// Somebody else got there first, or the order was already delivered.
    Taken,
}
