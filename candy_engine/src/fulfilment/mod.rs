//! The delivery rules, free of any storage concerns.
//!
//! * [`matching`] decides which orders a courier can take on next.
//! * [`completion`] records a delivery against a courier's batch and times it.
//! * [`rating`] turns a courier's delivery times into a score.
mod completion;
mod matching;
mod rating;

pub use completion::{complete_delivery, elapsed_seconds, reference_time, Completion};
pub use matching::Matcher;
pub use rating::{rating, MAX_RATING, RATING_CEILING_SECONDS};
