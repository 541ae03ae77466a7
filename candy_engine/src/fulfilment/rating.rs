use std::collections::BTreeMap;

use crate::db_types::CompletedDelivery;

/// Average delivery times at or beyond this many seconds earn a zero rating.
pub const RATING_CEILING_SECONDS: f64 = 3600.0;
pub const MAX_RATING: f64 = 5.0;

/// Rates a courier on its fastest region.
///
/// Delivery times are averaged per region and the smallest average `t` is taken. The rating is
/// `(3600 - min(t, 3600)) / 3600 * 5`, rounded to two decimals. A courier that never delivered anything has no rating.
pub fn rating(deliveries: &[CompletedDelivery]) -> Option<f64> {
    let mut by_region = BTreeMap::<i64, (i64, u32)>::new();
    for d in deliveries {
        let (total, count) = by_region.entry(d.region).or_default();
        *total += d.complete_time;
        *count += 1;
    }
    let fastest = by_region
        .values()
        .map(|(total, count)| *total as f64 / f64::from(*count))
        .min_by(|a, b| a.total_cmp(b))?;
    let t = fastest.min(RATING_CEILING_SECONDS);
    let score = (RATING_CEILING_SECONDS - t) / RATING_CEILING_SECONDS * MAX_RATING;
    Some((score * 100.0).round() / 100.0)
}
