//! Report generation.
//!
//! Runs the four aggregation queries against a [`ReportSource`], then joins
//! their sparse results onto the full bucket list so every bucket in the
//! range gets exactly one row.

use super::aggregator::{BucketMap, ItemBucket, OrderBucket, UserBucket};
use super::periods::generate_periods;
use super::source::ReportSource;
use crate::error::ReportError;
use crate::models::{Granularity, ReportRow};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info};

/// Generates a dense report for `[start, end)`.
///
/// `period` must be `daily`, `weekly` or `monthly`; anything else fails with
/// [`ReportError::InvalidGranularity`] before the source is queried.
pub fn generate_report<S>(
    source: &S,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    period: &str,
) -> Result<Vec<ReportRow>, ReportError>
where
    S: ReportSource + ?Sized,
{
    let granularity: Granularity = period.parse()?;
    generate_report_with(source, start, end, granularity)
}

/// Generates a dense report for `[start, end)` with an already parsed granularity.
pub fn generate_report_with<S>(
    source: &S,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    granularity: Granularity,
) -> Result<Vec<ReportRow>, ReportError>
where
    S: ReportSource + ?Sized,
{
    info!("Generating {} report from {} to {}", granularity, start, end);

    let periods = generate_periods(start, end, granularity);
    if periods.is_empty() {
        debug!("Empty range, skipping aggregation");
        return Ok(Vec::new());
    }

    let ((users, orders), (items_a, items_b)) = rayon::join(
        || {
            rayon::join(
                || source.user_stats(start, end, granularity),
                || source.order_stats(start, end, granularity),
            )
        },
        || {
            rayon::join(
                || source.item_a_stats(start, end, granularity),
                || source.item_b_stats(start, end, granularity),
            )
        },
    );

    let users = users?;
    let orders = orders?;
    let items_a = items_a?;
    let items_b = items_b?;

    debug!(
        "Sparse buckets: users={}, orders={}, items_a={}, items_b={}",
        users.len(),
        orders.len(),
        items_a.len(),
        items_b.len()
    );

    let rows = merge_statistics(&periods, &users, &orders, &items_a, &items_b);
    info!("Report generated with {} periods", rows.len());

    Ok(rows)
}

/// Joins sparse per-stream statistics onto the ordered bucket list.
///
/// Buckets missing from a mapping count as zero.
pub fn merge_statistics(
    periods: &[NaiveDate],
    users: &BucketMap<UserBucket>,
    orders: &BucketMap<OrderBucket>,
    items_a: &BucketMap<ItemBucket>,
    items_b: &BucketMap<ItemBucket>,
) -> Vec<ReportRow> {
    periods
        .iter()
        .map(|period| {
            let user = users.get(period).copied().unwrap_or_default();
            let order = orders.get(period).copied().unwrap_or_default();
            let item_a = items_a.get(period).copied().unwrap_or_default();
            let item_b = items_b.get(period).copied().unwrap_or_default();

            ReportRow {
                period: *period,
                new_users: user.new_users,
                activated_users: user.activated_users,
                orders_count: order.orders_count,
                item_a_count: item_a.count,
                item_a_amount: item_a.amount,
                item_b_count: item_b.count,
                item_b_amount: item_b.amount,
                total_amount: item_a.amount + item_b.amount,
            }
        })
        .collect()
}
