//! Grouped aggregation queries the report engine needs from a record store.

use super::aggregator::{BucketMap, ItemBucket, OrderBucket, UserBucket};
use crate::error::SourceError;
use crate::models::Granularity;
use chrono::{DateTime, Utc};

/// A record store able to answer grouped aggregation queries.
///
/// Every query selects records whose timestamp lies in `[start, end)`,
/// buckets them with [`Granularity::truncate`] and returns only non-empty
/// buckets. Implementations must be safe to query from several threads at
/// once; the engine runs the four queries in parallel.
pub trait ReportSource: Sync {
    /// Users by `joined_at`: all new users and the active subset.
    fn user_stats(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        granularity: Granularity,
    ) -> Result<BucketMap<UserBucket>, SourceError>;

    /// Orders by `created_at`.
    fn order_stats(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        granularity: Granularity,
    ) -> Result<BucketMap<OrderBucket>, SourceError>;

    /// Single-price items by their own `created_at`, summing `price`.
    fn item_a_stats(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        granularity: Granularity,
    ) -> Result<BucketMap<ItemBucket>, SourceError>;

    /// Two-part items by their own `created_at`, summing
    /// `placement_price + article_price` per item.
    fn item_b_stats(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        granularity: Granularity,
    ) -> Result<BucketMap<ItemBucket>, SourceError>;
}
