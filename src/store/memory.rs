//! In-memory record store.

use crate::error::SourceError;
use crate::models::{Dataset, Granularity};
use crate::report::{aggregate_by_bucket, BucketMap, ItemBucket, OrderBucket, ReportSource, UserBucket};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Answers aggregation queries by scanning a loaded [`Dataset`].
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    dataset: Dataset,
}

impl InMemorySource {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }
}

impl From<Dataset> for InMemorySource {
    fn from(dataset: Dataset) -> Self {
        Self::new(dataset)
    }
}

impl ReportSource for InMemorySource {
    fn user_stats(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        granularity: Granularity,
    ) -> Result<BucketMap<UserBucket>, SourceError> {
        let buckets = aggregate_by_bucket(
            &self.dataset.users,
            start,
            end,
            granularity,
            |u| u.joined_at,
            |stats: &mut UserBucket, u| {
                stats.new_users += 1;
                if u.active {
                    stats.activated_users += 1;
                }
            },
        );
        debug!("User stats: {} buckets", buckets.len());
        Ok(buckets)
    }

    fn order_stats(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        granularity: Granularity,
    ) -> Result<BucketMap<OrderBucket>, SourceError> {
        let buckets = aggregate_by_bucket(
            &self.dataset.orders,
            start,
            end,
            granularity,
            |o| o.created_at,
            |stats: &mut OrderBucket, _| stats.orders_count += 1,
        );
        debug!("Order stats: {} buckets", buckets.len());
        Ok(buckets)
    }

    fn item_a_stats(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        granularity: Granularity,
    ) -> Result<BucketMap<ItemBucket>, SourceError> {
        let buckets = aggregate_by_bucket(
            &self.dataset.items_a,
            start,
            end,
            granularity,
            |i| i.created_at,
            |stats: &mut ItemBucket, i| stats.add(i.price),
        );
        debug!("Item A stats: {} buckets", buckets.len());
        Ok(buckets)
    }

    fn item_b_stats(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        granularity: Granularity,
    ) -> Result<BucketMap<ItemBucket>, SourceError> {
        let buckets = aggregate_by_bucket(
            &self.dataset.items_b,
            start,
            end,
            granularity,
            |i| i.created_at,
            |stats: &mut ItemBucket, i| stats.add(i.amount()),
        );
        debug!("Item B stats: {} buckets", buckets.len());
        Ok(buckets)
    }
}
