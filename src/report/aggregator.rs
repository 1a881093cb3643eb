//! Per-bucket aggregation.
//!
//! This module provides the partial statistics each entity stream produces
//! and the generic grouping helper every store can use to build them.

use crate::models::{Dataset, Granularity, UserStatistics};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// Sparse mapping from bucket date to that bucket's statistics.
///
/// Buckets without a matching record are absent.
pub type BucketMap<T> = BTreeMap<NaiveDate, T>;

/// New and activated users in one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserBucket {
    pub new_users: u64,
    pub activated_users: u64,
}

/// Orders created in one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderBucket {
    pub orders_count: u64,
}

/// Count and exact amount of order items in one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemBucket {
    pub count: u64,
    pub amount: Decimal,
}

impl ItemBucket {
    /// Adds one item worth `amount`.
    pub fn add(&mut self, amount: Decimal) {
        self.count += 1;
        self.amount += amount;
    }
}

/// Groups records whose timestamp lies in `[start, end)` by bucket date.
///
/// `timestamp` picks the field to filter and bucket on; `fold` adds one
/// record into its bucket's statistics, which start from `T::default()`.
pub fn aggregate_by_bucket<'a, R, T, I, F, G>(
    records: I,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    granularity: Granularity,
    timestamp: F,
    mut fold: G,
) -> BucketMap<T>
where
    R: 'a,
    T: Default,
    I: IntoIterator<Item = &'a R>,
    F: Fn(&R) -> DateTime<Utc>,
    G: FnMut(&mut T, &R),
{
    let mut buckets: BucketMap<T> = BTreeMap::new();

    for record in records {
        let ts = timestamp(record);
        if ts < start || ts >= end {
            continue;
        }
        let stats = buckets.entry(granularity.truncate(ts)).or_default();
        fold(stats, record);
    }

    buckets
}

/// Lifetime order totals for every user, ordered by most recent join first.
pub fn user_statistics(dataset: &Dataset) -> Vec<UserStatistics> {
    let order_owner: HashMap<Uuid, Uuid> = dataset
        .orders
        .iter()
        .map(|o| (o.id, o.user_id))
        .collect();

    let mut orders_by_user: HashMap<Uuid, u64> = HashMap::new();
    for order in &dataset.orders {
        *orders_by_user.entry(order.user_id).or_default() += 1;
    }

    let mut items_a: HashMap<Uuid, ItemBucket> = HashMap::new();
    for item in &dataset.items_a {
        if let Some(user_id) = order_owner.get(&item.order_id) {
            items_a.entry(*user_id).or_default().add(item.price);
        }
    }

    let mut items_b: HashMap<Uuid, ItemBucket> = HashMap::new();
    for item in &dataset.items_b {
        if let Some(user_id) = order_owner.get(&item.order_id) {
            items_b.entry(*user_id).or_default().add(item.amount());
        }
    }

    let mut users: Vec<_> = dataset.users.iter().collect();
    users.sort_by(|a, b| b.joined_at.cmp(&a.joined_at).then_with(|| a.email.cmp(&b.email)));

    users
        .into_iter()
        .map(|user| {
            let a = items_a.get(&user.id).copied().unwrap_or_default();
            let b = items_b.get(&user.id).copied().unwrap_or_default();
            UserStatistics {
                user_id: user.id,
                email: user.email.clone(),
                orders_count: orders_by_user.get(&user.id).copied().unwrap_or(0),
                item_a_count: a.count,
                item_b_count: b.count,
                item_a_total: a.amount,
                item_b_total: b.amount,
                total_spent: a.amount + b.amount,
            }
        })
        .collect()
}
