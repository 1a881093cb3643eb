//! Random sample data for trying out reports.

use crate::models::{Dataset, Order, OrderItemA, OrderItemB, User};
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use tracing::warn;
use uuid::{Builder, Uuid};

/// Settings for sample generation.
#[derive(Debug, Clone)]
pub struct SampleOptions {
    /// Number of users to create
    pub users: usize,
    /// Number of days before `now` to spread users across
    pub days: u32,
    /// Seed for reproducible output
    pub seed: Option<u64>,
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self {
            users: 10,
            days: 7,
            seed: None,
        }
    }
}

/// Counts of records created by one generation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SampleSummary {
    pub users: usize,
    pub orders: usize,
    pub items_a: usize,
    pub items_b: usize,
    pub skipped: usize,
}

fn random_id(rng: &mut StdRng) -> Uuid {
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes);
    Builder::from_random_bytes(bytes).into_uuid()
}

/// Whole units plus a fixed number of cents.
fn price(rng: &mut StdRng, low: i64, high: i64, cents: i64) -> Decimal {
    Decimal::from(rng.random_range(low..=high)) + Decimal::new(cents, 2)
}

/// Appends random users, orders and order items to `dataset`.
///
/// Users are named `testuser{n}` / `test{n}@example.com`; an email already in
/// the dataset is skipped. Fails without touching `dataset` when `days`
/// reaches back past the earliest representable timestamp.
pub fn generate_sample_data(
    dataset: &mut Dataset,
    options: &SampleOptions,
    now: DateTime<Utc>,
) -> Result<SampleSummary> {
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let days = options.days.max(1);
    let base_date = now
        .checked_sub_signed(Duration::days(i64::from(days)))
        .with_context(|| format!("Cannot spread sample data over {} days", days))?;
    let mut summary = SampleSummary::default();

    for i in 0..options.users {
        let joined_at = base_date + Duration::days(rng.random_range(0..i64::from(days)));
        let email = format!("test{}@example.com", i + 1);

        if !dataset.email_available(&email) {
            warn!("User {} already exists, skipping...", email);
            summary.skipped += 1;
            continue;
        }

        let user = User {
            id: random_id(&mut rng),
            username: format!("testuser{}", i + 1),
            email,
            active: rng.random_bool(0.5),
            joined_at,
        };
        summary.users += 1;

        for _ in 0..rng.random_range(0..=3) {
            let created_at = joined_at
                + Duration::hours(rng.random_range(0..=23))
                + Duration::minutes(rng.random_range(0..=59));
            let order = Order {
                id: random_id(&mut rng),
                user_id: user.id,
                created_at,
            };
            summary.orders += 1;

            for _ in 0..rng.random_range(0..=3) {
                dataset.items_a.push(OrderItemA {
                    id: random_id(&mut rng),
                    order_id: order.id,
                    price: price(&mut rng, 10, 500, 50),
                    created_at: created_at + Duration::minutes(rng.random_range(1..=30)),
                });
                summary.items_a += 1;
            }

            for _ in 0..rng.random_range(0..=2) {
                dataset.items_b.push(OrderItemB {
                    id: random_id(&mut rng),
                    order_id: order.id,
                    placement_price: price(&mut rng, 5, 100, 25),
                    article_price: price(&mut rng, 5, 100, 75),
                    created_at: created_at + Duration::minutes(rng.random_range(1..=30)),
                });
                summary.items_b += 1;
            }

            dataset.orders.push(order);
        }

        dataset.users.push(user);
    }

    Ok(summary)
}
