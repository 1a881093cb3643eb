//! Data models for the order reporter.
//!
//! This module contains the records read from the store (users, orders and
//! the two kinds of order items) and the rows produced by the report engine.

use crate::error::ReportError;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Bucket size of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One bucket per calendar date
    Daily,
    /// One bucket per Monday-based week
    Weekly,
    /// One bucket per calendar month
    Monthly,
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Daily => write!(f, "daily"),
            Granularity::Weekly => write!(f, "weekly"),
            Granularity::Monthly => write!(f, "monthly"),
        }
    }
}

impl FromStr for Granularity {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Granularity::Daily),
            "weekly" => Ok(Granularity::Weekly),
            "monthly" => Ok(Granularity::Monthly),
            other => Err(ReportError::InvalidGranularity(other.to_string())),
        }
    }
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// Whether the account has been activated.
    pub active: bool,
    pub joined_at: DateTime<Utc>,
}

/// An order placed by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Order item priced with a single amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemA {
    pub id: Uuid,
    pub order_id: Uuid,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Order item priced as placement plus article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemB {
    pub id: Uuid,
    pub order_id: Uuid,
    pub placement_price: Decimal,
    pub article_price: Decimal,
    pub created_at: DateTime<Utc>,
}

impl OrderItemB {
    /// Effective value of the item.
    pub fn amount(&self) -> Decimal {
        self.placement_price + self.article_price
    }
}

/// All records known to a store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub items_a: Vec<OrderItemA>,
    #[serde(default)]
    pub items_b: Vec<OrderItemB>,
}

impl Dataset {
    /// Returns true if no user has the given email.
    pub fn email_available(&self, email: &str) -> bool {
        !self.users.iter().any(|u| u.email == email)
    }
}

/// One bucket of a report.
///
/// Money stays exact here; amounts become floats only when the row is
/// serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    #[serde(rename = "Period")]
    pub period: NaiveDate,
    #[serde(rename = "NewUsers")]
    pub new_users: u64,
    #[serde(rename = "ActivatedUsers")]
    pub activated_users: u64,
    #[serde(rename = "OrdersCount")]
    pub orders_count: u64,
    #[serde(rename = "OrderItemACount")]
    pub item_a_count: u64,
    #[serde(rename = "OrderItemAAmount", with = "rust_decimal::serde::float")]
    pub item_a_amount: Decimal,
    #[serde(rename = "OrderItemBCount")]
    pub item_b_count: u64,
    #[serde(rename = "OrderItemBAmount", with = "rust_decimal::serde::float")]
    pub item_b_amount: Decimal,
    #[serde(rename = "OrdersTotalAmount", with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
}

impl ReportRow {
    /// True if nothing happened in this bucket.
    pub fn is_empty(&self) -> bool {
        self.new_users == 0
            && self.activated_users == 0
            && self.orders_count == 0
            && self.item_a_count == 0
            && self.item_b_count == 0
            && self.total_amount.is_zero()
    }
}

/// A report as handed to consumers, with its request parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEnvelope {
    pub period: Granularity,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub data: Vec<ReportRow>,
    /// Per-user totals, present only when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<UserStatistics>>,
}

/// Lifetime totals for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStatistics {
    pub user_id: Uuid,
    pub email: String,
    pub orders_count: u64,
    pub item_a_count: u64,
    pub item_b_count: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub item_a_total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub item_b_total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_spent: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_granularity_from_str() {
        assert_eq!("daily".parse::<Granularity>().unwrap(), Granularity::Daily);
        assert_eq!("weekly".parse::<Granularity>().unwrap(), Granularity::Weekly);
        assert_eq!("monthly".parse::<Granularity>().unwrap(), Granularity::Monthly);

        let err = "yearly".parse::<Granularity>().unwrap_err();
        assert!(matches!(err, ReportError::InvalidGranularity(ref p) if p == "yearly"));
    }

    #[test]
    fn test_granularity_round_trips_display() {
        for g in [Granularity::Daily, Granularity::Weekly, Granularity::Monthly] {
            assert_eq!(g.to_string().parse::<Granularity>().unwrap(), g);
        }
    }

    #[test]
    fn test_item_b_amount() {
        let item = OrderItemB {
            id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            placement_price: dec!(50.25),
            article_price: dec!(30.75),
            created_at: Utc::now(),
        };
        assert_eq!(item.amount(), dec!(81.00));
    }

    #[test]
    fn test_report_row_serializes_with_report_keys() {
        let row = ReportRow {
            period: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            new_users: 1,
            activated_users: 1,
            orders_count: 2,
            item_a_count: 2,
            item_a_amount: dec!(250.00),
            item_b_count: 2,
            item_b_amount: dec!(120.00),
            total_amount: dec!(370.00),
        };

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["Period"], "2025-01-10");
        assert_eq!(json["NewUsers"], 1);
        assert_eq!(json["OrderItemAAmount"], 250.0);
        assert_eq!(json["OrdersTotalAmount"], 370.0);
        assert!(!row.is_empty());
    }
}
