//! Report rendering.
//!
//! This module renders report rows as a fixed-width text table, a Markdown
//! document or JSON.

use crate::models::{ReportEnvelope, ReportRow, UserStatistics};
use anyhow::Result;
use rust_decimal::Decimal;

const TABLE_HEADERS: [&str; 9] = [
    "Period",
    "NewUsers",
    "ActivatedUsers",
    "OrdersCount",
    "ItemACount",
    "ItemAAmount",
    "ItemBCount",
    "ItemBAmount",
    "TotalAmount",
];

const USER_HEADERS: [&str; 7] = [
    "Email",
    "Orders",
    "ItemACount",
    "ItemBCount",
    "ItemATotal",
    "ItemBTotal",
    "TotalSpent",
];

/// Formats money with two decimals.
fn money(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

/// Cell values of one report row, in header order.
fn row_cells(row: &ReportRow) -> [String; 9] {
    [
        row.period.to_string(),
        row.new_users.to_string(),
        row.activated_users.to_string(),
        row.orders_count.to_string(),
        row.item_a_count.to_string(),
        money(row.item_a_amount),
        row.item_b_count.to_string(),
        money(row.item_b_amount),
        money(row.total_amount),
    ]
}

/// Renders left-justified columns, each as wide as its widest cell.
fn render_columns<const N: usize>(headers: &[&str; N], rows: &[[String; N]]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.len());
        }
    }

    let join = |cells: Vec<String>| cells.join(" | ");

    let header_line = join(
        headers
            .iter()
            .zip(&widths)
            .map(|(h, w)| format!("{:<w$}", h, w = *w))
            .collect(),
    );

    let mut output = String::new();
    output.push_str(&header_line);
    output.push('\n');
    output.push_str(&"-".repeat(header_line.len()));
    output.push('\n');

    for row in rows {
        let line = join(
            row.iter()
                .zip(&widths)
                .map(|(c, w)| format!("{:<w$}", c, w = *w))
                .collect(),
        );
        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Generate the fixed-width text table.
pub fn generate_table_report(rows: &[ReportRow]) -> String {
    if rows.is_empty() {
        return "No data to display\n".to_string();
    }

    let cells: Vec<[String; 9]> = rows.iter().map(row_cells).collect();
    render_columns(&TABLE_HEADERS, cells.as_slice())
}

/// Generate the per-user statistics table.
pub fn generate_user_stats_table(stats: &[UserStatistics]) -> String {
    if stats.is_empty() {
        return "No users to display\n".to_string();
    }

    let cells: Vec<[String; 7]> = stats
        .iter()
        .map(|s| {
            [
                s.email.clone(),
                s.orders_count.to_string(),
                s.item_a_count.to_string(),
                s.item_b_count.to_string(),
                money(s.item_a_total),
                money(s.item_b_total),
                money(s.total_spent),
            ]
        })
        .collect();

    render_columns(&USER_HEADERS, cells.as_slice())
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &ReportEnvelope) -> String {
    let mut output = String::new();

    output.push_str("# Activity Report\n\n");
    output.push_str(&generate_metadata_section(report));
    output.push_str(&generate_totals_section(&report.data));
    output.push_str(&generate_rows_section(&report.data));

    output
}

/// Generate the metadata section.
fn generate_metadata_section(report: &ReportEnvelope) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Period:** {}\n", report.period));
    section.push_str(&format!("- **Start Date:** {}\n", report.start_date));
    section.push_str(&format!("- **End Date:** {}\n", report.end_date));
    section.push_str(&format!("- **Buckets:** {}\n", report.data.len()));
    section.push_str(&format!(
        "- **Active Buckets:** {}\n",
        report.data.iter().filter(|r| !r.is_empty()).count()
    ));
    section.push('\n');

    section
}

/// Generate the totals section.
fn generate_totals_section(rows: &[ReportRow]) -> String {
    let mut section = String::new();

    let new_users: u64 = rows.iter().map(|r| r.new_users).sum();
    let activated: u64 = rows.iter().map(|r| r.activated_users).sum();
    let orders: u64 = rows.iter().map(|r| r.orders_count).sum();
    let item_a: Decimal = rows.iter().map(|r| r.item_a_amount).sum();
    let item_b: Decimal = rows.iter().map(|r| r.item_b_amount).sum();
    let total: Decimal = rows.iter().map(|r| r.total_amount).sum();

    section.push_str("## Totals\n\n");
    section.push_str("| New Users | Activated | Orders | Item A | Item B | **Total** |\n");
    section.push_str("|:---:|:---:|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | {} | {} | **{}** |\n\n",
        new_users,
        activated,
        orders,
        money(item_a),
        money(item_b),
        money(total)
    ));

    section
}

/// Generate the per-bucket table.
fn generate_rows_section(rows: &[ReportRow]) -> String {
    let mut section = String::new();

    section.push_str("## Periods\n\n");

    if rows.is_empty() {
        section.push_str("No data to display.\n\n");
        return section;
    }

    section.push_str(&format!("| {} |\n", TABLE_HEADERS.join(" | ")));
    section.push_str(&format!("|:---|{}\n", "---:|".repeat(TABLE_HEADERS.len() - 1)));

    for row in rows {
        section.push_str(&format!("| {} |\n", row_cells(row).join(" | ")));
    }
    section.push('\n');

    section
}

/// Generate a JSON report.
pub fn generate_json_report(report: &ReportEnvelope) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Granularity;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn create_test_rows() -> Vec<ReportRow> {
        vec![
            ReportRow {
                period: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
                new_users: 1,
                activated_users: 1,
                orders_count: 2,
                item_a_count: 2,
                item_a_amount: dec!(250.00),
                item_b_count: 2,
                item_b_amount: dec!(120.00),
                total_amount: dec!(370.00),
            },
            ReportRow {
                period: NaiveDate::from_ymd_opt(2025, 1, 11).unwrap(),
                new_users: 1,
                activated_users: 0,
                orders_count: 1,
                item_a_count: 1,
                item_a_amount: dec!(75.5),
                item_b_count: 0,
                item_b_amount: Decimal::ZERO,
                total_amount: dec!(75.5),
            },
        ]
    }

    fn create_test_envelope() -> ReportEnvelope {
        ReportEnvelope {
            period: Granularity::Daily,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 12).unwrap(),
            data: create_test_rows(),
            users: None,
        }
    }

    fn create_test_stats() -> Vec<UserStatistics> {
        vec![UserStatistics {
            user_id: Uuid::new_v4(),
            email: "user1@example.com".to_string(),
            orders_count: 2,
            item_a_count: 3,
            item_b_count: 1,
            item_a_total: dec!(10),
            item_b_total: dec!(2.5),
            total_spent: dec!(12.5),
        }]
    }

    #[test]
    fn test_generate_table_report() {
        let table = generate_table_report(&create_test_rows());
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Period     | NewUsers | ActivatedUsers"));
        assert!(lines[1].chars().all(|c| c == '-'));
        assert_eq!(lines[1].len(), lines[0].len());
        assert!(lines[2].starts_with("2025-01-10 | 1        | 1"));
        assert!(lines[2].contains("250.00"));
        assert!(lines[3].contains("75.50"));
        assert!(lines[3].contains("0.00"));
        // Every line uses the same column layout
        assert!(lines.iter().all(|l| l.len() == lines[0].len()));
    }

    #[test]
    fn test_generate_table_report_empty() {
        assert_eq!(generate_table_report(&[]), "No data to display\n");
    }

    #[test]
    fn test_generate_markdown_report() {
        let markdown = generate_markdown_report(&create_test_envelope());

        assert!(markdown.contains("# Activity Report"));
        assert!(markdown.contains("- **Period:** daily"));
        assert!(markdown.contains("- **Start Date:** 2025-01-10"));
        assert!(markdown.contains("- **Active Buckets:** 2"));
        assert!(markdown.contains("| 2 | 1 | 3 | 325.50 | 120.00 | **445.50** |"));
        assert!(markdown.contains("| 2025-01-11 | 1 | 0 | 1 | 1 | 75.50 | 0 | 0.00 | 75.50 |"));
    }

    #[test]
    fn test_generate_json_report() {
        let json = generate_json_report(&create_test_envelope()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["period"], "daily");
        assert_eq!(value["start_date"], "2025-01-10");
        assert_eq!(value["data"].as_array().map(|a| a.len()), Some(2));
        assert_eq!(value["data"][1]["OrderItemAAmount"], 75.5);
        assert_eq!(value["data"][1]["OrderItemBCount"], 0);
        assert!(value.get("users").is_none());
    }

    #[test]
    fn test_generate_json_report_with_users_is_one_document() {
        let mut envelope = create_test_envelope();
        envelope.users = Some(create_test_stats());

        let json = generate_json_report(&envelope).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["data"].as_array().map(|a| a.len()), Some(2));
        assert_eq!(value["users"][0]["email"], "user1@example.com");
        assert_eq!(value["users"][0]["total_spent"], 12.5);
    }

    #[test]
    fn test_generate_user_stats_table() {
        let stats = create_test_stats();

        let table = generate_user_stats_table(&stats);
        assert!(table.starts_with("Email"));
        assert!(table.contains("user1@example.com | 2      | 3"));
        assert!(table.contains("12.50"));
    }
}
