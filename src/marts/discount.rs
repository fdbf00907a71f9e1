//! MART_DISCOUNT_IMPACT: orders and margins per discount bucket.

use super::{MartTable, RowReader};
use crate::error::Result;

/// Bucket labels in display order; anything else sorts after them.
pub const BUCKET_ORDER: [&str; 4] = [
    "No Discount",
    "1-10% Discount",
    "11-20% Discount",
    "21-30% Discount",
];

#[derive(Debug, Clone, PartialEq)]
pub struct DiscountImpact {
    pub discount_bucket: String,
    pub total_orders: i64,
    pub net_revenue: f64,
    pub gross_profit: f64,
    pub avg_profit_margin_pct: f64,
    pub avg_order_value: f64,
}

impl DiscountImpact {
    /// Position of the bucket in the display order (1-based, unknown buckets last).
    pub fn rank(&self) -> usize {
        BUCKET_ORDER
            .iter()
            .position(|b| *b == self.discount_bucket)
            .map_or(BUCKET_ORDER.len() + 1, |i| i + 1)
    }
}

impl MartTable for DiscountImpact {
    const VIEW: &'static str = "MART_DISCOUNT_IMPACT";
    const COLUMNS: &'static [&'static str] = &[
        "discount_bucket",
        "total_orders",
        "net_revenue",
        "gross_profit",
        "avg_profit_margin_pct",
        "avg_order_value",
    ];
    const ORDER_BY: &'static str = "\n    CASE discount_bucket\n        \
        WHEN 'No Discount' THEN 1\n        \
        WHEN '1-10% Discount' THEN 2\n        \
        WHEN '11-20% Discount' THEN 3\n        \
        WHEN '21-30% Discount' THEN 4\n        \
        ELSE 5\n    END";

    fn decode(row: &RowReader<'_>) -> Result<Self> {
        Ok(Self {
            discount_bucket: row.text("discount_bucket")?,
            total_orders: row.int("total_orders")?,
            net_revenue: row.float("net_revenue")?,
            gross_profit: row.float("gross_profit")?,
            avg_profit_margin_pct: row.float("avg_profit_margin_pct")?,
            avg_order_value: row.float("avg_order_value")?,
        })
    }

    fn sort(rows: &mut [Self]) {
        rows.sort_by_key(Self::rank);
    }
}
