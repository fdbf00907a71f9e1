//! MART_CUSTOMER_SEGMENTS: size and lifetime value per customer segment.

use super::{descending, MartTable, RowReader};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerSegment {
    pub customer_segment: String,
    pub total_customers: i64,
    pub avg_clv_per_customer: f64,
    pub clv_contribution_pct: f64,
    pub avg_orders_per_customer: f64,
    pub total_clv: f64,
}

impl MartTable for CustomerSegment {
    const VIEW: &'static str = "MART_CUSTOMER_SEGMENTS";
    const COLUMNS: &'static [&'static str] = &[
        "customer_segment",
        "total_customers",
        "avg_clv_per_customer",
        "clv_contribution_pct",
        "avg_orders_per_customer",
        "total_clv",
    ];
    const ORDER_BY: &'static str = "total_clv DESC";

    fn decode(row: &RowReader<'_>) -> Result<Self> {
        Ok(Self {
            customer_segment: row.text("customer_segment")?,
            total_customers: row.int("total_customers")?,
            avg_clv_per_customer: row.float("avg_clv_per_customer")?,
            clv_contribution_pct: row.float("clv_contribution_pct")?,
            avg_orders_per_customer: row.float("avg_orders_per_customer")?,
            total_clv: row.float("total_clv")?,
        })
    }

    fn sort(rows: &mut [Self]) {
        rows.sort_by(|a, b| descending(a.total_clv, b.total_clv));
    }
}
