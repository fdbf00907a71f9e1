//! MART_PRODUCT_PERFORMANCE: revenue vs volume share per product category.

use super::{descending, MartTable, RowReader};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct ProductPerformance {
    pub product_category: String,
    pub net_revenue: f64,
    pub total_units_sold: i64,
    pub revenue_contribution_pct: f64,
    pub volume_contribution_pct: f64,
    pub avg_profit_margin_pct: f64,
}

impl MartTable for ProductPerformance {
    const VIEW: &'static str = "MART_PRODUCT_PERFORMANCE";
    const COLUMNS: &'static [&'static str] = &[
        "product_category",
        "net_revenue",
        "total_units_sold",
        "revenue_contribution_pct",
        "volume_contribution_pct",
        "avg_profit_margin_pct",
    ];
    const ORDER_BY: &'static str = "net_revenue DESC";

    fn decode(row: &RowReader<'_>) -> Result<Self> {
        Ok(Self {
            product_category: row.text("product_category")?,
            net_revenue: row.float("net_revenue")?,
            total_units_sold: row.int("total_units_sold")?,
            revenue_contribution_pct: row.float("revenue_contribution_pct")?,
            volume_contribution_pct: row.float("volume_contribution_pct")?,
            avg_profit_margin_pct: row.float("avg_profit_margin_pct")?,
        })
    }

    fn sort(rows: &mut [Self]) {
        rows.sort_by(|a, b| descending(a.net_revenue, b.net_revenue));
    }
}
