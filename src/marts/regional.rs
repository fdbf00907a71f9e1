//! MART_REGIONAL_PERFORMANCE: profitability per sales region.

use super::{descending, MartTable, RowReader};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct RegionalPerformance {
    pub region: String,
    pub net_revenue: f64,
    pub gross_profit: f64,
    pub overall_profit_margin_pct: f64,
    pub total_orders: i64,
    pub unique_customers: i64,
}

impl MartTable for RegionalPerformance {
    const VIEW: &'static str = "MART_REGIONAL_PERFORMANCE";
    const COLUMNS: &'static [&'static str] = &[
        "region",
        "net_revenue",
        "gross_profit",
        "overall_profit_margin_pct",
        "total_orders",
        "unique_customers",
    ];
    const ORDER_BY: &'static str = "gross_profit DESC";

    fn decode(row: &RowReader<'_>) -> Result<Self> {
        Ok(Self {
            region: row.text("region")?,
            net_revenue: row.float("net_revenue")?,
            gross_profit: row.float("gross_profit")?,
            overall_profit_margin_pct: row.float("overall_profit_margin_pct")?,
            total_orders: row.int("total_orders")?,
            unique_customers: row.int("unique_customers")?,
        })
    }

    fn sort(rows: &mut [Self]) {
        rows.sort_by(|a, b| descending(a.gross_profit, b.gross_profit));
    }
}
