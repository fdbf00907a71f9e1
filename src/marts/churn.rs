//! MART_RETENTION_METRICS: churn risk buckets broken down by segment.

use super::{MartTable, RowReader};
use crate::error::Result;

/// Label of the bucket holding active customers.
pub const LOW_RISK: &str = "Low Risk";

#[derive(Debug, Clone, PartialEq)]
pub struct ChurnRisk {
    pub churn_risk: String,
    pub total_customers: i64,
    pub pct_of_customer_base: f64,
    pub total_clv_at_risk: f64,
    pub premium_customers: i64,
    pub regular_customers: i64,
    pub budget_customers: i64,
}

impl ChurnRisk {
    /// High risk first, then medium, then everything else.
    pub fn rank(&self) -> u8 {
        match self.churn_risk.as_str() {
            "High Risk" => 1,
            "Medium Risk" => 2,
            _ => 3,
        }
    }
}

impl MartTable for ChurnRisk {
    const VIEW: &'static str = "MART_RETENTION_METRICS";
    const COLUMNS: &'static [&'static str] = &[
        "churn_risk",
        "total_customers",
        "pct_of_customer_base",
        "total_clv_at_risk",
        "premium_customers",
        "regular_customers",
        "budget_customers",
    ];
    const ORDER_BY: &'static str = "\n    CASE churn_risk\n        \
        WHEN 'High Risk' THEN 1\n        \
        WHEN 'Medium Risk' THEN 2\n        \
        ELSE 3\n    END";

    fn decode(row: &RowReader<'_>) -> Result<Self> {
        Ok(Self {
            churn_risk: row.text("churn_risk")?,
            total_customers: row.int("total_customers")?,
            pct_of_customer_base: row.float("pct_of_customer_base")?,
            total_clv_at_risk: row.float("total_clv_at_risk")?,
            premium_customers: row.int("premium_customers")?,
            regular_customers: row.int("regular_customers")?,
            budget_customers: row.int("budget_customers")?,
        })
    }

    fn sort(rows: &mut [Self]) {
        rows.sort_by_key(Self::rank);
    }
}
