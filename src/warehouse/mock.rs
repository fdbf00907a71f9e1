//! Mock warehouse clients for testing and offline runs.
//!
//! `MockWarehouseClient` answers queries from fixture tables keyed by the
//! MART view they read; `FailingWarehouseClient` rejects every query.

use super::{ColumnInfo, QueryResult, Value, WarehouseClient};
use crate::error::{ChartError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Builds a fixture row, converting each cell with `Value::from`.
macro_rules! row {
    ($($value:expr),* $(,)?) => {
        vec![$(Value::from($value)),*]
    };
}

/// A mock warehouse client that returns predefined results.
#[derive(Debug, Default)]
pub struct MockWarehouseClient {
    tables: HashMap<String, QueryResult>,
    executed: Mutex<Vec<String>>,
    closed: AtomicBool,
}

impl MockWarehouseClient {
    /// Creates a mock client with no tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the result returned for queries reading `view`.
    pub fn with_table(mut self, view: &str, result: QueryResult) -> Self {
        self.tables.insert(view.to_ascii_uppercase(), result);
        self
    }

    /// Creates a mock client preloaded with a small demo dataset for all five views.
    pub fn demo() -> Self {
        Self::new()
            .with_table(
                "MART_REGIONAL_PERFORMANCE",
                table(
                    &[
                        ("REGION", "text"),
                        ("NET_REVENUE", "fixed"),
                        ("GROSS_PROFIT", "fixed"),
                        ("OVERALL_PROFIT_MARGIN_PCT", "fixed"),
                        ("TOTAL_ORDERS", "fixed"),
                        ("UNIQUE_CUSTOMERS", "fixed"),
                    ],
                    vec![
                        row!["North America", 4_812_350.25, 1_395_581.57, 29.0, 18_240, 6_120],
                        row!["Europe", 3_904_118.90, 1_054_112.10, 27.0, 15_410, 5_270],
                        row!["Asia Pacific", 2_987_402.15, 746_850.54, 25.0, 12_875, 4_410],
                        row!["Latin America", 1_204_776.40, 240_955.28, 20.0, 5_930, 2_105],
                    ],
                ),
            )
            .with_table(
                "MART_PRODUCT_PERFORMANCE",
                table(
                    &[
                        ("PRODUCT_CATEGORY", "text"),
                        ("NET_REVENUE", "fixed"),
                        ("TOTAL_UNITS_SOLD", "fixed"),
                        ("REVENUE_CONTRIBUTION_PCT", "fixed"),
                        ("VOLUME_CONTRIBUTION_PCT", "fixed"),
                        ("AVG_PROFIT_MARGIN_PCT", "fixed"),
                    ],
                    vec![
                        row!["Electronics", 4_650_210.00, 21_400, 36.0, 14.2, 18.5],
                        row!["Home & Kitchen", 2_840_905.50, 33_150, 22.0, 22.0, 24.1],
                        row!["Fashion", 2_195_330.75, 41_020, 17.0, 27.2, 31.4],
                        row!["Sports", 1_677_480.20, 24_880, 13.0, 16.5, 22.8],
                        row!["Beauty", 1_544_721.25, 30_260, 12.0, 20.1, 35.2],
                    ],
                ),
            )
            .with_table(
                "MART_DISCOUNT_IMPACT",
                table(
                    &[
                        ("DISCOUNT_BUCKET", "text"),
                        ("TOTAL_ORDERS", "fixed"),
                        ("NET_REVENUE", "fixed"),
                        ("GROSS_PROFIT", "fixed"),
                        ("AVG_PROFIT_MARGIN_PCT", "fixed"),
                        ("AVG_ORDER_VALUE", "fixed"),
                    ],
                    vec![
                        row!["No Discount", 21_940, 5_704_400.00, 1_768_364.00, 31.0, 260.00],
                        row!["1-10% Discount", 15_320, 3_830_000.00, 995_800.00, 26.0, 250.00],
                        row!["11-20% Discount", 9_870, 2_270_100.00, 454_020.00, 20.0, 230.00],
                        row!["21-30% Discount", 4_110, 863_100.00, 112_203.00, 13.0, 210.00],
                        row!["30%+ Discount", 1_215, 231_850.00, 13_911.00, 6.0, 190.82],
                    ],
                ),
            )
            .with_table(
                "MART_CUSTOMER_SEGMENTS",
                table(
                    &[
                        ("CUSTOMER_SEGMENT", "text"),
                        ("TOTAL_CUSTOMERS", "fixed"),
                        ("AVG_CLV_PER_CUSTOMER", "fixed"),
                        ("CLV_CONTRIBUTION_PCT", "fixed"),
                        ("AVG_ORDERS_PER_CUSTOMER", "fixed"),
                        ("TOTAL_CLV", "fixed"),
                    ],
                    vec![
                        row!["Premium", 3_940, 1_450.00, 45.0, 9.4, 5_713_000.00],
                        row!["Regular", 8_230, 640.50, 41.5, 4.1, 5_271_315.00],
                        row!["Budget", 5_745, 298.40, 13.5, 2.2, 1_714_308.00],
                    ],
                ),
            )
            .with_table(
                "MART_RETENTION_METRICS",
                table(
                    &[
                        ("CHURN_RISK", "text"),
                        ("TOTAL_CUSTOMERS", "fixed"),
                        ("PCT_OF_CUSTOMER_BASE", "fixed"),
                        ("TOTAL_CLV_AT_RISK", "fixed"),
                        ("PREMIUM_CUSTOMERS", "fixed"),
                        ("REGULAR_CUSTOMERS", "fixed"),
                        ("BUDGET_CUSTOMERS", "fixed"),
                    ],
                    vec![
                        row!["High Risk", 142, 0.8, 61_480.00, 12, 58, 72],
                        row!["Medium Risk", 73, 0.4, 38_020.00, 9, 31, 33],
                        row!["Low Risk", 17_700, 98.8, 12_599_123.00, 3_919, 8_141, 5_640],
                    ],
                ),
            )
    }

    /// Statements executed so far, in order.
    pub fn executed_queries(&self) -> Vec<String> {
        self.executed
            .lock()
            .map(|q| q.clone())
            .unwrap_or_default()
    }

    /// Returns true once `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Builds a fixture table from `(name, type)` pairs and rows.
fn table(columns: &[(&str, &str)], rows: Vec<Vec<Value>>) -> QueryResult {
    let columns = columns
        .iter()
        .map(|(name, data_type)| ColumnInfo::new(*name, *data_type))
        .collect();
    QueryResult::with_data(columns, rows).with_execution_time(Duration::from_millis(1))
}

#[async_trait]
impl WarehouseClient for MockWarehouseClient {
    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        if let Ok(mut executed) = self.executed.lock() {
            executed.push(sql.to_string());
        }

        let upper = sql.to_ascii_uppercase();
        self.tables
            .iter()
            .find(|(view, _)| upper.contains(view.as_str()))
            .map(|(_, result)| result.clone())
            .ok_or_else(|| {
                ChartError::query("Object does not exist or not authorized (mock warehouse)")
            })
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// A warehouse client whose queries always fail.
#[derive(Debug)]
pub struct FailingWarehouseClient {
    message: String,
    closed: AtomicBool,
}

impl FailingWarehouseClient {
    /// Creates a client failing every query with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            closed: AtomicBool::new(false),
        }
    }

    /// Returns true once `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WarehouseClient for FailingWarehouseClient {
    async fn execute_query(&self, _sql: &str) -> Result<QueryResult> {
        Err(ChartError::query(self.message.clone()))
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
