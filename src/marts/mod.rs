//! Typed access to the five MART views.
//!
//! Each view has a row type implementing [`MartTable`], which names its view,
//! column list and ordering. [`fetch`] builds the SELECT, checks it is
//! read-only, runs it and decodes the rows, then re-applies the view's
//! ordering so callers can rely on it whatever the warehouse returned.

mod churn;
mod discount;
mod product;
mod regional;
mod segments;

pub use churn::{ChurnRisk, LOW_RISK};
pub use discount::DiscountImpact;
pub use product::ProductPerformance;
pub use regional::RegionalPerformance;
pub use segments::CustomerSegment;

use crate::error::{ChartError, Result};
use crate::safety::ensure_read_only;
use crate::warehouse::{ColumnInfo, QueryResult, Row, Value, WarehouseClient};
use std::cmp::Ordering;
use tracing::debug;

/// A row type backed by one MART view.
pub trait MartTable: Sized {
    /// View name, without schema.
    const VIEW: &'static str;

    /// Selected columns, in order.
    const COLUMNS: &'static [&'static str];

    /// ORDER BY expression applied in SQL.
    const ORDER_BY: &'static str;

    /// Decodes one result row.
    fn decode(row: &RowReader<'_>) -> Result<Self>;

    /// Applies the view's ordering to decoded rows. Must be a stable sort.
    fn sort(rows: &mut [Self]);
}

/// Builds the SELECT statement for a view in the given schema.
pub fn query_sql<T: MartTable>(schema: &str) -> String {
    format!(
        "SELECT\n    {}\nFROM {}.{}\nORDER BY {}",
        T::COLUMNS.join(",\n    "),
        schema,
        T::VIEW,
        T::ORDER_BY
    )
}

/// Queries a view and returns its rows, ordered.
pub async fn fetch<T: MartTable>(client: &dyn WarehouseClient, schema: &str) -> Result<Vec<T>> {
    let sql = query_sql::<T>(schema);
    ensure_read_only(&sql)?;

    let result = client.execute_query(&sql).await?;
    debug!(
        "{} returned {} rows in {:?}",
        T::VIEW,
        result.row_count,
        result.execution_time
    );

    decode_all(&result)
}

/// Decodes and orders every row of a result.
pub fn decode_all<T: MartTable>(result: &QueryResult) -> Result<Vec<T>> {
    if let Some(missing) = T::COLUMNS
        .iter()
        .find(|name| result.column_index(name).is_none())
    {
        return Err(ChartError::query(format!(
            "{} result is missing column '{}'",
            T::VIEW,
            missing.to_uppercase()
        )));
    }

    let mut rows = result
        .rows
        .iter()
        .map(|row| {
            T::decode(&RowReader {
                view: T::VIEW,
                columns: &result.columns,
                row,
            })
        })
        .collect::<Result<Vec<T>>>()?;

    T::sort(&mut rows);
    Ok(rows)
}

/// Regional profitability, ordered by gross profit descending.
pub async fn fetch_regional_performance(
    client: &dyn WarehouseClient,
    schema: &str,
) -> Result<Vec<RegionalPerformance>> {
    fetch(client, schema).await
}

/// Product category performance, ordered by net revenue descending.
pub async fn fetch_product_performance(
    client: &dyn WarehouseClient,
    schema: &str,
) -> Result<Vec<ProductPerformance>> {
    fetch(client, schema).await
}

/// Discount impact, ordered from no discount to the deepest bucket.
pub async fn fetch_discount_impact(
    client: &dyn WarehouseClient,
    schema: &str,
) -> Result<Vec<DiscountImpact>> {
    fetch(client, schema).await
}

/// Customer segments, ordered by total CLV descending.
pub async fn fetch_customer_segments(
    client: &dyn WarehouseClient,
    schema: &str,
) -> Result<Vec<CustomerSegment>> {
    fetch(client, schema).await
}

/// Churn risk distribution, ordered High, Medium, then everything else.
pub async fn fetch_churn_metrics(
    client: &dyn WarehouseClient,
    schema: &str,
) -> Result<Vec<ChurnRisk>> {
    fetch(client, schema).await
}

/// Named, typed access to the cells of one result row.
pub struct RowReader<'a> {
    view: &'static str,
    columns: &'a [ColumnInfo],
    row: &'a Row,
}

impl RowReader<'_> {
    fn cell(&self, name: &str) -> Result<&Value> {
        self.columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
            .and_then(|i| self.row.get(i))
            .ok_or_else(|| {
                ChartError::query(format!(
                    "{} result is missing column '{}'",
                    self.view,
                    name.to_uppercase()
                ))
            })
    }

    fn invalid(&self, name: &str, value: &Value, expected: &str) -> ChartError {
        ChartError::query(format!(
            "{}.{}: expected {expected}, got {value:?}",
            self.view,
            name.to_uppercase()
        ))
    }

    /// Reads a label column.
    pub fn text(&self, name: &str) -> Result<String> {
        match self.cell(name)? {
            Value::String(s) => Ok(s.clone()),
            Value::Null => Err(self.invalid(name, &Value::Null, "text")),
            other => Ok(other.to_display_string()),
        }
    }

    /// Reads a numeric metric column.
    pub fn float(&self, name: &str) -> Result<f64> {
        let value = self.cell(name)?;
        value
            .as_f64()
            .ok_or_else(|| self.invalid(name, value, "a number"))
    }

    /// Reads a count column.
    pub fn int(&self, name: &str) -> Result<i64> {
        let value = self.cell(name)?;
        value
            .as_i64()
            .ok_or_else(|| self.invalid(name, value, "an integer"))
    }
}

/// Descending comparison for metric columns; NaN sorts last.
pub(crate) fn descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        _ => b.total_cmp(&a),
    }
}
