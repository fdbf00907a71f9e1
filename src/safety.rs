//! Read-only guard for warehouse statements.
//!
//! Every statement sent to the warehouse is parsed with the Snowflake dialect
//! first; only a single query statement with no data-modifying parts passes.

use sqlparser::ast::{Query, Select, SetExpr, Statement, TableFactor, TableWithJoins};
use sqlparser::dialect::SnowflakeDialect;
use sqlparser::parser::Parser;

use crate::error::{ChartError, Result};

/// Rejects anything other than exactly one read-only query.
pub fn ensure_read_only(sql: &str) -> Result<()> {
    let statements = Parser::parse_sql(&SnowflakeDialect {}, sql)
        .map_err(|e| ChartError::query(format!("SQL parse error: {e}")))?;

    match statements.as_slice() {
        [] => Err(ChartError::query("Empty SQL statement")),
        [Statement::Query(query)] => {
            if query_is_read_only(query) {
                Ok(())
            } else {
                Err(ChartError::query(
                    "Refusing to run a query with data-modifying parts",
                ))
            }
        }
        [_] => Err(ChartError::query(
            "Refusing to run a statement that is not a SELECT query",
        )),
        many => Err(ChartError::query(format!(
            "Expected one statement, found {}",
            many.len()
        ))),
    }
}

fn query_is_read_only(query: &Query) -> bool {
    let ctes_ok = query
        .with
        .as_ref()
        .map_or(true, |with| with.cte_tables.iter().all(|cte| query_is_read_only(&cte.query)));

    ctes_ok && set_expr_is_read_only(&query.body)
}

fn set_expr_is_read_only(set_expr: &SetExpr) -> bool {
    match set_expr {
        SetExpr::Delete(_) | SetExpr::Update(_) | SetExpr::Insert(_) | SetExpr::Merge(_) => false,
        SetExpr::Query(query) => query_is_read_only(query),
        SetExpr::Select(select) => select_is_read_only(select),
        SetExpr::SetOperation { left, right, .. } => {
            set_expr_is_read_only(left) && set_expr_is_read_only(right)
        }
        SetExpr::Values(_) | SetExpr::Table(_) => true,
    }
}

fn select_is_read_only(select: &Select) -> bool {
    select.from.iter().all(table_with_joins_is_read_only)
}

fn table_with_joins_is_read_only(twj: &TableWithJoins) -> bool {
    table_factor_is_read_only(&twj.relation)
        && twj
            .joins
            .iter()
            .all(|join| table_factor_is_read_only(&join.relation))
}

fn table_factor_is_read_only(factor: &TableFactor) -> bool {
    match factor {
        TableFactor::Derived { subquery, .. } => query_is_read_only(subquery),
        TableFactor::NestedJoin {
            table_with_joins, ..
        } => table_with_joins_is_read_only(table_with_joins),
        _ => true,
    }
}
