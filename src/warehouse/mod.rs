//! Warehouse abstraction layer.
//!
//! Provides a trait-based interface for running read-only queries, so the
//! Snowflake session client and the in-memory mock can be used interchangeably.

mod mock;
mod snowflake;
mod types;

pub use mock::{FailingWarehouseClient, MockWarehouseClient};
pub use snowflake::SnowflakeClient;
pub use types::{ColumnInfo, QueryResult, Row, Value};

use crate::config::ConnectionConfig;
use crate::error::Result;
use async_trait::async_trait;

/// Opens a warehouse session for the given configuration.
///
/// This is the central factory function for warehouse connections.
pub async fn connect(config: &ConnectionConfig) -> Result<Box<dyn WarehouseClient>> {
    let client = SnowflakeClient::connect(config).await?;
    Ok(Box::new(client))
}

/// Trait defining the interface for warehouse clients.
#[async_trait]
pub trait WarehouseClient: Send + Sync {
    /// Executes a SQL query and returns the results.
    async fn execute_query(&self, sql: &str) -> Result<QueryResult>;

    /// Closes the session.
    async fn close(&self) -> Result<()>;
}
