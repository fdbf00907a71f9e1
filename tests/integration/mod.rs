//! Integration tests for ShopSphere Charts.
//!
//! Live Snowflake tests require SNOWFLAKE_ACCOUNT, SNOWFLAKE_USER and
//! SNOWFLAKE_PASSWORD to be set.

pub mod cli_test;
pub mod pipeline_test;
pub mod snowflake_test;
