//! Snowflake session tests.
//!
//! The live tests are skipped unless SNOWFLAKE_ACCOUNT is set.

use shopsphere_charts::config::ConnectionConfig;
use shopsphere_charts::error::ChartError;
use shopsphere_charts::marts;
use shopsphere_charts::warehouse::{self, WarehouseClient};

/// Builds a connection from SNOWFLAKE_* variables, if an account is configured.
fn live_config() -> Option<ConnectionConfig> {
    std::env::var("SNOWFLAKE_ACCOUNT").ok()?;
    let mut config = ConnectionConfig::default();
    config.apply_env_defaults();
    config.apply_builtin_defaults();
    Some(config)
}

fn unreachable_config() -> ConnectionConfig {
    ConnectionConfig {
        account: Some("xy12345".to_string()),
        user: Some("ANALYST".to_string()),
        password: Some("secret".to_string()),
        host: Some("http://127.0.0.1:9".to_string()),
        timeout_secs: Some(5),
        ..Default::default()
    }
}

#[tokio::test(flavor = "current_thread")]
async fn test_connect_unreachable_host() {
    let result = warehouse::connect(&unreachable_config()).await;

    let Err(err) = result else {
        panic!("expected connection to fail");
    };
    assert!(matches!(err, ChartError::Connection(_)), "{err}");
}

#[tokio::test(flavor = "current_thread")]
async fn test_connect_requires_password() {
    let config = ConnectionConfig {
        password: None,
        ..unreachable_config()
    };

    let Err(err) = warehouse::connect(&config).await else {
        panic!("expected missing password to be rejected");
    };
    assert!(matches!(err, ChartError::Config(_)));
    assert!(err.to_string().contains("SNOWFLAKE_PASSWORD"));
}

#[tokio::test(flavor = "current_thread")]
async fn test_live_regional_query() {
    let Some(config) = live_config() else {
        eprintln!("Skipping test: SNOWFLAKE_ACCOUNT not set");
        return;
    };

    let client = warehouse::connect(&config).await.unwrap();
    let regions = marts::fetch_regional_performance(client.as_ref(), config.schema_name())
        .await
        .unwrap();

    for pair in regions.windows(2) {
        assert!(pair[0].gross_profit >= pair[1].gross_profit);
    }
    client.close().await.unwrap();
}

#[tokio::test(flavor = "current_thread")]
async fn test_live_rejects_unknown_view() {
    let Some(config) = live_config() else {
        eprintln!("Skipping test: SNOWFLAKE_ACCOUNT not set");
        return;
    };

    let client = warehouse::connect(&config).await.unwrap();
    let result = client
        .execute_query("SELECT 1 FROM SCHEMA_MART.MART_DOES_NOT_EXIST")
        .await;

    assert!(matches!(result, Err(ChartError::Query(_))));
    client.close().await.unwrap();
}
