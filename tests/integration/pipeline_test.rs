//! End-to-end generation against the demo warehouse.

use plotly::Plot;
use pretty_assertions::assert_eq;
use shopsphere_charts::charts::{ArtifactWriter, ImageExporter};
use shopsphere_charts::error::{ChartError, Result};
use shopsphere_charts::report::{self, Question};
use shopsphere_charts::warehouse::{FailingWarehouseClient, MockWarehouseClient};
use std::path::Path;

/// Writes a placeholder file instead of rendering through Kaleido.
struct PlaceholderExporter;

impl ImageExporter for PlaceholderExporter {
    fn export(&self, _plot: &Plot, path: &Path, width: usize, height: usize) -> Result<()> {
        std::fs::write(path, format!("{width}x{height}"))?;
        Ok(())
    }
}

fn writer(dir: &Path) -> ArtifactWriter {
    ArtifactWriter::with_exporter(dir, Box::new(PlaceholderExporter))
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_demo_run_writes_ten_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("charts");
    let client = MockWarehouseClient::demo();

    let report = report::run(&client, "SCHEMA_MART", &writer(&out), &[]).await;

    assert!(report.is_success());
    assert_eq!(
        file_names(&out),
        vec![
            "churn_risk.html",
            "churn_risk.png",
            "customer_segments.html",
            "customer_segments.png",
            "discount_impact.html",
            "discount_impact.png",
            "product_performance.html",
            "product_performance.png",
            "regional_performance.html",
            "regional_performance.png",
        ]
    );
    assert_eq!(report.written_files().len(), 10);
    assert_eq!(
        std::fs::read_to_string(out.join("regional_performance.png")).unwrap(),
        "1400x500"
    );
    assert!(client.is_closed());
}

#[tokio::test]
async fn test_queries_run_in_canonical_order() {
    let dir = tempfile::tempdir().unwrap();
    let client = MockWarehouseClient::demo();

    report::run(&client, "SCHEMA_MART", &writer(dir.path()), &[]).await;

    let views: Vec<&str> = Question::ALL.iter().map(|q| q.view()).collect();
    let executed = client.executed_queries();
    assert_eq!(executed.len(), views.len());
    for (sql, view) in executed.iter().zip(views) {
        assert!(sql.contains(&format!("SCHEMA_MART.{view}")), "{sql}");
    }
}

#[tokio::test]
async fn test_only_keeps_canonical_order() {
    let dir = tempfile::tempdir().unwrap();
    let client = MockWarehouseClient::demo();

    let report = report::run(
        &client,
        "SCHEMA_MART",
        &ArtifactWriter::html_only(dir.path()),
        &[Question::Churn, Question::Discount],
    )
    .await;

    assert_eq!(report.succeeded(), vec![Question::Discount, Question::Churn]);
    assert_eq!(
        file_names(dir.path()),
        vec!["churn_risk.html", "discount_impact.html"]
    );
    assert_eq!(client.executed_queries().len(), 2);
}

#[tokio::test]
async fn test_failing_warehouse_records_error_and_closes() {
    let dir = tempfile::tempdir().unwrap();
    let client = FailingWarehouseClient::new("Warehouse 'COMPUTE_WH' is suspended");

    let report = report::run(&client, "SCHEMA_MART", &writer(dir.path()), &[]).await;

    assert!(!report.is_success());
    assert!(report.succeeded().is_empty());
    let (question, err) = report.failure().unwrap();
    assert_eq!(question, Question::Regional);
    assert!(matches!(err, ChartError::Query(_)));
    assert!(err.to_string().contains("suspended"));
    assert_eq!(report.skipped.len(), 4);
    assert!(file_names(dir.path()).is_empty());
    assert!(client.is_closed());
}

#[tokio::test]
async fn test_custom_schema_is_queried() {
    let dir = tempfile::tempdir().unwrap();
    let client = MockWarehouseClient::demo();

    report::run(
        &client,
        "REPORTING",
        &ArtifactWriter::html_only(dir.path()),
        &[Question::Segments],
    )
    .await;

    assert_eq!(client.executed_queries().len(), 1);
    assert!(client.executed_queries()[0].contains("FROM REPORTING.MART_CUSTOMER_SEGMENTS"));
}
