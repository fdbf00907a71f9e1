//! Sequencing of the five questions: query, chart, save.
//!
//! The generator runs the selected questions in their canonical order and
//! stops at the first failure. Everything it did is recorded in a
//! [`GenerationReport`], so artifacts already on disk are accounted for even
//! when a later question fails.

use clap::ValueEnum;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::charts::{self, ArtifactWriter, Artifacts};
use crate::error::{ChartError, Result};
use crate::marts::{self, ChurnRisk, CustomerSegment, DiscountImpact, MartTable};
use crate::marts::{ProductPerformance, RegionalPerformance};
use crate::warehouse::WarehouseClient;

/// One of the fixed analytical questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum)]
pub enum Question {
    /// Which regions are most profitable?
    Regional,
    /// Which product categories perform best?
    Product,
    /// Is discounting hurting margins?
    Discount,
    /// Which customer segments are most valuable?
    Segments,
    /// How can we reduce churn?
    Churn,
}

impl Question {
    /// Every question, in canonical order.
    pub const ALL: [Question; 5] = [
        Question::Regional,
        Question::Product,
        Question::Discount,
        Question::Segments,
        Question::Churn,
    ];

    /// 1-based position in the canonical order.
    pub fn number(self) -> usize {
        match self {
            Question::Regional => 1,
            Question::Product => 2,
            Question::Discount => 3,
            Question::Segments => 4,
            Question::Churn => 5,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Question::Regional => "Regional Profitability",
            Question::Product => "Product Performance",
            Question::Discount => "Discount Impact",
            Question::Segments => "Customer Segments",
            Question::Churn => "Churn Risk",
        }
    }

    /// The SELECT statement answering this question.
    pub fn sql(self, schema: &str) -> String {
        match self {
            Question::Regional => marts::query_sql::<RegionalPerformance>(schema),
            Question::Product => marts::query_sql::<ProductPerformance>(schema),
            Question::Discount => marts::query_sql::<DiscountImpact>(schema),
            Question::Segments => marts::query_sql::<CustomerSegment>(schema),
            Question::Churn => marts::query_sql::<ChurnRisk>(schema),
        }
    }

    /// MART view the question reads.
    pub fn view(self) -> &'static str {
        match self {
            Question::Regional => RegionalPerformance::VIEW,
            Question::Product => ProductPerformance::VIEW,
            Question::Discount => DiscountImpact::VIEW,
            Question::Segments => CustomerSegment::VIEW,
            Question::Churn => ChurnRisk::VIEW,
        }
    }

    /// Queries the warehouse and builds the chart for this question.
    pub async fn chart(self, client: &dyn WarehouseClient, schema: &str) -> Result<charts::Chart> {
        let chart = match self {
            Question::Regional => charts::regional_performance_chart(
                &marts::fetch_regional_performance(client, schema).await?,
            ),
            Question::Product => charts::product_performance_chart(
                &marts::fetch_product_performance(client, schema).await?,
            ),
            Question::Discount => {
                charts::discount_impact_chart(&marts::fetch_discount_impact(client, schema).await?)
            }
            Question::Segments => charts::customer_segments_chart(
                &marts::fetch_customer_segments(client, schema).await?,
            ),
            Question::Churn => {
                charts::churn_risk_chart(&marts::fetch_churn_metrics(client, schema).await?)
            }
        };
        Ok(chart)
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number(), self.title())
    }
}

/// Puts a selection into canonical order without duplicates; empty means all.
pub fn canonical_selection(selected: &[Question]) -> Vec<Question> {
    if selected.is_empty() {
        return Question::ALL.to_vec();
    }
    Question::ALL
        .into_iter()
        .filter(|q| selected.contains(q))
        .collect()
}

/// What happened to one attempted question.
#[derive(Debug)]
pub struct Outcome {
    pub question: Question,
    pub result: Result<Artifacts>,
}

/// Record of a generation run.
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub outcomes: Vec<Outcome>,
    /// Selected questions never attempted because an earlier one failed.
    pub skipped: Vec<Question>,
}

impl GenerationReport {
    /// True when every selected question produced its artifacts.
    pub fn is_success(&self) -> bool {
        self.skipped.is_empty() && self.outcomes.iter().all(|o| o.result.is_ok())
    }

    /// Questions whose artifacts were written.
    pub fn succeeded(&self) -> Vec<Question> {
        self.outcomes
            .iter()
            .filter(|o| o.result.is_ok())
            .map(|o| o.question)
            .collect()
    }

    /// The failure that stopped the run, if any.
    pub fn failure(&self) -> Option<(Question, &ChartError)> {
        self.outcomes
            .iter()
            .find_map(|o| o.result.as_ref().err().map(|e| (o.question, e)))
    }

    /// Every file written during the run.
    pub fn written_files(&self) -> Vec<PathBuf> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .flat_map(|a| a.paths().map(Path::to_path_buf))
            .collect()
    }

    /// Prints the closing summary.
    pub fn print_summary(&self, output_dir: &Path) {
        let rule = "=".repeat(60);
        println!();
        println!("{rule}");
        if self.is_success() {
            println!("All visualizations generated successfully!");
        } else {
            let done = self.succeeded();
            println!(
                "Generated {} of {} visualizations.",
                done.len(),
                self.outcomes.len() + self.skipped.len()
            );
            for question in done {
                println!("  done:    {question}");
            }
            if let Some((question, err)) = self.failure() {
                println!("  failed:  {question} ({})", err.category());
            }
            for question in &self.skipped {
                println!("  skipped: {question}");
            }
        }
        println!("Files saved in {}", output_dir.display());
        println!("{rule}");
    }
}

/// Runs questions against one warehouse session and saves their charts.
pub struct Generator<'a> {
    client: &'a dyn WarehouseClient,
    schema: &'a str,
    writer: &'a ArtifactWriter,
}

impl<'a> Generator<'a> {
    pub fn new(client: &'a dyn WarehouseClient, schema: &'a str, writer: &'a ArtifactWriter) -> Self {
        Self {
            client,
            schema,
            writer,
        }
    }

    /// Answers one question and writes its artifacts.
    pub async fn answer(&self, question: Question) -> Result<Artifacts> {
        let chart = question.chart(self.client, self.schema).await?;
        self.writer.write(&chart)
    }

    /// Answers the selected questions in canonical order, stopping at the first failure.
    pub async fn generate(&self, selected: &[Question]) -> GenerationReport {
        let mut report = GenerationReport::default();
        let mut queue = canonical_selection(selected).into_iter();

        println!("Generating visualizations...");
        for question in queue.by_ref() {
            println!();
            println!("{question}");

            let result = self.answer(question).await;
            let failed = match &result {
                Ok(artifacts) => {
                    for path in artifacts.paths() {
                        println!("Created: {}", display_name(path));
                    }
                    false
                }
                Err(e) => {
                    println!();
                    println!("Error generating visualizations: {e}");
                    true
                }
            };
            report.outcomes.push(Outcome { question, result });
            if failed {
                break;
            }
        }
        report.skipped = queue.collect();

        info!(
            "Generated {} of {} questions",
            report.succeeded().len(),
            report.outcomes.len() + report.skipped.len()
        );
        report
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Generates the selected questions, then closes the session whatever the outcome.
pub async fn run(
    client: &dyn WarehouseClient,
    schema: &str,
    writer: &ArtifactWriter,
    selected: &[Question],
) -> GenerationReport {
    let report = Generator::new(client, schema, writer)
        .generate(selected)
        .await;

    match client.close().await {
        Ok(()) => println!("Connection closed."),
        Err(e) => warn!("Failed to close warehouse session: {e}"),
    }

    report
}
