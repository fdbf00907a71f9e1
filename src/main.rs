//! ShopSphere Charts - renders the MART views as interactive and static charts.

use shopsphere_charts::charts::ArtifactWriter;
use shopsphere_charts::cli::Cli;
use shopsphere_charts::config::Config;
use shopsphere_charts::error::Result;
use shopsphere_charts::logging;
use shopsphere_charts::report::{self, canonical_selection};
use shopsphere_charts::warehouse::{self, MockWarehouseClient, WarehouseClient};
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: could not read .env file: {e}");
        }
    }

    let cli = Cli::parse_args();
    logging::init_stderr_logging(cli.log_level());

    match run(cli).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("{}: {}", e.category(), e);
            std::process::exit(1);
        }
    }
}

/// Returns whether every selected chart was produced.
async fn run(cli: Cli) -> Result<bool> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    let connection = cli.resolve_connection(&config)?;
    connection.validate_identifiers()?;
    let schema = connection.schema_name().to_string();

    if cli.print_sql {
        for question in canonical_selection(&cli.only) {
            println!("-- {question}");
            println!("{};", question.sql(&schema));
            println!();
        }
        return Ok(true);
    }

    let rule = "=".repeat(60);
    println!();
    println!("{rule}");
    println!("ShopSphere Analytics - Visualization Generator");
    println!("{rule}");
    println!();

    let output_dir = cli.output_dir(&config);
    let writer = if cli.images_enabled(&config) {
        ArtifactWriter::new(&output_dir, config.output.image_scale)
    } else {
        ArtifactWriter::html_only(&output_dir)
    };

    let client: Box<dyn WarehouseClient> = if cli.mock_warehouse {
        println!("Using the built-in demo dataset.");
        println!();
        Box::new(MockWarehouseClient::demo())
    } else {
        connection.validate_credentials()?;
        info!("Connection: {}", connection.display_string());
        println!("Connecting to Snowflake...");
        match warehouse::connect(&connection).await {
            Ok(client) => {
                println!("Connected successfully!");
                println!();
                client
            }
            Err(e) => {
                println!("Connection failed: {e}");
                println!();
                println!(
                    "Please check the connection settings ({}, command-line flags or SNOWFLAKE_* variables).",
                    config_path.display()
                );
                return Ok(false);
            }
        }
    };

    let report = report::run(client.as_ref(), &schema, &writer, &cli.only).await;
    report.print_summary(writer.dir());

    Ok(report.is_success())
}
