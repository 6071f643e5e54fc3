use anyhow::{Context, Result};
use growth_lms::{
    init_logging, serve, AppState, ClassificationThresholds, MeasurementQuery, MeasurementSink,
    MetricKind, ParquetChartWriter, PercentileResolver, PercentileResult, ReportFormatter, Sex,
    DisplayMessage, TableValidator, REFERENCE_TABLE,
};
use clap::{Parser, Subcommand};
use object_store::local::LocalFileSystem;
use object_store::ObjectStore;
use serde::Serialize;
use std::{path::{Path, PathBuf}, sync::Arc};
use tracing::{error, info, warn};

const DEFAULT_DATA_DIR: &str = "growth_data";

#[derive(Debug, Parser)]
#[command(name = "growth-lms")]
#[command(about = "LMS growth percentile engine and API server")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a single measurement
    Resolve {
        metric: MetricKind,

        sex: Sex,

        /// Age in the metric's table unit (weeks for head circumference, months otherwise)
        #[arg(allow_negative_numbers = true)]
        age: f64,

        #[arg(allow_negative_numbers = true)]
        value: f64,

        /// Clamp ages outside the chart to its nearest bound
        #[arg(long)]
        clamp: bool,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve a JSON array of measurements
    Batch {
        input: PathBuf,

        #[arg(long)]
        clamp: bool,

        /// Persist resolved measurements as Parquet under this directory
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Print a reference partition
    Table {
        metric: MetricKind,
        sex: Sex,
    },
    /// Check tabulated SD points against the LMS parameters
    Validate,
    /// Export reference charts as Parquet
    Export {
        #[arg(short, long, default_value = DEFAULT_DATA_DIR)]
        out_dir: PathBuf,
    },
    /// Start the API server
    Serve {
        #[arg(short, long, default_value = "50001")]
        port: u16,

        #[arg(short = 'b', long, default_value = "127.0.0.1")]
        host: String,
    },
}

#[derive(Serialize)]
struct BatchLine {
    query: MeasurementQuery,
    result: Option<PercentileResult>,
    error: Option<String>,
    message: DisplayMessage,
}

fn ensure_directory(dir: &Path) -> Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
        info!("Created directory: {:?}", dir);
    }
    Ok(())
}

fn local_store(dir: &Path) -> Result<Arc<dyn ObjectStore>> {
    ensure_directory(dir)?;
    let store = LocalFileSystem::new_with_prefix(dir)
        .with_context(|| format!("Failed to open object store at {:?}", dir))?;
    Ok(Arc::new(store))
}

fn run_validation() -> Result<()> {
    info!("Running reference table validation");
    let validator = TableValidator::new(&REFERENCE_TABLE);

    let mut has_significant_errors = false;
    let mut has_minor_discrepancies = false;

    for (key, stats) in validator.validate_all() {
        for discrepancy in &stats.discrepancies {
            if discrepancy.difference_percent > growth_lms::SIGNIFICANT_SD_DISCREPANCY_PERCENT {
                has_significant_errors = true;
                error!(
                    "Significant discrepancy for {} age {} SD{}: tabulated {} vs derived {:.3} ({:.2}%)",
                    key, discrepancy.age_index, discrepancy.level, discrepancy.tabulated,
                    discrepancy.derived, discrepancy.difference_percent
                );
            } else {
                has_minor_discrepancies = true;
                warn!(
                    "Minor discrepancy for {} age {} SD{}: tabulated {} vs derived {:.3} ({:.2}%)",
                    key, discrepancy.age_index, discrepancy.level, discrepancy.tabulated,
                    discrepancy.derived, discrepancy.difference_percent
                );
            }
        }
    }

    if has_significant_errors {
        return Err(anyhow::anyhow!(
            "Validation failed with significant discrepancies"
        ));
    }

    if has_minor_discrepancies {
        warn!("Validation completed with minor discrepancies");
    } else {
        info!("Validation completed successfully with no discrepancies");
    }

    Ok(())
}

async fn run_batch(
    input: &Path,
    clamp: bool,
    output_dir: Option<PathBuf>,
    formatter: &ReportFormatter,
) -> Result<()> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {:?}", input))?;
    let queries: Vec<MeasurementQuery> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse measurements in {:?}", input))?;

    info!("Resolving {} measurements", queries.len());
    let resolver = PercentileResolver::default();
    let outcomes = resolver.resolve_batch(&queries, clamp);

    let mut resolved = Vec::with_capacity(outcomes.len());
    for (query, outcome) in queries.into_iter().zip(outcomes) {
        let line = BatchLine {
            query,
            message: formatter.format_outcome(&outcome),
            error: outcome.as_ref().err().map(|e| e.to_string()),
            result: outcome.as_ref().ok().copied(),
        };
        println!("{}", serde_json::to_string(&line)?);

        if let Ok(result) = outcome {
            resolved.push(result);
        }
    }

    if let Some(dir) = output_dir {
        let writer = ParquetChartWriter::new(local_store(&dir)?);
        writer.persist(&resolved).await?;
        info!("Wrote {} measurements to {:?}", resolved.len(), dir);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    init_logging();

    // Parse command line arguments
    let cli = Cli::parse();

    let thresholds = ClassificationThresholds::from_env()?;
    let formatter = ReportFormatter::new(thresholds);

    match cli.command {
        Commands::Resolve {
            metric,
            sex,
            age,
            value,
            clamp,
            json,
        } => {
            let resolver = PercentileResolver::default();
            let query = MeasurementQuery::new(metric, sex, age, value);
            let result = if clamp {
                resolver.resolve_clamped(&query)?
            } else {
                resolver.resolve(&query)?
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
            println!("{}", formatter.format(&result).text);
        }
        Commands::Batch {
            input,
            clamp,
            output_dir,
        } => {
            run_batch(&input, clamp, output_dir, &formatter).await?;
        }
        Commands::Table { metric, sex } => {
            let records = REFERENCE_TABLE.partition(metric, sex)?;
            println!(
                "{:>5} {:>8} {:>9} {:>8}   SD3neg  SD2neg  SD1neg     SD0     SD1     SD2     SD3",
                metric.age_unit().to_string(), "L", "M", "S"
            );
            for record in records {
                let points = record
                    .sd
                    .points
                    .iter()
                    .map(|p| format!("{:>7.1}", p))
                    .collect::<Vec<_>>()
                    .join(" ");
                println!(
                    "{:>5} {:>8.4} {:>9.4} {:>8.5} {}",
                    record.age_index, record.l, record.m, record.s, points
                );
            }
        }
        Commands::Validate => {
            run_validation()?;
        }
        Commands::Export { out_dir } => {
            info!("Exporting reference charts to {:?}", out_dir);
            let writer = ParquetChartWriter::new(local_store(&out_dir)?);
            let written = writer.write_reference_charts(&REFERENCE_TABLE).await?;
            info!("Successfully exported {} charts", written);
        }
        Commands::Serve { host, port } => {
            info!("Starting API server");
            serve(host, port, AppState::new(&REFERENCE_TABLE, formatter)).await?;
        }
    }

    Ok(())
}
