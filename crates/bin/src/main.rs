//! Almanac CLI binary.
//!
//! Builds the enriched monthly dataset from the three source files.

use almanac::{Pipeline, PipelineConfig, Stage};
use almanac_features::{FeatureCategory, available_features, features_by_category};
use almanac_output::ExportFormat;
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "almanac")]
#[command(about = "Almanac: monthly sales, search and economic dataset builder", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the monthly dataset (default)
    Build(BuildArgs),

    /// List derived feature columns
    Features {
        /// Only list one category (calendar, lag, rolling, scaling, outlier)
        #[arg(long)]
        category: Option<String>,
    },
}

#[derive(Args, Default)]
struct BuildArgs {
    /// Sales transactions CSV
    #[arg(long)]
    sales: Option<PathBuf>,

    /// Search index CSV
    #[arg(long)]
    search: Option<PathBuf>,

    /// Economic indicators CSV
    #[arg(long)]
    economic: Option<PathBuf>,

    /// Output file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Output format (csv, json, pretty-json); without --output, the default file takes the matching extension
    #[arg(long)]
    format: Option<ExportFormat>,

    /// Token written for missing values
    #[arg(long)]
    missing_token: Option<String>,

    /// JSON config file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print a dataset summary after building
    #[arg(long)]
    summary: bool,
}

impl BuildArgs {
    fn into_config(self) -> Result<PipelineConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)?,
            None => PipelineConfig::default(),
        };
        if let Some(path) = self.sales {
            config.sales_path = path;
        }
        if let Some(path) = self.search {
            config.search_path = path;
        }
        if let Some(path) = self.economic {
            config.economic_path = path;
        }
        if let Some(format) = self.format {
            config = config.with_format(format);
            if self.output.is_none() {
                config = config.with_output_extension();
            }
        }
        if let Some(path) = self.output {
            config.output_path = path;
        }
        if let Some(token) = self.missing_token {
            config.missing_token = token;
        }
        Ok(config)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "almanac=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command.unwrap_or_else(|| Commands::Build(BuildArgs::default())) {
        Commands::Build(args) => {
            let summary = args.summary;
            build(args.into_config()?, summary)?;
        }
        Commands::Features { category } => list_features(category.as_deref())?,
    }

    Ok(())
}

fn build(config: PipelineConfig, show_summary: bool) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        sales = %config.sales_path.display(),
        search = %config.search_path.display(),
        economic = %config.economic_path.display(),
        output = %config.output_path.display(),
        format = ?config.format,
        "building dataset"
    );

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{pos}/{len}] {msg}")?);
    pb.set_length(Stage::ALL.len() as u64);
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = Pipeline::new(config).run_with_progress(|stage| {
        pb.set_message(stage.description());
        pb.inc(1);
    });

    let output = match result {
        Ok(output) => {
            pb.finish_and_clear();
            output
        }
        Err(e) => {
            pb.abandon_with_message("Failed!");
            return Err(e.into());
        }
    };

    println!("SUCCESS! File saved: {}", output.path.display());
    if show_summary {
        println!("{}", output.summary.to_ascii_table());
    }
    Ok(())
}

fn list_features(category: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let features = match category {
        Some(name) => {
            let category = parse_category(name)
                .ok_or_else(|| format!("Unknown feature category: {}", name))?;
            features_by_category()
                .remove(&category)
                .unwrap_or_default()
        }
        None => available_features(),
    };

    println!("{:<20} {:<10} Description", "Column", "Category");
    println!("{}", "-".repeat(80));
    for feature in features {
        println!(
            "{:<20} {:<10} {}",
            feature.name, feature.category, feature.description
        );
    }
    Ok(())
}

fn parse_category(name: &str) -> Option<FeatureCategory> {
    [
        FeatureCategory::Calendar,
        FeatureCategory::Lag,
        FeatureCategory::Rolling,
        FeatureCategory::Scaling,
        FeatureCategory::Outlier,
    ]
    .into_iter()
    .find(|c| c.name().eq_ignore_ascii_case(name))
}
