//! Command-line interface for device-matcher.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **map**: Map one vendor listing to a catalog capacity
//! - **batch**: Map a feed of heterogeneous JSON records
//! - **catalog**: List, show, or export the device catalog
//!
//! ## Usage
//!
//! ```text
//! # Map one listing
//! device-matcher map "iPhone 13 Pro 128GB"
//!
//! # Explicit fields win over the name text
//! device-matcher map "MacBook Pro 16 M3 Max" --code A2991 --capacity "1 TB"
//!
//! # Map a JSON-lines feed from stdin
//! cat feed.jsonl | device-matcher batch - --format tsv
//!
//! # Use a custom catalog
//! device-matcher --catalog my_catalog.json catalog list --family ipad
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::adapter::FlatMatchResult;
use crate::catalog::store::DeviceCatalog;
use crate::matching::MatchingConfig;

pub mod batch;
pub mod catalog;
pub mod map;

#[derive(Parser)]
#[command(name = "device-matcher")]
#[command(version)]
#[command(about = "Map noisy vendor device listings to exact catalog capacities")]
#[command(
    long_about = "device-matcher reconciles free-text device listings (\"iPhone 13 Pro 128GB\", \"MacBook Pro 16 M3 Max A2991 8TB\") with the device catalog.\n\nIt extracts device attributes from the text, retrieves candidates by hardware id, name or generation, filters them through family-specific rules and reports:\n- The matched capacity with a confidence score\n- Alternates when several capacities fit\n- A suggestion when the model exists but the capacity does not"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Options shared by every subcommand
#[derive(Args, Clone, Debug)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Path to custom catalog file
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Path to a JSON matching config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

impl GlobalArgs {
    /// The `--catalog` file, or the embedded catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read or parsed.
    pub fn load_catalog(&self) -> anyhow::Result<DeviceCatalog> {
        let catalog = if let Some(path) = &self.catalog {
            DeviceCatalog::load_from_file(path)?
        } else {
            DeviceCatalog::load_embedded()?
        };
        if self.verbose {
            eprintln!("Loaded catalog with {} models", catalog.len());
        }
        Ok(catalog)
    }

    /// The `--config` file, or defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed.
    pub fn load_config(&self) -> anyhow::Result<MatchingConfig> {
        match &self.config {
            Some(path) => MatchingConfig::load_from_file(path),
            None => Ok(MatchingConfig::default()),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Map one device listing
    Map(map::MapArgs),

    /// Map a JSON array or JSON-lines file of records
    Batch(batch::BatchArgs),

    /// Inspect the device catalog
    Catalog(catalog::CatalogArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

fn print_text_result(index: usize, result: &FlatMatchResult, verbose: bool) {
    let title = result
        .capacity_description
        .as_deref()
        .or_else(|| result.features.as_ref().map(|f| f.original_text.as_str()))
        .unwrap_or("-");
    println!(
        "\n#{} {} ({})",
        index + 1,
        title,
        result.status.as_str().to_uppercase()
    );

    if let (Some(capacity_id), Some(model_id)) = (result.capacity_id, result.model_id) {
        println!("   Capacity ID: {capacity_id}");
        println!("   Model ID:    {model_id}");
    }
    if let Some(strategy) = result.strategy {
        println!(
            "   Strategy:    {strategy} (score {:.2}, {:?})",
            result.confidence, result.confidence_level
        );
    }
    if let Some(message) = &result.error_message {
        println!(
            "   Error:       {} [{}]",
            message,
            result.error_code.as_deref().unwrap_or("-")
        );
    }
    if let Some(rule) = &result.eliminated_by {
        println!("   Eliminated by rule: {rule}");
    }
    for (key, value) in &result.trace_ids {
        println!("   {key}: {value}");
    }

    if !result.alternatives.is_empty() {
        let label = if result.success { "Alternatives" } else { "Candidates" };
        println!("\n   {label}:");
        for alternative in &result.alternatives {
            println!(
                "     {:>8}  {:<50} {:.2}",
                alternative.capacity_id.0, alternative.description, alternative.score
            );
        }
    }

    if let Some(suggestion) = &result.suggestion {
        let list = |sizes: &[u32]| {
            sizes
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        println!("\n   Suggestion: create the missing capacity");
        println!(
            "     Models:   {}",
            suggestion
                .candidate_model_ids
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );
        println!("     Existing: {} GB", list(&suggestion.existing_capacities_gb));
        println!("     Observed: {} GB", list(&suggestion.observed_capacities_gb));
        println!("     Missing:  {} GB", list(&suggestion.missing_capacities_gb));
    }

    if verbose {
        if let Some(features) = &result.features {
            if !features.inferred_fields.is_empty() {
                println!("\n   Inferred: {}", features.inferred_fields.join(", "));
            }
        }
        for note in &result.notes {
            println!("   Note: {note}");
        }
        println!("   Elapsed: {} ms", result.elapsed_ms);
    }
}

/// Print flattened results in the chosen format
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn print_results(
    results: &[FlatMatchResult],
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            for (i, result) in results.iter().enumerate() {
                print_text_result(i, result, verbose);
            }
        }
        OutputFormat::Json => {
            if let [single] = results {
                println!("{}", serde_json::to_string_pretty(single)?);
            } else {
                println!("{}", serde_json::to_string_pretty(results)?);
            }
        }
        OutputFormat::Tsv => {
            println!("{}", FlatMatchResult::TSV_HEADER);
            for result in results {
                println!("{}", result.to_tsv_row());
            }
        }
    }
    Ok(())
}
