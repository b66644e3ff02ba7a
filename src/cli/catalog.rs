use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::catalog::{CatalogReader, ModelQuery};
use crate::cli::{GlobalArgs, OutputFormat};
use crate::core::types::{DeviceFamily, ModelId};

#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommands,
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// List models in the catalog
    List {
        /// Filter by family (iphone, ipad, macbook, mac_desktop, galaxy)
        #[arg(long)]
        family: Option<String>,

        /// Only models whose description contains every given word
        #[arg(long, num_args = 1..)]
        search: Vec<String>,
    },

    /// Show one model and its capacities
    Show {
        /// Model ID
        #[arg(required = true)]
        id: u64,
    },

    /// Export the catalog as JSON
    Export {
        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Execute catalog subcommand
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded, the family is unknown,
/// the model does not exist, or the export cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: CatalogArgs, global: &GlobalArgs) -> anyhow::Result<()> {
    match args.command {
        CatalogCommands::List { family, search } => {
            run_list(family.as_deref(), &search, global)
        }
        CatalogCommands::Show { id } => run_show(ModelId::new(id), global),
        CatalogCommands::Export { output } => run_export(output, global),
    }
}

fn run_list(family: Option<&str>, search: &[String], global: &GlobalArgs) -> anyhow::Result<()> {
    let catalog = global.load_catalog()?;

    let mut query = ModelQuery::default();
    if let Some(name) = family {
        let family = DeviceFamily::parse(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown device family '{name}'"))?;
        query = ModelQuery::for_family(family);
    }
    for term in search {
        query = query.with_term(term);
    }
    let models = catalog.find_models(&query)?;

    match global.format {
        OutputFormat::Text => {
            println!("{:<8} {:<12} {:<6} {:<50} Capacities", "ID", "Family", "Year", "Description");
            println!("{}", "-".repeat(100));
            for model in &models {
                let capacities: Vec<String> = catalog
                    .capacities_for(&model.id)
                    .iter()
                    .map(|c| c.label.clone())
                    .collect();
                println!(
                    "{:<8} {:<12} {:<6} {:<50} {}",
                    model.id.0,
                    model.family.as_str(),
                    model.year.map_or_else(|| "-".to_string(), |y| y.to_string()),
                    model.description,
                    capacities.join(", ")
                );
            }
            println!("\nTotal: {} models", models.len());
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&models)?);
        }
        OutputFormat::Tsv => {
            println!("id\tfamily\tyear\tdescription\thardware_ids");
            for model in &models {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    model.id,
                    model.family.as_str(),
                    model.year.map(|y| y.to_string()).unwrap_or_default(),
                    model.description,
                    model.hardware_ids.join(",")
                );
            }
        }
    }

    Ok(())
}

fn run_show(id: ModelId, global: &GlobalArgs) -> anyhow::Result<()> {
    let catalog = global.load_catalog()?;
    let model = catalog
        .get(&id)
        .ok_or_else(|| anyhow::anyhow!("Model '{id}' not found"))?;
    let capacities = catalog.capacities_for(&id);

    match global.format {
        OutputFormat::Text => {
            println!("Model: {}\n", model.description);
            println!("ID:     {}", model.id);
            println!("Family: {}", model.family);
            println!("Brand:  {}", model.brand());
            if let Some(year) = model.year {
                println!("Year:   {year}");
            }
            if !model.hardware_ids.is_empty() {
                println!("Hardware IDs: {}", model.hardware_ids.join(", "));
            }

            println!("\nCapacities:");
            println!("{:<10} Label", "ID");
            println!("{}", "-".repeat(30));
            for capacity in &capacities {
                println!("{:<10} {}", capacity.id.0, capacity.label);
            }
        }
        OutputFormat::Json => {
            let value = serde_json::json!({
                "model": model,
                "capacities": capacities,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Tsv => {
            println!("capacity_id\tmodel_id\tlabel");
            for capacity in &capacities {
                println!("{}\t{}\t{}", capacity.id, capacity.model_id, capacity.label);
            }
        }
    }

    Ok(())
}

fn run_export(output: Option<PathBuf>, global: &GlobalArgs) -> anyhow::Result<()> {
    let catalog = global.load_catalog()?;
    let json = catalog.to_json()?;

    match output {
        Some(path) => {
            std::fs::write(&path, json)?;
            println!("Exported {} models to {}", catalog.len(), path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
