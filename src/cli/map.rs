use clap::Args;

use crate::adapter::{FeedObservations, MappingFacade};
use crate::cli::{print_results, GlobalArgs};
use crate::core::input::MappingInput;
use crate::utils::validation::parse_price;

#[derive(Args)]
pub struct MapArgs {
    /// Free-text model name as the vendor wrote it
    #[arg(required = true)]
    pub name: String,

    /// Hardware code (Apple "A2991", Samsung "SM-S918B")
    #[arg(long)]
    pub code: Option<String>,

    /// Capacity ("256 GB", "1TB")
    #[arg(long)]
    pub capacity: Option<String>,

    /// Listed price; currency symbols and separators are accepted
    #[arg(long)]
    pub price: Option<String>,

    /// Brand
    #[arg(long)]
    pub brand: Option<String>,

    /// Number of alternate candidates to show
    #[arg(short = 'n', long)]
    pub max_alternatives: Option<usize>,
}

/// Execute map subcommand
///
/// # Errors
///
/// Returns an error if the catalog or config cannot be loaded, or if the
/// model name is empty.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: MapArgs, global: &GlobalArgs) -> anyhow::Result<()> {
    let catalog = global.load_catalog()?;
    let mut config = global.load_config()?;
    if let Some(n) = args.max_alternatives {
        config = config.with_max_alternatives(n);
    }

    let mut input = MappingInput::new(&args.name)?;
    if let Some(code) = &args.code {
        input = input.with_hardware_code(code);
    }
    if let Some(capacity) = &args.capacity {
        input = input.with_capacity(capacity);
    }
    if let Some(brand) = &args.brand {
        input = input.with_brand(brand);
    }
    if let Some(raw) = &args.price {
        match parse_price(raw) {
            Some(price) => input = input.with_price(price),
            None => tracing::warn!(price = %raw, "Ignoring unparsable price"),
        }
    }

    let facade = MappingFacade::new(&catalog, config);
    let result = facade.map(input);

    if global.verbose {
        for entry in result.context.entries() {
            eprintln!("[{}] {:?}: {}", entry.stage, entry.severity, entry.message);
        }
    }

    let flat = facade.flatten(&result, &FeedObservations::new());
    print_results(&[flat], global.format, global.verbose)
}
