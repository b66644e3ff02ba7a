use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use serde_json::Value;

use crate::adapter::{FlatMatchResult, MappingFacade};
use crate::cli::{print_results, GlobalArgs, OutputFormat};
use crate::core::types::MatchStatus;
use crate::utils::validation::check_batch_limit;

#[derive(Args)]
pub struct BatchArgs {
    /// JSON array or JSON-lines file of records
    /// Use '-' for stdin
    #[arg(required = true)]
    pub input: PathBuf,

    /// Map at most this many records
    #[arg(long)]
    pub limit: Option<usize>,

    /// Number of alternate candidates per record
    #[arg(short = 'n', long)]
    pub max_alternatives: Option<usize>,
}

/// Parse a JSON array, or one JSON value per non-blank line
///
/// # Errors
///
/// Returns an error naming the first line that is not valid JSON.
pub fn parse_records(text: &str) -> anyhow::Result<Vec<Value>> {
    if text.trim_start().starts_with('[') {
        return serde_json::from_str(text).context("Invalid JSON array");
    }
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).with_context(|| format!("Invalid JSON on line {}", i + 1))
        })
        .collect()
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    use std::io::{self, Read};

    if path.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        return Ok(buffer);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn print_summary(results: &[FlatMatchResult]) {
    let count = |status: MatchStatus| results.iter().filter(|r| r.status == status).count();
    println!(
        "\nMapped {} records: {} success, {} no match, {} ambiguous, {} errors",
        results.len(),
        count(MatchStatus::Success),
        count(MatchStatus::NoMatch),
        count(MatchStatus::Ambiguous),
        count(MatchStatus::Error),
    );
}

/// Execute batch subcommand
///
/// # Errors
///
/// Returns an error if the input, catalog or config cannot be loaded.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: BatchArgs, global: &GlobalArgs) -> anyhow::Result<()> {
    let mut records = parse_records(&read_input(&args.input)?)?;
    let (keep, warning) = check_batch_limit(records.len(), args.limit);
    if let Some(warning) = warning {
        tracing::warn!("{warning}");
        records.truncate(keep);
    }

    let catalog = global.load_catalog()?;
    let mut config = global.load_config()?;
    if let Some(n) = args.max_alternatives {
        config = config.with_max_alternatives(n);
    }

    if global.verbose {
        eprintln!("Mapping {} records", records.len());
    }
    let facade = MappingFacade::new(&catalog, config);
    let results = facade.map_batch(&records);

    print_results(&results, global.format, global.verbose)?;
    if matches!(global.format, OutputFormat::Text) {
        print_summary(&results);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_array() {
        let records = parse_records(r#"[{"name": "iPhone 15"}, {"title": "iPad Air"}]"#).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_parse_json_lines() {
        let text = "{\"name\": \"iPhone 15\"}\n\n  \n{\"name\": \"Galaxy S23\"}\n";
        let records = parse_records(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["name"], "Galaxy S23");
    }

    #[test]
    fn test_parse_reports_bad_line() {
        let err = parse_records("{\"name\": \"iPhone 15\"}\n{oops\n").unwrap_err();
        assert!(err.to_string().contains("line 2"), "got: {err}");
    }
}
