//! Bulk loader for the storefront CSV exports
//!
//! Drops and recreates the four tables, then loads `users.csv`,
//! `orders.csv`, `products.csv` and `order_items.csv` from the data
//! directory. Settings default to the server configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use serde::Serialize;
use storefront_admin_api::{
    config::{self, AppConfig},
    db,
    loader::{LoadSummary, Loader, LoaderOptions},
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "load-data",
    about = "Load the storefront CSV exports into the dashboard database",
    version
)]
struct Cli {
    #[arg(long, help = "Database URL; defaults to the configured database_url")]
    database_url: Option<String>,
    #[arg(long, help = "Directory holding the CSV files; defaults to data_dir")]
    data_dir: Option<PathBuf>,
    #[arg(
        long,
        conflicts_with = "no_row_limit",
        help = "Maximum rows loaded per file (0 loads everything)"
    )]
    row_limit: Option<usize>,
    #[arg(long, action = ArgAction::SetTrue, help = "Load every row of every file")]
    no_row_limit: bool,
    #[arg(long, value_parser = parse_delimiter, help = "Field delimiter, a single character or 'tab'")]
    delimiter: Option<u8>,
    #[arg(
        long,
        action = ArgAction::SetTrue,
        help = "Keep SQLite foreign-key checks on; orphaned rows are skipped"
    )]
    enforce_foreign_keys: bool,
    #[arg(long, action = ArgAction::SetTrue, help = "Print the load summary as JSON")]
    json: bool,
}

fn parse_delimiter(raw: &str) -> std::result::Result<u8, String> {
    match raw {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        _ => match raw.as_bytes() {
            [byte] if byte.is_ascii() => Ok(*byte),
            _ => Err(format!("delimiter must be a single ASCII character, got '{raw}'")),
        },
    }
}

impl Cli {
    fn row_limit(&self, cfg: &AppConfig) -> Option<usize> {
        if self.no_row_limit {
            return None;
        }
        match self.row_limit {
            Some(0) => None,
            Some(limit) => Some(limit),
            None => cfg.load_row_limit(),
        }
    }

    fn loader_options(&self, cfg: &AppConfig) -> LoaderOptions {
        let options = LoaderOptions::default()
            .with_row_limit(self.row_limit(cfg))
            .with_foreign_keys(self.enforce_foreign_keys);
        match self.delimiter {
            Some(delimiter) => options.with_delimiter(delimiter),
            None => options,
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn render_summary(summary: &LoadSummary) {
    for report in &summary.tables {
        println!("- {report}");
    }
    println!(
        "Loaded {} rows ({} skipped)",
        summary.total_inserted(),
        summary.total_skipped()
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config().context("failed to load configuration")?;
    config::init_tracing(cfg.log_level(), cfg.log_json);

    let database_url = cli
        .database_url
        .clone()
        .unwrap_or_else(|| cfg.database_url().to_string());
    let data_dir = cli.data_dir.clone().unwrap_or_else(|| cfg.data_dir.clone());
    let options = cli.loader_options(&cfg);

    info!(
        data_dir = %data_dir.display(),
        row_limit = ?options.row_limit,
        enforce_foreign_keys = options.enforce_foreign_keys,
        "Starting data load"
    );

    let db = db::establish_loader_connection(&database_url)
        .await
        .with_context(|| format!("failed to open database {database_url}"))?;
    let loader = Loader::new(db, options);

    let summary = loader
        .run(&data_dir)
        .await
        .with_context(|| format!("data load from {} failed", data_dir.display()))?;

    info!(
        inserted = summary.total_inserted(),
        skipped = summary.total_skipped(),
        "Data load complete"
    );

    if cli.json {
        print_json(&summary)?;
    } else {
        render_summary(&summary);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> AppConfig {
        AppConfig::new(
            "sqlite::memory:".into(),
            "127.0.0.1".into(),
            5000,
            "development".into(),
        )
    }

    #[test]
    fn defaults_come_from_config() {
        let cli = Cli::try_parse_from(["load-data"]).unwrap();
        let options = cli.loader_options(&cfg());
        assert_eq!(options.row_limit, Some(5000));
        assert_eq!(options.delimiter, b',');
        assert!(!options.enforce_foreign_keys);
    }

    #[test]
    fn row_limit_flags() {
        let cli = Cli::try_parse_from(["load-data", "--row-limit", "10"]).unwrap();
        assert_eq!(cli.row_limit(&cfg()), Some(10));

        let cli = Cli::try_parse_from(["load-data", "--row-limit", "0"]).unwrap();
        assert_eq!(cli.row_limit(&cfg()), None);

        let cli = Cli::try_parse_from(["load-data", "--no-row-limit"]).unwrap();
        assert_eq!(cli.row_limit(&cfg()), None);

        assert!(Cli::try_parse_from(["load-data", "--row-limit", "5", "--no-row-limit"]).is_err());
    }

    #[test]
    fn delimiter_parsing() {
        assert_eq!(parse_delimiter(";"), Ok(b';'));
        assert_eq!(parse_delimiter("tab"), Ok(b'\t'));
        assert!(parse_delimiter(",,").is_err());
        assert!(parse_delimiter("").is_err());
    }
}
