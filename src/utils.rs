//! Utils

use std::path::PathBuf;

use clap::Parser;

use crate::observability::LoggingConfig;

/// Arguments for the register demo
#[derive(Debug, Parser)]
pub struct ExampleRegisterArgs {
    /// Register config file (YAML)
    #[clap(short, long, env = "REGISTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Tax rate override, e.g. `8%` or `0.08`
    #[clap(short, long, env = "REGISTER_TAX_RATE")]
    pub tax_rate: Option<String>,

    /// Catalog items to ring up, by id (repeat an id to add another unit)
    #[clap(short, long = "item", value_delimiter = ',')]
    pub items: Vec<u64>,

    /// New catalog items as `NAME=PRICE`, added before ringing up
    #[clap(short, long = "add", value_parser = parse_new_item)]
    pub add: Vec<(String, String)>,

    /// Write the sales history as CSV to this path
    #[clap(short, long)]
    pub export: Option<PathBuf>,

    /// Logging settings
    #[command(flatten)]
    pub logging: LoggingConfig,
}

/// Split `NAME=PRICE` at the last `=`.
///
/// # Errors
///
/// Returns a message if there is no `=`.
pub fn parse_new_item(s: &str) -> Result<(String, String), String> {
    s.rsplit_once('=')
        .map(|(name, price)| (name.to_string(), price.to_string()))
        .ok_or_else(|| format!("expected NAME=PRICE, got {s:?}"))
}
