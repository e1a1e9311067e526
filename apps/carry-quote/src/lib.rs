//! # carry-quote: Quote CLI for Carry
//!
//! Prices one product selection and prints a [`QuoteSnapshot`].
//!
//! ## Startup Sequence
//! 1. Parse flags
//! 2. Load configuration (defaults → quote.toml → `CARRY_*` → flags)
//! 3. Initialize tracing on stderr
//! 4. Load the catalog and look up the product
//! 5. Decode the selection payload, or build the default selection
//! 6. Validate + price through `carry_core::quote`
//! 7. Print the snapshot as JSON on stdout
//!
//! ## Usage
//! ```text
//! carry-quote --catalog ./catalog --product rank-boost --selection order.json
//! echo '{"value_ids":[10],"quantity":2}' | carry-quote -p rank-boost -s -
//! carry-quote -p leveling --preview --pretty
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod snapshot;

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use carry_catalog::Catalog;
use carry_core::{Product, Selection, SelectionPayload};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub use cli::{Cli, SelectionSource};
pub use config::{ConfigError, QuoteConfig};
pub use error::{AppError, ErrorOutput};
pub use snapshot::QuoteSnapshot;

/// Initializes the tracing subscriber on stderr.
///
/// `RUST_LOG` wins over `level`, so `RUST_LOG=carry_core=trace` shows the
/// engine's per-range events without touching the config.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Resolves configuration from every source, flags last.
pub fn resolve_config(cli: &Cli) -> Result<QuoteConfig, AppError> {
    let mut config = QuoteConfig::load(cli.config.clone())?;
    config.apply_cli(cli)?;
    Ok(config)
}

/// Loads the catalog, prices the requested selection and builds a snapshot.
pub fn execute(cli: &Cli, config: &QuoteConfig) -> Result<QuoteSnapshot, AppError> {
    let catalog = Catalog::load_dir(&config.catalog_dir)?;
    let product = catalog.get(&cli.product)?;

    let selection = match cli.selection_source() {
        SelectionSource::Defaults => Selection::defaults(product),
        SelectionSource::Stdin => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .map_err(|source| AppError::ReadSelection {
                    path: PathBuf::from("-"),
                    source,
                })?;
            decode_selection(product, &raw)?
        }
        SelectionSource::File(path) => decode_selection(product, &read_file(&path)?)?,
    };

    let price = carry_core::quote(product, &selection)?;
    info!(
        product = %product.id,
        unit_cents = price.unit_cents,
        line_total_cents = price.line_total_cents,
        "Quote priced"
    );
    Ok(QuoteSnapshot::new(product, selection, price))
}

/// Decodes a JSON selection payload against a product.
pub fn decode_selection(product: &Product, raw: &str) -> Result<Selection, AppError> {
    let payload: SelectionPayload = serde_json::from_str(raw)?;
    Ok(Selection::from_payload(product, &payload)?)
}

fn read_file(path: &Path) -> Result<String, AppError> {
    std::fs::read_to_string(path).map_err(|source| AppError::ReadSelection {
        path: path.to_path_buf(),
        source,
    })
}

/// Runs the CLI end to end and maps the outcome to an exit code.
pub fn run(cli: Cli) -> ExitCode {
    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            init_tracing("warn");
            return report(&err, false);
        }
    };
    init_tracing(&config.log_level);

    match execute(&cli, &config) {
        Ok(snapshot) => {
            let rendered = if config.pretty {
                serde_json::to_string_pretty(&snapshot)
            } else {
                serde_json::to_string(&snapshot)
            };
            match rendered {
                Ok(json) => {
                    let mut out = std::io::stdout().lock();
                    if writeln!(out, "{}", json).is_err() {
                        return ExitCode::FAILURE;
                    }
                    ExitCode::SUCCESS
                }
                Err(err) => report(&AppError::from(err), config.pretty),
            }
        }
        Err(err) => report(&err, config.pretty),
    }
}

/// Logs the error and writes its JSON form to stderr.
fn report(err: &AppError, pretty: bool) -> ExitCode {
    error!(error = %err, "Quote failed");
    let output = err.to_output();
    let json = if pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    };
    match json {
        Ok(json) => eprintln!("{}", json),
        Err(_) => eprintln!("{}", err),
    }
    ExitCode::FAILURE
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    const RANK_BOOST: &str = r#"{
        "id": "rank-boost",
        "title": "Rank Boost",
        "base_price_cents": 10000,
        "option_groups": [
            { "id": 1, "title": "Priority", "type": "radio", "pricing_mode": "absolute",
              "values": [
                { "id": 10, "title": "Normal", "delta_cents": 0, "is_default": true },
                { "id": 11, "title": "Express", "delta_cents": 300 }
              ] },
            { "id": 2, "title": "Accounts", "type": "quantity_range", "position": 1,
              "min": 1, "max": 5 }
        ]
    }"#;

    fn setup() -> (TempDir, QuoteConfig) {
        let dir = TempDir::new().unwrap();
        let catalog = dir.path().join("catalog");
        std::fs::create_dir(&catalog).unwrap();
        std::fs::write(catalog.join("rank-boost.json"), RANK_BOOST).unwrap();
        let config = QuoteConfig {
            catalog_dir: catalog,
            ..QuoteConfig::default()
        };
        (dir, config)
    }

    #[test]
    fn test_execute_with_selection_file() {
        let (dir, config) = setup();
        let selection = dir.path().join("selection.json");
        std::fs::write(&selection, r#"{ "value_ids": [11], "quantity": 2 }"#).unwrap();

        let cli = Cli::parse_from([
            "carry-quote",
            "-p",
            "rank-boost",
            "-s",
            selection.to_str().unwrap(),
        ]);
        let snapshot = execute(&cli, &config).unwrap();

        assert_eq!(snapshot.unit_price_cents, 10_300);
        assert_eq!(snapshot.quantity, 2);
        assert_eq!(snapshot.line_total_cents, 20_600);
        assert_eq!(snapshot.product_title, "Rank Boost");
    }

    #[test]
    fn test_execute_preview_uses_defaults() {
        let (_dir, config) = setup();
        let cli = Cli::parse_from(["carry-quote", "-p", "rank-boost", "--preview"]);
        let snapshot = execute(&cli, &config).unwrap();
        assert_eq!(snapshot.line_total_cents, 10_000);
    }

    #[test]
    fn test_execute_unknown_product() {
        let (_dir, config) = setup();
        let cli = Cli::parse_from(["carry-quote", "-p", "nope", "--preview"]);
        let err = execute(&cli, &config).unwrap_err();
        assert!(matches!(
            err.to_output(),
            ErrorOutput::Api(error::ApiError { code: error::ErrorCode::NotFound, .. })
        ));
    }

    #[test]
    fn test_decode_selection_errors() {
        let (_dir, config) = setup();
        let catalog = Catalog::load_dir(&config.catalog_dir).unwrap();
        let product = catalog.get("rank-boost").unwrap();

        assert!(matches!(
            decode_selection(product, "not json"),
            Err(AppError::InvalidPayload(_))
        ));
        assert!(matches!(
            decode_selection(product, r#"{ "value_ids": [99] }"#),
            Err(AppError::Pricing(carry_core::PricingError::UnknownValue { value_id: 99 }))
        ));
    }
}
