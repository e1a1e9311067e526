//! Command-line arguments.

use clap::{ArgGroup, Parser};
use std::path::PathBuf;

/// Where the selection comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionSource {
    /// A JSON payload on stdin (`--selection -`).
    Stdin,
    /// A JSON payload file.
    File(PathBuf),
    /// The product's default selection (`--preview`).
    Defaults,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "carry-quote")]
#[command(about = "Prices a product selection against a Carry catalog and prints a quote snapshot")]
#[command(version)]
#[command(group(ArgGroup::new("input").required(true).args(["selection", "preview"])))]
pub struct Cli {
    /// Product id to quote
    #[arg(short, long)]
    pub product: String,

    /// Selection payload file (JSON), or `-` for stdin
    #[arg(short, long)]
    pub selection: Option<String>,

    /// Quote the product's default selection
    #[arg(long)]
    pub preview: bool,

    /// Directory of product definitions (overrides config)
    #[arg(short, long)]
    pub catalog: Option<PathBuf>,

    /// Config file (defaults to the platform quote.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level when RUST_LOG is unset (overrides config)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl Cli {
    pub fn selection_source(&self) -> SelectionSource {
        match self.selection.as_deref() {
            Some("-") => SelectionSource::Stdin,
            Some(path) => SelectionSource::File(PathBuf::from(path)),
            None => SelectionSource::Defaults,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_sources() {
        let cli = Cli::parse_from(["carry-quote", "-p", "boost", "--preview"]);
        assert_eq!(cli.selection_source(), SelectionSource::Defaults);

        let cli = Cli::parse_from(["carry-quote", "-p", "boost", "-s", "-"]);
        assert_eq!(cli.selection_source(), SelectionSource::Stdin);

        let cli = Cli::parse_from(["carry-quote", "-p", "boost", "-s", "sel.json"]);
        assert_eq!(
            cli.selection_source(),
            SelectionSource::File(PathBuf::from("sel.json"))
        );
    }

    #[test]
    fn test_input_is_required_and_exclusive() {
        assert!(Cli::try_parse_from(["carry-quote", "-p", "boost"]).is_err());
        assert!(
            Cli::try_parse_from(["carry-quote", "-p", "boost", "-s", "x.json", "--preview"])
                .is_err()
        );
    }
}
