use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "harlint",
    version,
    about = "Static JavaScript analysis over browser HAR captures"
)]
pub struct Args {
    /// Paths to .har capture documents, one per page load
    #[arg(required = true)]
    pub har_paths: Vec<PathBuf>,

    /// Page URL to report under (default: the capture's first request URL)
    #[arg(long)]
    pub url: Option<String>,

    /// Group label for the report (default: the page URL's host)
    #[arg(long)]
    pub group: Option<String>,

    /// Output format
    #[arg(long, default_value = "json")]
    pub format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Security rule set as a flat-config JSON file (default: built-in table)
    #[arg(long)]
    pub security_config: Option<PathBuf>,

    /// Standard rule set as a flat-config JSON file (default: built-in table)
    #[arg(long)]
    pub standard_config: Option<PathBuf>,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}
