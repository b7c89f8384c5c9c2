use crate::dashboard::SearchMode;
use crate::model::Builder;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "test-history")]
#[command(version)]
#[command(about = "Fetch test run history from CI builders and search it by test name")]
pub struct Args {
    /// TOML config file with builders and fetch options
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Extra builder as NAME=URL (repeatable; overrides a configured builder of the same name)
    #[arg(long = "builder", value_name = "NAME=URL", value_parser = parse_builder)]
    pub builders: Vec<Builder>,

    /// Case-insensitive text to look for in test names (empty shows every test)
    #[arg(long, default_value = "")]
    pub search: String,

    /// Match the search text as a name prefix instead of anywhere in the name
    #[arg(long)]
    pub prefix: bool,

    /// Zero-based page of results to show
    #[arg(long, default_value = "0")]
    pub page: usize,

    /// Rows per page
    #[arg(long, default_value = "50")]
    pub page_size: usize,

    /// Print the page as JSON instead of a text grid
    #[arg(long)]
    pub json: bool,
}

impl Args {
    pub fn search_mode(&self) -> SearchMode {
        if self.prefix {
            SearchMode::Prefix
        } else {
            SearchMode::Substring
        }
    }
}

/// Parse a `NAME=URL` builder argument.
pub fn parse_builder(s: &str) -> Result<Builder, String> {
    match s.split_once('=') {
        Some((name, url)) if !name.trim().is_empty() && !url.trim().is_empty() => {
            Ok(Builder::with_url(name.trim(), url.trim()))
        }
        _ => Err(format!("expected NAME=URL, got '{s}'")),
    }
}
