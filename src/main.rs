use clap::Parser;
use colored::*;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

use test_history_dashboard::cli::Args;
use test_history_dashboard::config::Config;
use test_history_dashboard::dashboard::Dashboard;
use test_history_dashboard::report::{render_json, render_load_failures, render_text};
use test_history_dashboard::source::HttpHistorySource;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    for builder in args.builders.iter().cloned() {
        config.add_builder(builder);
    }
    if config.builders.is_empty() {
        return Err("no builders configured; pass --config or --builder NAME=URL".into());
    }

    let source = HttpHistorySource::new(&config.fetch);
    let mut dashboard = Dashboard::new(config.builders);

    let load = dashboard.load(&source).await;
    eprint!("{}", render_load_failures(&load));
    if load.total_skipped() > 0 {
        eprintln!(
            "{} skipped {} malformed test histories",
            "[load]".bright_yellow(),
            load.total_skipped()
        );
    }

    let page = dashboard.rows(&args.search, args.search_mode(), args.page, args.page_size);
    if args.json {
        println!("{}", render_json(&page)?);
    } else {
        print!("{}", render_text(&page, std::io::stdout().is_terminal()));
    }
    Ok(())
}
