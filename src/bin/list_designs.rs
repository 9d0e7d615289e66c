use clap::Parser;
use std::path::PathBuf;
use uxpilot_scraper::config::{self, Config};
use uxpilot_scraper::listing;

/// Lists previously extracted designs, grouped by design slug
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the config file
    #[arg(long, default_value = config::CONFIG_FILE)]
    config: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = Config::load(&args.config)?;

    let files = listing::collect_design_files(&config)?;
    if files.is_empty() {
        println!("No extracted designs found yet.");
        println!("Run fetch_design first to generate HTML and JSON files.");
        return Ok(());
    }

    let groups = listing::group_by_design(files);
    listing::print_report(&groups);

    Ok(())
}
