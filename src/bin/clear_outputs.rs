use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use uxpilot_scraper::config::{self, Config};
use uxpilot_scraper::outputs;

/// Deletes the HTML and JSON output directories
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Skip the confirmation prompt
    #[arg(long)]
    yes: bool,

    /// Path to the config file
    #[arg(long, default_value = config::CONFIG_FILE)]
    config: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::load(&args.config)?;

    let html_dir = outputs::html_dir(&config);
    let json_dir = outputs::json_dir(&config);

    println!("The following directories will be permanently deleted:");
    println!("  {}", html_dir.display());
    println!("  {}", json_dir.display());

    if !args.yes && !confirm()? {
        println!("Cancelled");
        return Ok(());
    }

    for dir in [html_dir, json_dir] {
        match std::fs::remove_dir_all(&dir) {
            Ok(()) => {}
            // already gone is fine
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
    }

    println!("Outputs cleared");
    Ok(())
}

fn confirm() -> std::io::Result<bool> {
    print!("Are you sure you want to continue? (y/n) ");
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}
