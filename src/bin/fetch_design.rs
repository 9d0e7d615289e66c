use anyhow::Context;
use clap::Parser;
use indicatif::{HumanBytes, ProgressBar};
use std::path::PathBuf;
use std::time::Duration;
use uxpilot_scraper::browser::Browser;
use uxpilot_scraper::config::{self, Config};
use uxpilot_scraper::design::write_json_to_plugin_repo;
use uxpilot_scraper::outputs;
use uxpilot_scraper::styles::StyleComputer;

/// Fetches a rendered UXPilot design preview, extracts the embedded HTML,
/// computes its styles JSON and writes both artifacts to the output
/// directories (optionally mirroring the JSON into the Figma plugin repo)
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// UXPilot design URL, e.g. https://uxpilot.ai/s/<design-id>
    url: String,

    /// Path to the config file
    #[arg(long, default_value = config::CONFIG_FILE)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = Config::load(&args.config)?;

    let url = outputs::parse_design_url(&args.url)
        .context("invalid UXPilot design URL")?;

    // fail fast on a missing compute module, before the browser comes up
    let computer = StyleComputer::from_config(&config)?;

    tracing::info!(%url, "fetching UXPilot design");
    let browser = Browser::launch(&config).context("can't launch browser")?;
    tracing::info!("browser launched");

    let design = browser.fetch_design(&url)?;
    drop(browser);
    tracing::info!(
        slug = %design.slug,
        size = %HumanBytes(design.html.len() as u64),
        "design HTML extracted"
    );

    let spinner = ProgressBar::new_spinner()
        .with_message("Computing styles JSON (using computeHtmlStyles)...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    let styles_json = computer.compute(&design.html).await?;
    spinner.finish_with_message("Styles computed");

    // mirror into the plugin repo while the local writes run
    let plugin_task = config.options.auto_write_to_plugin.then(|| {
        let config = config.clone();
        let json = styles_json.clone();
        tokio::spawn(async move { write_json_to_plugin_repo(&config, &json).await })
    });

    let (paths, html_bytes, json_bytes) = design.write_artifacts(&config, &styles_json).await?;

    if let Some(task) = plugin_task {
        match task.await? {
            Ok((path, bytes)) => tracing::info!(
                path = %path.display(),
                size = %HumanBytes(bytes),
                "JSON written to plugin repo"
            ),
            Err(err) => tracing::warn!(%err, "can't write JSON to plugin repo"),
        }
    }

    println!("UXPilot design fetched and saved");
    println!("HTML: {} ({})", paths.html.display(), HumanBytes(html_bytes));
    println!("JSON: {} ({})", paths.json.display(), HumanBytes(json_bytes));

    Ok(())
}
