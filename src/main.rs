use bot_metrics::models::InputDocument;
use bot_metrics::{Config, build_fleet_summary, build_report, load_document, to_json};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    info!("reading metrics from {}", config.input_path.display());

    let output = match load_document(&config.input_path).await? {
        InputDocument::Bot(bot) => to_json(&build_report(&bot)?, config.pretty)?,
        InputDocument::Fleet(bots) => {
            info!("summarizing {} bots", bots.len());
            to_json(&build_fleet_summary(&bots), config.pretty)?
        }
    };

    println!("{output}");
    Ok(())
}
