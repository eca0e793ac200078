use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tierconf::api::TierApi;
use tierconf::api::http::HttpTierApi;
use tierconf::config::Config;
use tierconf::consts::default_config_path;
use tierconf::engine::Engine;
use tierconf::engine::dispatcher::Dispatcher;
use tierconf::processor::console::ConsoleProcessor;

#[derive(Parser)]
#[command(name = "tierconf", version, about = "Process partner tier configuration requests.")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to the JSON config file (default: ~/.tierconf/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the query filters used to fetch pending requests
    Filters,
    /// List pending requests
    List,
    /// Decide each pending request at the terminal
    Run,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let path = cli.config.unwrap_or_else(default_config_path);
    let config = Config::load(&path)?;

    let api: Arc<dyn TierApi> =
        Arc::new(HttpTierApi::new(&config).context("failed to build HTTP client")?);
    let dispatcher = Dispatcher::new(config, Arc::clone(&api), Arc::new(ConsoleProcessor));

    match cli.command {
        Command::Filters => {
            println!(
                "{}",
                serde_json::to_string_pretty(&dispatcher.default_filters())?
            );
        }
        Command::List => {
            let requests = api.list(&dispatcher.default_filters()).await?;
            if requests.is_empty() {
                println!("no pending requests.");
            }
            for request in requests {
                println!(
                    "{}  {:<8}  account {}  product {}",
                    request.id,
                    request.request_type,
                    request.account_id(),
                    request.product_id()
                );
            }
        }
        Command::Run => {
            let summary = dispatcher.process().await?;
            println!("\n=> {}", summary);
        }
    }

    Ok(())
}
