mod commands;
mod output;

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pokedex_lib::{CachedClient, LookupHandler, LookupService, PokedexConfig, RemoteLookup};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "pokedex")]
#[command(about = "Look up Pokémon from PokéAPI")]
struct Cli {
    /// Output format: table, json, csv, markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// Query a running `pokedex serve` instance instead of PokéAPI
    #[arg(long, global = true)]
    remote: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show one Pokémon as a card
    Lookup(commands::lookup::LookupArgs),
    /// Look up several Pokémon and rank them by total base stats
    Rank(commands::rank::RankArgs),
    /// Serve the lookup endpoint over HTTP
    Serve(commands::serve::ServeArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("pokedex=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = PokedexConfig::from_env();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        "csv" => OutputFormat::Csv,
        "markdown" | "md" => OutputFormat::Markdown,
        _ => OutputFormat::Table,
    };

    match &cli.command {
        Commands::Lookup(args) => {
            let client = build_client(cli.remote.as_deref(), &config)?;
            commands::lookup::run(args, &client, &format).await?
        }
        Commands::Rank(args) => {
            let client = build_client(cli.remote.as_deref(), &config)?;
            commands::rank::run(args, &client, &format).await?
        }
        Commands::Serve(args) => commands::serve::run(args, &config).await?,
    }

    Ok(())
}

fn build_client(remote: Option<&str>, config: &PokedexConfig) -> Result<CachedClient> {
    let service: Arc<dyn LookupService> = match remote {
        Some(url) => Arc::new(RemoteLookup::new(url, config.timeout)?),
        None => Arc::new(LookupHandler::from_config(config)),
    };
    Ok(CachedClient::new(service, config.cache()).with_retry_config(config.retry.clone()))
}
