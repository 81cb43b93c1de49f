use std::time::Duration;

use anyhow::{bail, Result};
use clap::Args;
use indicatif::ProgressBar;
use pokedex_lib::{CachedClient, MISSING_QUERY_MESSAGE};

use crate::output::{
    print_card, print_json, print_records_csv, print_records_markdown, OutputFormat,
};

#[derive(Args)]
pub struct LookupArgs {
    /// Pokémon name or national dex number
    pub query: String,
}

pub async fn run(args: &LookupArgs, client: &CachedClient, format: &OutputFormat) -> Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!("Looking up {}...", args.query.trim()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let state = client.search(&args.query).await;
    spinner.finish_and_clear();

    if let Some(error) = state.error {
        bail!(error);
    }
    let Some(record) = state.data else {
        bail!(MISSING_QUERY_MESSAGE);
    };

    match format {
        OutputFormat::Table => print_card(&record),
        OutputFormat::Json => print_json(&record),
        OutputFormat::Csv => print_records_csv(std::slice::from_ref(&record))?,
        OutputFormat::Markdown => print_records_markdown(std::slice::from_ref(&record)),
    }

    Ok(())
}
