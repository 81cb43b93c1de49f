use anyhow::{bail, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use pokedex_lib::{filter_by_category, sort_by_total, top_by_total, CachedClient, DisplayRecord};

use crate::output::{
    print_json, print_records_csv, print_records_markdown, print_records_table, OutputFormat,
};

#[derive(Args)]
pub struct RankArgs {
    /// Pokémon names or national dex numbers
    #[arg(required = true)]
    pub queries: Vec<String>,

    /// Only keep Pokémon of this type (e.g. fire, water)
    #[arg(long)]
    pub category: Option<String>,

    /// Keep only the N highest totals
    #[arg(long)]
    pub top: Option<usize>,

    /// Sort ascending instead of descending
    #[arg(long)]
    pub asc: bool,
}

pub async fn run(args: &RankArgs, client: &CachedClient, format: &OutputFormat) -> Result<()> {
    let pb = ProgressBar::new(args.queries.len() as u64);
    pb.set_style(ProgressStyle::with_template(
        "[{elapsed_precise}] {bar:40.cyan/blue} {pos:>3}/{len:3} {msg}",
    )?);
    pb.set_message("looking up...");

    let mut records = Vec::with_capacity(args.queries.len());
    for query in &args.queries {
        match client.fetch(query).await {
            Ok(record) => records.push(record),
            Err(e) => pb.println(format!("  Skipping {}: {}", query, e.user_message())),
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    if records.is_empty() {
        bail!("none of the requested Pokémon could be found");
    }

    let ranked = rank(&records, args);
    eprintln!("{} of {} Pokémon ranked", ranked.len(), records.len());

    match format {
        OutputFormat::Table => print_records_table(&ranked),
        OutputFormat::Json => print_json(&ranked),
        OutputFormat::Csv => print_records_csv(&ranked)?,
        OutputFormat::Markdown => print_records_markdown(&ranked),
    }

    Ok(())
}

/// Applies the category filter, then either the top-N cut or a plain sort.
/// With both `--top` and `--asc`, the N highest are kept and shown lowest
/// first.
fn rank(records: &[DisplayRecord], args: &RankArgs) -> Vec<DisplayRecord> {
    let filtered = match &args.category {
        Some(category) => filter_by_category(records, category),
        None => records.to_vec(),
    };
    match args.top {
        Some(count) => {
            let top = top_by_total(&filtered, count);
            if args.asc {
                sort_by_total(&top, true)
            } else {
                top
            }
        }
        None => sort_by_total(&filtered, args.asc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pokedex_lib::Metrics;

    fn record(name: &str, total: u32, category: &str) -> DisplayRecord {
        DisplayRecord {
            id: total,
            name: name.into(),
            display_name: name.into(),
            height: "1m".into(),
            weight: "1kg".into(),
            image: String::new(),
            categories: vec![category.into()],
            metrics: Metrics {
                power: total,
                ..Metrics::default()
            },
        }
    }

    fn args(category: Option<&str>, top: Option<usize>, asc: bool) -> RankArgs {
        RankArgs {
            queries: vec![],
            category: category.map(String::from),
            top,
            asc,
        }
    }

    fn names(records: &[DisplayRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    fn sample() -> Vec<DisplayRecord> {
        vec![
            record("charmander", 309, "fire"),
            record("squirtle", 314, "water"),
            record("vulpix", 299, "fire"),
            record("arcanine", 555, "fire"),
        ]
    }

    #[test]
    fn sorts_descending_by_default() {
        let ranked = rank(&sample(), &args(None, None, false));
        assert_eq!(names(&ranked), vec!["arcanine", "squirtle", "charmander", "vulpix"]);
    }

    #[test]
    fn filters_then_sorts_ascending() {
        let ranked = rank(&sample(), &args(Some("Fire"), None, true));
        assert_eq!(names(&ranked), vec!["vulpix", "charmander", "arcanine"]);
    }

    #[test]
    fn top_keeps_highest() {
        let ranked = rank(&sample(), &args(Some("fire"), Some(2), false));
        assert_eq!(names(&ranked), vec!["arcanine", "charmander"]);

        let ranked = rank(&sample(), &args(Some("fire"), Some(2), true));
        assert_eq!(names(&ranked), vec!["charmander", "arcanine"]);
    }

    #[test]
    fn top_zero_is_empty() {
        assert!(rank(&sample(), &args(None, Some(0), false)).is_empty());
    }
}
