use std::io::IsTerminal;

use anyhow::Result;
use pokedex_lib::DisplayRecord;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

/// Stat bars are scaled against the highest possible base stat.
pub const MAX_STAT: u32 = 255;
const BAR_WIDTH: usize = 30;

#[derive(Tabled, Serialize)]
struct RecordRow {
    #[tabled(rename = "#")]
    #[serde(rename = "#")]
    id: u32,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Types")]
    #[serde(rename = "Types")]
    types: String,
    #[tabled(rename = "Height")]
    #[serde(rename = "Height")]
    height: String,
    #[tabled(rename = "Weight")]
    #[serde(rename = "Weight")]
    weight: String,
    #[tabled(rename = "HP")]
    #[serde(rename = "HP")]
    hp: u32,
    #[tabled(rename = "Atk")]
    #[serde(rename = "Atk")]
    attack: u32,
    #[tabled(rename = "Def")]
    #[serde(rename = "Def")]
    defense: u32,
    #[tabled(rename = "SpA")]
    #[serde(rename = "SpA")]
    special_attack: u32,
    #[tabled(rename = "SpD")]
    #[serde(rename = "SpD")]
    special_defense: u32,
    #[tabled(rename = "Spe")]
    #[serde(rename = "Spe")]
    speed: u32,
    #[tabled(rename = "Total")]
    #[serde(rename = "Total")]
    total: u64,
}

// -- Row builders --

fn build_record_rows(records: &[DisplayRecord]) -> Vec<RecordRow> {
    records
        .iter()
        .map(|r| RecordRow {
            id: r.id,
            name: r.display_name.clone(),
            types: r.categories.join("/"),
            height: r.height.clone(),
            weight: r.weight.clone(),
            hp: r.metrics.primary,
            attack: r.metrics.power,
            defense: r.metrics.resilience,
            special_attack: r.metrics.special_power,
            special_defense: r.metrics.special_resilience,
            speed: r.metrics.pace,
            total: r.total_metrics(),
        })
        .collect()
}

// -- Table output --

pub fn print_records_table(records: &[DisplayRecord]) {
    println!("{}", Table::new(build_record_rows(records)));
}

// -- Markdown output --

pub fn print_records_markdown(records: &[DisplayRecord]) {
    let mut table = Table::new(build_record_rows(records));
    table.with(Style::markdown());
    println!("{}", table);
}

// -- CSV output --

pub fn print_records_csv(records: &[DisplayRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in build_record_rows(records) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

// -- Card output --

/// Color band of a stat bar, picked by the value's share of [`MAX_STAT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BarColor {
    Green,
    Yellow,
    Orange,
    Red,
}

impl BarColor {
    fn for_percentage(percentage: f64) -> Self {
        if percentage >= 80.0 {
            Self::Green
        } else if percentage >= 60.0 {
            Self::Yellow
        } else if percentage >= 40.0 {
            Self::Orange
        } else {
            Self::Red
        }
    }

    fn ansi(self) -> &'static str {
        match self {
            Self::Green => "\x1b[32m",
            Self::Yellow => "\x1b[33m",
            Self::Orange => "\x1b[38;5;208m",
            Self::Red => "\x1b[31m",
        }
    }
}

const ANSI_RESET: &str = "\x1b[0m";

fn stat_percentage(value: u32) -> f64 {
    value as f64 / MAX_STAT as f64 * 100.0
}

/// A fixed-width bar, filled in proportion to `value`, capped at full.
fn stat_bar(value: u32, color: bool) -> String {
    let percentage = stat_percentage(value);
    let filled = ((percentage.min(100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled));
    if color {
        let band = BarColor::for_percentage(percentage);
        format!("{}{}{}", band.ansi(), bar, ANSI_RESET)
    } else {
        bar
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn render_card(record: &DisplayRecord, color: bool) -> String {
    let types = record
        .categories
        .iter()
        .map(|c| capitalize(c))
        .collect::<Vec<_>>()
        .join(" · ");

    let mut lines = vec![
        format!("{} #{:03}", record.display_name, record.id),
        format!("Types:  {}", types),
        format!("Height: {:<10} Weight: {}", record.height, record.weight),
        format!("Image:  {}", record.image),
        String::new(),
        "Stats".to_string(),
    ];
    for (label, value) in record.metrics.entries() {
        lines.push(format!("{:<12}{:>4}  {}", label, value, stat_bar(value, color)));
    }
    lines.push(format!("{:<12}{:>4}", "Total", record.total_metrics()));
    lines.join("\n")
}

pub fn print_card(record: &DisplayRecord) {
    println!("{}", render_card(record, std::io::stdout().is_terminal()));
}
