//! Reshapes upstream Pokémon documents into display records, plus the
//! list helpers used for ranking.

use pokedex_api::types::RawPokemon;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// The upstream document is missing a required field or has one of the
/// wrong type.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("Malformed Pokémon data: {0}")]
pub struct ShapeError(pub String);

/// The six base stats, renamed for display.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub primary: u32,
    pub power: u32,
    pub resilience: u32,
    pub pace: u32,
    pub special_power: u32,
    pub special_resilience: u32,
}

impl Metrics {
    /// Sum of the six stats. Widened so that any upstream values fit.
    pub fn total(&self) -> u64 {
        self.entries().iter().map(|(_, value)| u64::from(*value)).sum()
    }

    /// Labelled values in card order.
    pub fn entries(&self) -> [(&'static str, u32); 6] {
        [
            ("HP", self.primary),
            ("Attack", self.power),
            ("Defense", self.resilience),
            ("Speed", self.pace),
            ("Sp. Attack", self.special_power),
            ("Sp. Defense", self.special_resilience),
        ]
    }

    /// Stores `value` under the metric an upstream stat name maps to.
    /// Hyphens are ignored, so `special-attack` and `specialattack` are the
    /// same stat. Unknown names are dropped.
    fn assign(&mut self, stat_name: &str, value: u32) {
        let slot = match stat_name.replace('-', "").as_str() {
            "hp" => &mut self.primary,
            "attack" => &mut self.power,
            "defense" => &mut self.resilience,
            "speed" => &mut self.pace,
            "specialattack" => &mut self.special_power,
            "specialdefense" => &mut self.special_resilience,
            _ => return,
        };
        *slot = value;
    }
}

/// A Pokémon as presented to users.
///
/// Serializes with camelCase keys and a computed `totalMetrics`; an incoming
/// `totalMetrics` is ignored on deserialization since it is always derived.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRecord {
    pub id: u32,
    pub name: String,
    pub display_name: String,
    pub height: String,
    pub weight: String,
    pub image: String,
    pub categories: Vec<String>,
    pub metrics: Metrics,
}

impl DisplayRecord {
    pub fn total_metrics(&self) -> u64 {
        self.metrics.total()
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }
}

impl Serialize for DisplayRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("DisplayRecord", 9)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("displayName", &self.display_name)?;
        state.serialize_field("height", &self.height)?;
        state.serialize_field("weight", &self.weight)?;
        state.serialize_field("image", &self.image)?;
        state.serialize_field("categories", &self.categories)?;
        state.serialize_field("metrics", &self.metrics)?;
        state.serialize_field("totalMetrics", &self.total_metrics())?;
        state.end()
    }
}

/// Converts a raw upstream document into a [`DisplayRecord`].
///
/// Fails if the sprite path, `types`, `stats`, or any of the scalar fields
/// is absent or mistyped. Fields the display record does not use are
/// ignored.
pub fn transform(raw: &Value) -> Result<DisplayRecord, ShapeError> {
    let record = RawPokemon::deserialize(raw).map_err(|e| ShapeError(e.to_string()))?;
    Ok(transform_record(&record))
}

/// Same as [`transform`] for an already-typed document.
pub fn transform_record(raw: &RawPokemon) -> DisplayRecord {
    let mut metrics = Metrics::default();
    for entry in &raw.stats {
        metrics.assign(&entry.stat.name, entry.base_stat);
    }

    DisplayRecord {
        id: raw.id,
        name: raw.name.clone(),
        display_name: capitalize(&raw.name),
        height: tenths(raw.height, "m"),
        weight: tenths(raw.weight, "kg"),
        image: raw.sprites.other.official_artwork.front_default.clone(),
        categories: raw.types.iter().map(|t| t.kind.name.clone()).collect(),
        metrics,
    }
}

/// Upper-cases the first character and leaves the rest untouched.
fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Formats a value given in tenths: 4 -> "0.4", 20 -> "2", 69 -> "6.9".
fn tenths(value: u32, unit: &str) -> String {
    let (whole, frac) = (value / 10, value % 10);
    if frac == 0 {
        format!("{}{}", whole, unit)
    } else {
        format!("{}.{}{}", whole, frac, unit)
    }
}

/// Records whose categories include `category`, compared lower-cased.
pub fn filter_by_category(records: &[DisplayRecord], category: &str) -> Vec<DisplayRecord> {
    let needle = category.to_lowercase();
    records
        .iter()
        .filter(|r| r.has_category(&needle))
        .cloned()
        .collect()
}

/// Returns a copy of `records` ordered by total stats, highest first unless
/// `ascending`. Records with equal totals keep their relative order.
pub fn sort_by_total(records: &[DisplayRecord], ascending: bool) -> Vec<DisplayRecord> {
    let mut sorted = records.to_vec();
    if ascending {
        sorted.sort_by_key(|r| r.total_metrics());
    } else {
        sorted.sort_by(|a, b| b.total_metrics().cmp(&a.total_metrics()));
    }
    sorted
}

/// The `count` records with the highest totals, highest first.
pub fn top_by_total(records: &[DisplayRecord], count: usize) -> Vec<DisplayRecord> {
    let mut sorted = sort_by_total(records, false);
    sorted.truncate(count);
    sorted
}
