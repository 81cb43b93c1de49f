//! Raw Pokémon record as returned by `GET /pokemon/{name-or-id}`.
//!
//! Only the fields the display layer consumes are modelled; everything else
//! in the upstream document is ignored on deserialization.

use serde::{Deserialize, Serialize};

/// Pokémon document from PokéAPI.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RawPokemon {
    /// National dex number.
    pub id: u32,

    /// Lowercase species/form name.
    pub name: String,

    /// Height in decimetres.
    pub height: u32,

    /// Weight in hectograms.
    pub weight: u32,

    pub sprites: Sprites,

    /// Type slots in upstream order.
    pub types: Vec<TypeSlot>,

    /// Base stats in upstream order.
    pub stats: Vec<StatEntry>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Sprites {
    pub other: OtherSprites,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork")]
    pub official_artwork: Artwork,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Artwork {
    pub front_default: String,
}

/// One entry of the `types` array.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TypeSlot {
    #[serde(default)]
    pub slot: Option<u32>,

    #[serde(rename = "type")]
    pub kind: NamedResource,
}

/// One entry of the `stats` array.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StatEntry {
    pub base_stat: u32,

    #[serde(default)]
    pub effort: Option<u32>,

    pub stat: NamedResource,
}

/// A `{name, url}` reference to another PokéAPI resource.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NamedResource {
    pub name: String,

    #[serde(default)]
    pub url: Option<String>,
}
