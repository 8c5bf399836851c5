//! Response shapes of the remote card API.
//!
//! Every field defaults when absent: list endpoints are queried with
//! `select`, and older cards lack most optional attributes.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// `{"data": [...], "totalCount": n, ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub total_count: Option<u64>,
}

/// `{"data": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemResponse<T> {
    pub data: T,
}

/// One page of card search results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub data: Vec<Card>,
    pub total_count: u64,
    pub page: u32,
    pub page_size: u32,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }
}

/// Format name → status, e.g. `standard → Legal`.
pub type Legalities = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub name: String,
    pub supertype: String,
    pub subtypes: Vec<String>,
    pub level: Option<String>,
    pub hp: Option<String>,
    pub types: Vec<String>,
    pub evolves_from: Option<String>,
    pub evolves_to: Vec<String>,
    pub rules: Vec<String>,
    pub ancient_trait: Option<AncientTrait>,
    pub abilities: Vec<Ability>,
    pub attacks: Vec<Attack>,
    pub weaknesses: Vec<TypeModifier>,
    pub resistances: Vec<TypeModifier>,
    pub retreat_cost: Vec<String>,
    pub converted_retreat_cost: Option<u32>,
    pub set: Set,
    pub number: String,
    pub artist: Option<String>,
    pub rarity: Option<String>,
    pub flavor_text: Option<String>,
    pub national_pokedex_numbers: Vec<u32>,
    pub legalities: Legalities,
    pub regulation_mark: Option<String>,
    pub images: CardImages,
    pub tcgplayer: Option<TcgPlayer>,
    pub cardmarket: Option<Cardmarket>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Set {
    pub id: String,
    pub name: String,
    pub series: String,
    pub printed_total: u32,
    pub total: u32,
    pub legalities: Legalities,
    pub ptcgo_code: Option<String>,
    pub release_date: String,
    pub updated_at: String,
    pub images: SetImages,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SetImages {
    pub symbol: String,
    pub logo: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CardImages {
    pub small: String,
    pub large: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AncientTrait {
    pub name: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Ability {
    pub name: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Attack {
    pub name: String,
    pub cost: Vec<String>,
    pub converted_energy_cost: u32,
    pub damage: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeModifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TcgPlayer {
    pub url: String,
    pub updated_at: String,
    /// Keyed by print variant ("normal", "holofoil", ...).
    pub prices: BTreeMap<String, TcgPlayerPrice>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TcgPlayerPrice {
    pub low: Option<f64>,
    pub mid: Option<f64>,
    pub high: Option<f64>,
    pub market: Option<f64>,
    pub direct_low: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Cardmarket {
    pub url: String,
    pub updated_at: String,
    /// Keyed by price name ("averageSellPrice", "trendPrice", ...).
    pub prices: BTreeMap<String, Option<f64>>,
}

/// Reference-data endpoints; their values rarely change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Types,
    Subtypes,
    Supertypes,
    Rarities,
}

impl Resource {
    pub const ALL: [Resource; 4] = [
        Resource::Types,
        Resource::Subtypes,
        Resource::Supertypes,
        Resource::Rarities,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Resource::Types => "types",
            Resource::Subtypes => "subtypes",
            Resource::Supertypes => "supertypes",
            Resource::Rarities => "rarities",
        }
    }
}

impl FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("unknown resource '{s}'"))
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
