//! Facet keys of the search form.
//!
//! Three key types narrow what an action may target:
//! - [`FieldKey`]: every key of the form (`Set`, `Reset`)
//! - [`ListKey`]: list-valued keys only (`Delete`)
//! - [`FacetKey`]: the fourteen categorical facets

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use super::error::FilterError;

/// A categorical, multi-select facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FacetKey {
    Series,
    Pokedex,
    Traits,
    Abilities,
    Marks,
    Cards,
    Artists,
    Rarities,
    Supertypes,
    Subtypes,
    Attacks,
    Sets,
    Types,
    Legalities,
}

impl FacetKey {
    /// Canonical order, used for URL encoding and API queries.
    pub const ALL: [FacetKey; 14] = [
        FacetKey::Series,
        FacetKey::Pokedex,
        FacetKey::Traits,
        FacetKey::Abilities,
        FacetKey::Marks,
        FacetKey::Cards,
        FacetKey::Artists,
        FacetKey::Rarities,
        FacetKey::Supertypes,
        FacetKey::Subtypes,
        FacetKey::Attacks,
        FacetKey::Sets,
        FacetKey::Types,
        FacetKey::Legalities,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FacetKey::Series => "series",
            FacetKey::Pokedex => "pokedex",
            FacetKey::Traits => "traits",
            FacetKey::Abilities => "abilities",
            FacetKey::Marks => "marks",
            FacetKey::Cards => "cards",
            FacetKey::Artists => "artists",
            FacetKey::Rarities => "rarities",
            FacetKey::Supertypes => "supertypes",
            FacetKey::Subtypes => "subtypes",
            FacetKey::Attacks => "attacks",
            FacetKey::Sets => "sets",
            FacetKey::Types => "types",
            FacetKey::Legalities => "legalities",
        }
    }

    /// Card field this facet filters on in the remote query grammar.
    ///
    /// `legalities` is special: its values carry the format, so the final
    /// field is `legalities.<format>`.
    pub fn api_field(self) -> &'static str {
        match self {
            FacetKey::Series => "set.series",
            FacetKey::Pokedex => "nationalPokedexNumbers",
            FacetKey::Traits => "ancientTrait.name",
            FacetKey::Abilities => "abilities.name",
            FacetKey::Marks => "regulationMark",
            FacetKey::Cards => "name",
            FacetKey::Artists => "artist",
            FacetKey::Rarities => "rarity",
            FacetKey::Supertypes => "supertype",
            FacetKey::Subtypes => "subtypes",
            FacetKey::Attacks => "attacks.name",
            FacetKey::Sets => "set.id",
            FacetKey::Types => "types",
            FacetKey::Legalities => "legalities",
        }
    }
}

/// Any key of the search form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    OrderBy,
    Hp,
    Exclude,
    Facet(FacetKey),
}

impl FieldKey {
    pub const ORDER_BY: &'static str = "orderBy";
    pub const HP: &'static str = "hp";
    pub const EXCLUDE: &'static str = "exclude";

    /// Every key, in canonical order.
    pub fn all() -> impl Iterator<Item = FieldKey> {
        [FieldKey::OrderBy, FieldKey::Hp, FieldKey::Exclude]
            .into_iter()
            .chain(FacetKey::ALL.into_iter().map(FieldKey::Facet))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldKey::OrderBy => Self::ORDER_BY,
            FieldKey::Hp => Self::HP,
            FieldKey::Exclude => Self::EXCLUDE,
            FieldKey::Facet(facet) => facet.as_str(),
        }
    }

    /// Human-readable shape of the value this key holds.
    pub fn value_kind(self) -> &'static str {
        match self {
            FieldKey::OrderBy => "a list of sort entries",
            FieldKey::Hp => "an [min, max] range",
            FieldKey::Exclude => "a boolean",
            FieldKey::Facet(_) => "a list of facet entries",
        }
    }
}

/// Keys whose value is a list of entries; the only keys `Delete` accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKey {
    OrderBy,
    Facet(FacetKey),
}

impl From<FacetKey> for FieldKey {
    fn from(facet: FacetKey) -> Self {
        FieldKey::Facet(facet)
    }
}

impl From<FacetKey> for ListKey {
    fn from(facet: FacetKey) -> Self {
        ListKey::Facet(facet)
    }
}

impl From<ListKey> for FieldKey {
    fn from(key: ListKey) -> Self {
        match key {
            ListKey::OrderBy => FieldKey::OrderBy,
            ListKey::Facet(facet) => FieldKey::Facet(facet),
        }
    }
}

impl TryFrom<FieldKey> for ListKey {
    type Error = FilterError;

    fn try_from(key: FieldKey) -> Result<Self, Self::Error> {
        match key {
            FieldKey::OrderBy => Ok(ListKey::OrderBy),
            FieldKey::Facet(facet) => Ok(ListKey::Facet(facet)),
            FieldKey::Hp | FieldKey::Exclude => Err(FilterError::InvalidKey {
                key: key.as_str().to_string(),
            }),
        }
    }
}

impl FromStr for FacetKey {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FacetKey::ALL
            .into_iter()
            .find(|facet| facet.as_str() == s)
            .ok_or_else(|| FilterError::InvalidKey { key: s.to_string() })
    }
}

impl FromStr for FieldKey {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::ORDER_BY => Ok(FieldKey::OrderBy),
            Self::HP => Ok(FieldKey::Hp),
            Self::EXCLUDE => Ok(FieldKey::Exclude),
            other => other.parse().map(FieldKey::Facet),
        }
    }
}

impl FromStr for ListKey {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<FieldKey>()?.try_into()
    }
}

impl fmt::Display for FacetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ListKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        FieldKey::from(*self).fmt(f)
    }
}

impl Serialize for FacetKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl Serialize for FieldKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
