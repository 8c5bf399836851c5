use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::mvi::FormState;

use super::action::FilterAction;
use super::error::FilterError;
use super::key::{FacetKey, FieldKey, ListKey};

/// One selected value of a list facet.
///
/// `exclude` marks a value results must *not* match. On an `orderBy` entry it
/// means descending order instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry<T = String> {
    pub id: String,
    pub name: T,
    #[serde(default)]
    pub exclude: bool,
}

pub type FacetEntry = Entry<String>;
pub type OrderByEntry = Entry<OrderByField>;

impl<T> Entry<T> {
    pub fn new(id: impl Into<String>, name: T) -> Self {
        Self {
            id: id.into(),
            name,
            exclude: false,
        }
    }

    pub fn excluded(self) -> Self {
        self.with_exclude(true)
    }

    pub fn with_exclude(mut self, exclude: bool) -> Self {
        self.exclude = exclude;
        self
    }
}

/// Sort keys offered by the search form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderByField {
    Name,
    Number,
    Hp,
    Rarity,
    Supertype,
    Artist,
    ReleaseDate,
    Cardmarket,
    Tcgplayer,
}

impl OrderByField {
    pub const ALL: [OrderByField; 9] = [
        OrderByField::Name,
        OrderByField::Number,
        OrderByField::Hp,
        OrderByField::Rarity,
        OrderByField::Supertype,
        OrderByField::Artist,
        OrderByField::ReleaseDate,
        OrderByField::Cardmarket,
        OrderByField::Tcgplayer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderByField::Name => "name",
            OrderByField::Number => "number",
            OrderByField::Hp => "hp",
            OrderByField::Rarity => "rarity",
            OrderByField::Supertype => "supertype",
            OrderByField::Artist => "artist",
            OrderByField::ReleaseDate => "releaseDate",
            OrderByField::Cardmarket => "cardmarket",
            OrderByField::Tcgplayer => "tcgplayer",
        }
    }

    /// Card attribute the remote API sorts on.
    pub fn api_field(self) -> &'static str {
        match self {
            OrderByField::ReleaseDate => "set.releaseDate",
            OrderByField::Cardmarket => "cardmarket.prices.averageSellPrice",
            OrderByField::Tcgplayer => "tcgplayer.prices.holofoil.market",
            other => other.as_str(),
        }
    }
}

impl FromStr for OrderByField {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderByField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| {
                FilterError::invalid_value(FieldKey::OrderBy, format!("unknown sort field '{s}'"))
            })
    }
}

impl fmt::Display for OrderByField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive HP range. `min <= max` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[u16; 2]", into = "[u16; 2]")]
pub struct HpRange {
    min: u16,
    max: u16,
}

impl HpRange {
    pub const DEFAULT: HpRange = HpRange { min: 10, max: 400 };

    pub fn new(min: u16, max: u16) -> Result<Self, FilterError> {
        if min > max {
            return Err(FilterError::invalid_value(
                FieldKey::Hp,
                format!("min {min} is greater than max {max}"),
            ));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> u16 {
        self.min
    }

    pub fn max(&self) -> u16 {
        self.max
    }

    pub fn is_default(&self) -> bool {
        *self == Self::DEFAULT
    }
}

impl Default for HpRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<[u16; 2]> for HpRange {
    type Error = FilterError;

    fn try_from([min, max]: [u16; 2]) -> Result<Self, Self::Error> {
        HpRange::new(min, max)
    }
}

impl From<HpRange> for [u16; 2] {
    fn from(range: HpRange) -> Self {
        [range.min, range.max]
    }
}

/// The value held by one key of the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    OrderBy(Vec<OrderByEntry>),
    Hp(HpRange),
    Exclude(bool),
    Entries(Vec<FacetEntry>),
}

impl FieldValue {
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::OrderBy(_) => "a list of sort entries",
            FieldValue::Hp(_) => "an [min, max] range",
            FieldValue::Exclude(_) => "a boolean",
            FieldValue::Entries(_) => "a list of facet entries",
        }
    }

    /// Parse a JSON value into the shape `key` expects.
    pub fn from_json(key: FieldKey, value: serde_json::Value) -> Result<Self, FilterError> {
        let parsed = match key {
            FieldKey::OrderBy => serde_json::from_value(value).map(FieldValue::OrderBy),
            FieldKey::Hp => serde_json::from_value(value).map(FieldValue::Hp),
            FieldKey::Exclude => serde_json::from_value(value).map(FieldValue::Exclude),
            FieldKey::Facet(_) => serde_json::from_value(value).map(FieldValue::Entries),
        };
        parsed.map_err(|e| FilterError::invalid_value(key, e.to_string()))
    }
}

impl From<Vec<OrderByEntry>> for FieldValue {
    fn from(entries: Vec<OrderByEntry>) -> Self {
        FieldValue::OrderBy(entries)
    }
}

impl From<HpRange> for FieldValue {
    fn from(range: HpRange) -> Self {
        FieldValue::Hp(range)
    }
}

impl From<bool> for FieldValue {
    fn from(exclude: bool) -> Self {
        FieldValue::Exclude(exclude)
    }
}

impl From<Vec<FacetEntry>> for FieldValue {
    fn from(entries: Vec<FacetEntry>) -> Self {
        FieldValue::Entries(entries)
    }
}

/// Current search criteria.
///
/// Every key always exists; only values change. Fields are private so that
/// the only way to a new state is through
/// [`FilterReducer`](super::FilterReducer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    order_by: Vec<OrderByEntry>,
    hp: HpRange,
    exclude: bool,
    series: Vec<FacetEntry>,
    pokedex: Vec<FacetEntry>,
    traits: Vec<FacetEntry>,
    abilities: Vec<FacetEntry>,
    marks: Vec<FacetEntry>,
    cards: Vec<FacetEntry>,
    artists: Vec<FacetEntry>,
    rarities: Vec<FacetEntry>,
    supertypes: Vec<FacetEntry>,
    subtypes: Vec<FacetEntry>,
    attacks: Vec<FacetEntry>,
    sets: Vec<FacetEntry>,
    types: Vec<FacetEntry>,
    legalities: Vec<FacetEntry>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            order_by: Vec::new(),
            hp: HpRange::DEFAULT,
            exclude: false,
            series: Vec::new(),
            pokedex: Vec::new(),
            traits: Vec::new(),
            abilities: Vec::new(),
            marks: Vec::new(),
            cards: Vec::new(),
            artists: Vec::new(),
            rarities: Vec::new(),
            supertypes: Vec::new(),
            subtypes: Vec::new(),
            attacks: Vec::new(),
            sets: Vec::new(),
            types: Vec::new(),
            legalities: Vec::new(),
        }
    }
}

impl FormState for FilterState {}

impl FilterState {
    pub fn order_by(&self) -> &[OrderByEntry] {
        &self.order_by
    }

    pub fn hp(&self) -> HpRange {
        self.hp
    }

    /// Global toggle: polarity given to values added through [`Self::select`].
    pub fn exclude(&self) -> bool {
        self.exclude
    }

    pub fn facet(&self, key: FacetKey) -> &[FacetEntry] {
        match key {
            FacetKey::Series => &self.series,
            FacetKey::Pokedex => &self.pokedex,
            FacetKey::Traits => &self.traits,
            FacetKey::Abilities => &self.abilities,
            FacetKey::Marks => &self.marks,
            FacetKey::Cards => &self.cards,
            FacetKey::Artists => &self.artists,
            FacetKey::Rarities => &self.rarities,
            FacetKey::Supertypes => &self.supertypes,
            FacetKey::Subtypes => &self.subtypes,
            FacetKey::Attacks => &self.attacks,
            FacetKey::Sets => &self.sets,
            FacetKey::Types => &self.types,
            FacetKey::Legalities => &self.legalities,
        }
    }

    fn facet_mut(&mut self, key: FacetKey) -> &mut Vec<FacetEntry> {
        match key {
            FacetKey::Series => &mut self.series,
            FacetKey::Pokedex => &mut self.pokedex,
            FacetKey::Traits => &mut self.traits,
            FacetKey::Abilities => &mut self.abilities,
            FacetKey::Marks => &mut self.marks,
            FacetKey::Cards => &mut self.cards,
            FacetKey::Artists => &mut self.artists,
            FacetKey::Rarities => &mut self.rarities,
            FacetKey::Supertypes => &mut self.supertypes,
            FacetKey::Subtypes => &mut self.subtypes,
            FacetKey::Attacks => &mut self.attacks,
            FacetKey::Sets => &mut self.sets,
            FacetKey::Types => &mut self.types,
            FacetKey::Legalities => &mut self.legalities,
        }
    }

    /// Snapshot of the value at `key`.
    pub fn get(&self, key: FieldKey) -> FieldValue {
        match key {
            FieldKey::OrderBy => FieldValue::OrderBy(self.order_by.clone()),
            FieldKey::Hp => FieldValue::Hp(self.hp),
            FieldKey::Exclude => FieldValue::Exclude(self.exclude),
            FieldKey::Facet(facet) => FieldValue::Entries(self.facet(facet).to_vec()),
        }
    }

    pub fn is_default(&self, key: FieldKey) -> bool {
        match key {
            FieldKey::OrderBy => self.order_by.is_empty(),
            FieldKey::Hp => self.hp.is_default(),
            FieldKey::Exclude => !self.exclude,
            FieldKey::Facet(facet) => self.facet(facet).is_empty(),
        }
    }

    /// Build the action that adds `id` to `key`, or replaces the entry with
    /// the same id, using the global exclude toggle as its polarity.
    pub fn select(
        &self,
        key: FacetKey,
        id: impl Into<String>,
        name: impl Into<String>,
    ) -> FilterAction {
        let entry = FacetEntry::new(id, name.into()).with_exclude(self.exclude);
        let mut entries = self.facet(key).to_vec();
        match entries.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
        FilterAction::Set {
            key: key.into(),
            value: FieldValue::Entries(entries),
        }
    }

    /// Replace the value at `key`. Checks the value shape and the list
    /// invariants first; on error `self` is left untouched.
    pub(crate) fn replace(&mut self, key: FieldKey, value: FieldValue) -> Result<(), FilterError> {
        match (key, value) {
            (FieldKey::OrderBy, FieldValue::OrderBy(entries)) => {
                check_ids(key, entries.iter().map(|e| e.id.as_str()))?;
                self.order_by = entries;
            }
            (FieldKey::Hp, FieldValue::Hp(range)) => self.hp = range,
            (FieldKey::Exclude, FieldValue::Exclude(exclude)) => self.exclude = exclude,
            (FieldKey::Facet(facet), FieldValue::Entries(entries)) => {
                check_ids(key, entries.iter().map(|e| e.id.as_str()))?;
                *self.facet_mut(facet) = entries;
            }
            (key, value) => {
                return Err(FilterError::invalid_value(
                    key,
                    format!("expected {}, got {}", key.value_kind(), value.kind()),
                ));
            }
        }
        Ok(())
    }

    /// Drop the entry with `id` from a list key, keeping the others in order.
    pub(crate) fn remove(&mut self, key: ListKey, id: &str) {
        match key {
            ListKey::OrderBy => self.order_by.retain(|e| e.id != id),
            ListKey::Facet(facet) => self.facet_mut(facet).retain(|e| e.id != id),
        }
    }
}

fn check_ids<'a>(key: FieldKey, ids: impl Iterator<Item = &'a str>) -> Result<(), FilterError> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.is_empty() {
            return Err(FilterError::invalid_value(key, "entry id must not be empty"));
        }
        if !seen.insert(id) {
            return Err(FilterError::invalid_value(key, format!("duplicate entry id '{id}'")));
        }
    }
    Ok(())
}
