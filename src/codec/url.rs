//! Shareable URL form of a search.
//!
//! ```text
//! orderBy=-o1:cardmarket,name&hp_low=50&hp_high=120&types=t1:Fire,-Water&page=2
//! ```
//!
//! - one parameter per non-default key, in canonical key order
//! - list values are comma-joined tokens `[-]<id>[:<name>]`
//! - a leading `-` marks an excluded entry (descending for `orderBy`)
//! - `:<name>` is dropped when the name equals the id
//! - ids and names are percent-encoded, including `-`, `,` and `:`
//!
//! Decoding also accepts the legacy `exclude_<facet>=<value>` parameters and a
//! lone `hp_low` or `hp_high`. Unknown parameters are ignored.

use std::collections::HashMap;

use crate::filters::{
    FacetEntry, FacetKey, FieldKey, FilterAction, FilterReducer, FilterState, HpRange,
    OrderByEntry, OrderByField,
};
use crate::mvi::Reducer;

use super::error::CodecError;

/// Largest page the remote API serves.
pub const MAX_PAGE_SIZE: u32 = 250;

const HP_LOW: &str = "hp_low";
const HP_HIGH: &str = "hp_high";
const PAGE: &str = "page";
const PAGE_SIZE: &str = "pageSize";
const LEGACY_EXCLUDE_PREFIX: &str = "exclude_";

/// A search as carried by the page URL: the form plus pagination.
///
/// `None` pagination means "use the default" and is not written out.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchParams {
    pub filters: FilterState,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl SearchParams {
    pub fn new(filters: FilterState) -> Self {
        Self {
            filters,
            page: None,
            page_size: None,
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Parse a raw query string (without the leading `?`).
    pub fn parse(query: &str) -> Result<Self, CodecError> {
        let mut order_by: Vec<OrderByEntry> = Vec::new();
        let mut facets: HashMap<FacetKey, Vec<FacetEntry>> = HashMap::new();
        let mut hp_low = None;
        let mut hp_high = None;
        let mut exclude = None;
        let mut page = None;
        let mut page_size = None;

        for pair in query.trim_start_matches('?').split('&').filter(|p| !p.is_empty()) {
            let (raw_name, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
            let name = decode_component(raw_name, raw_name)?;

            match name.as_str() {
                FieldKey::ORDER_BY => {
                    for token in tokens(raw_value) {
                        let (id, field, descending) = decode_token(&name, token)?;
                        let field: OrderByField = match field {
                            Some(field) => field.parse()?,
                            None => id.parse()?,
                        };
                        order_by.push(OrderByEntry::new(id, field).with_exclude(descending));
                    }
                }
                HP_LOW => hp_low = Some(decode_number(&name, raw_value)?),
                HP_HIGH => hp_high = Some(decode_number(&name, raw_value)?),
                FieldKey::EXCLUDE => exclude = Some(decode_bool(&name, raw_value)?),
                PAGE => page = Some(decode_page(&name, raw_value, u32::MAX)?),
                PAGE_SIZE => page_size = Some(decode_page(&name, raw_value, MAX_PAGE_SIZE)?),
                other => {
                    if let Ok(facet) = other.parse::<FacetKey>() {
                        let entries = facets.entry(facet).or_default();
                        for token in tokens(raw_value) {
                            let (id, label, excluded) = decode_token(&name, token)?;
                            let label = label.unwrap_or_else(|| id.clone());
                            entries.push(FacetEntry::new(id, label).with_exclude(excluded));
                        }
                    } else if let Some(facet) = other
                        .strip_prefix(LEGACY_EXCLUDE_PREFIX)
                        .and_then(|f| f.parse::<FacetKey>().ok())
                    {
                        let value = decode_component(&name, raw_value)?;
                        if !value.is_empty() {
                            facets
                                .entry(facet)
                                .or_default()
                                .push(FacetEntry::new(value.clone(), value).excluded());
                        }
                    } else {
                        tracing::debug!(param = %other, "Ignoring unknown search parameter");
                    }
                }
            }
        }

        let mut actions = Vec::new();
        if !order_by.is_empty() {
            actions.push(FilterAction::set(FieldKey::OrderBy, order_by));
        }
        if hp_low.is_some() || hp_high.is_some() {
            let range = HpRange::new(
                hp_low.unwrap_or(HpRange::DEFAULT.min()),
                hp_high.unwrap_or(HpRange::DEFAULT.max()),
            )?;
            actions.push(FilterAction::set(FieldKey::Hp, range));
        }
        if let Some(exclude) = exclude {
            actions.push(FilterAction::set(FieldKey::Exclude, exclude));
        }
        for facet in FacetKey::ALL {
            if let Some(entries) = facets.remove(&facet) {
                actions.push(FilterAction::set(facet, entries));
            }
        }

        let mut filters = FilterState::default();
        for action in actions {
            filters = FilterReducer::reduce(&filters, action)?;
        }

        Ok(Self {
            filters,
            page,
            page_size,
        })
    }

    /// Canonical query string (without the leading `?`).
    pub fn to_query_string(&self) -> String {
        let mut pairs = filter_pairs(&self.filters);
        if let Some(page) = self.page {
            pairs.push((PAGE.to_string(), page.to_string()));
        }
        if let Some(page_size) = self.page_size {
            pairs.push((PAGE_SIZE.to_string(), page_size.to_string()));
        }
        join_pairs(pairs)
    }
}

/// Encode the form alone; default keys are omitted, so the default form
/// encodes to the empty string.
pub fn encode(filters: &FilterState) -> String {
    join_pairs(filter_pairs(filters))
}

/// Restore a form from a query string, ignoring pagination.
pub fn decode(query: &str) -> Result<FilterState, CodecError> {
    SearchParams::parse(query).map(|params| params.filters)
}

/// Link to a search on a single facet value, e.g. `/search?rarities=Rare%20Holo`.
pub fn facet_link(key: FacetKey, value: &str) -> String {
    format!("/search?{}={}", key.as_str(), encode_component(value))
}

/// Link to a search for cards with at least `min` HP, e.g. `/search?hp_low=120`.
pub fn hp_link(min: u16) -> String {
    format!("/search?{HP_LOW}={min}")
}

fn filter_pairs(filters: &FilterState) -> Vec<(String, String)> {
    let mut pairs = Vec::new();

    if !filters.is_default(FieldKey::OrderBy) {
        let tokens: Vec<String> = filters
            .order_by()
            .iter()
            .map(|e| encode_token(&e.id, e.name.as_str(), e.exclude))
            .collect();
        pairs.push((FieldKey::ORDER_BY.to_string(), tokens.join(",")));
    }
    if !filters.is_default(FieldKey::Hp) {
        let hp = filters.hp();
        pairs.push((HP_LOW.to_string(), hp.min().to_string()));
        pairs.push((HP_HIGH.to_string(), hp.max().to_string()));
    }
    if filters.exclude() {
        pairs.push((FieldKey::EXCLUDE.to_string(), "true".to_string()));
    }
    for facet in FacetKey::ALL {
        let entries = filters.facet(facet);
        if entries.is_empty() {
            continue;
        }
        let tokens: Vec<String> = entries
            .iter()
            .map(|e| encode_token(&e.id, &e.name, e.exclude))
            .collect();
        pairs.push((facet.as_str().to_string(), tokens.join(",")));
    }

    pairs
}

fn join_pairs(pairs: Vec<(String, String)>) -> String {
    pairs
        .into_iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

fn encode_token(id: &str, name: &str, exclude: bool) -> String {
    let mut token = String::new();
    if exclude {
        token.push('-');
    }
    token.push_str(&encode_component(id));
    if name != id {
        token.push(':');
        token.push_str(&encode_component(name));
    }
    token
}

fn encode_component(value: &str) -> String {
    // `-` is unreserved for urlencoding but is our exclusion marker.
    urlencoding::encode(value).replace('-', "%2D")
}

fn decode_component(param: &str, raw: &str) -> Result<String, CodecError> {
    let raw = raw.replace('+', " ");
    urlencoding::decode(&raw)
        .map(|value| value.into_owned())
        .map_err(|e| CodecError::invalid(param, e.to_string()))
}

fn tokens(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').filter(|t| !t.is_empty())
}

/// Split `[-]<id>[:<name>]` into decoded id, optional name and exclusion flag.
fn decode_token(param: &str, token: &str) -> Result<(String, Option<String>, bool), CodecError> {
    let (excluded, rest) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };
    let (raw_id, raw_name) = match rest.split_once(':') {
        Some((id, name)) => (id, Some(name)),
        None => (rest, None),
    };

    let id = decode_component(param, raw_id)?;
    if id.is_empty() {
        return Err(CodecError::invalid(param, format!("empty id in '{token}'")));
    }
    let name = raw_name.map(|n| decode_component(param, n)).transpose()?;
    Ok((id, name, excluded))
}

fn decode_number(param: &str, raw: &str) -> Result<u16, CodecError> {
    raw.trim()
        .parse()
        .map_err(|_| CodecError::invalid(param, format!("'{raw}' is not a whole number")))
}

fn decode_page(param: &str, raw: &str, max: u32) -> Result<u32, CodecError> {
    let value: u32 = raw
        .trim()
        .parse()
        .map_err(|_| CodecError::invalid(param, format!("'{raw}' is not a whole number")))?;
    if value == 0 || value > max {
        return Err(CodecError::invalid(param, format!("{value} is out of range 1..={max}")));
    }
    Ok(value)
}

fn decode_bool(param: &str, raw: &str) -> Result<bool, CodecError> {
    match raw {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(CodecError::invalid(param, format!("'{other}' is not a boolean"))),
    }
}
