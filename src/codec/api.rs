//! Remote API form of a search.
//!
//! The card API takes a Lucene-like `q` parameter:
//!
//! ```text
//! (types:Fire OR types:Water) -rarity:"Rare Holo" set.id:sv1 hp:[50 TO 120]
//! ```
//!
//! - clauses separated by whitespace are ANDed
//! - included values of one facet are ORed inside parentheses
//! - every excluded value becomes its own `-field:value` clause
//! - values with whitespace or grammar characters are double-quoted
//!
//! Sorting goes into `orderBy` as a comma-joined field list; a `-` prefix
//! sorts descending.

use crate::filters::{
    FacetEntry, FacetKey, FieldKey, FilterAction, FilterError, FilterReducer, FilterState,
    OrderByEntry, OrderByField,
};
use crate::mvi::Reducer;

use super::url::SearchParams;

const RELATED_PAGE_SIZE: u32 = 5;

/// Fully resolved request parameters for the `cards` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApiQuery {
    pub q: Option<String>,
    pub order_by: Option<String>,
    pub page: u32,
    pub page_size: u32,
}

impl ApiQuery {
    pub fn from_filters(filters: &FilterState, page: u32, page_size: u32) -> Self {
        Self {
            q: build_q(filters),
            order_by: build_order_by(filters),
            page,
            page_size,
        }
    }

    /// Resolve a URL search, filling pagination from `default_page_size`.
    pub fn from_params(params: &SearchParams, default_page_size: u32) -> Self {
        Self::from_filters(
            &params.filters,
            params.page.unwrap_or(1),
            params.page_size.unwrap_or(default_page_size),
        )
    }

    /// Up to five other cards from `set_id`, most valuable first.
    pub fn related(set_id: &str, card_name: &str) -> Result<Self, FilterError> {
        let filters = [
            FilterAction::set(FacetKey::Sets, vec![FacetEntry::new(set_id, set_id.to_string())]),
            FilterAction::set(
                FacetKey::Cards,
                vec![FacetEntry::new(card_name, card_name.to_string()).excluded()],
            ),
            FilterAction::set(
                FieldKey::OrderBy,
                vec![OrderByEntry::new("related", OrderByField::Cardmarket).excluded()],
            ),
        ]
        .into_iter()
        .try_fold(FilterState::default(), |state, action| {
            FilterReducer::reduce(&state, action)
        })?;
        Ok(Self::from_filters(&filters, 1, RELATED_PAGE_SIZE))
    }

    /// Parameters in the order they are appended to the request URL.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(4);
        if let Some(q) = &self.q {
            pairs.push(("q", q.clone()));
        }
        if let Some(order_by) = &self.order_by {
            pairs.push(("orderBy", order_by.clone()));
        }
        pairs.push(("page", self.page.to_string()));
        pairs.push(("pageSize", self.page_size.to_string()));
        pairs
    }
}

/// The `q` expression, or `None` when every facet is at its default.
pub fn build_q(filters: &FilterState) -> Option<String> {
    let mut clauses = Vec::new();

    for facet in FacetKey::ALL {
        facet_clauses(facet, filters.facet(facet), &mut clauses);
    }

    let hp = filters.hp();
    if !hp.is_default() {
        clauses.push(format!("hp:[{} TO {}]", hp.min(), hp.max()));
    }

    if clauses.is_empty() {
        None
    } else {
        Some(clauses.join(" "))
    }
}

/// The `orderBy` list, or `None` when no sort is selected.
pub fn build_order_by(filters: &FilterState) -> Option<String> {
    if filters.order_by().is_empty() {
        return None;
    }
    let fields: Vec<String> = filters
        .order_by()
        .iter()
        .map(|e| {
            let prefix = if e.exclude { "-" } else { "" };
            format!("{prefix}{}", e.name.api_field())
        })
        .collect();
    Some(fields.join(","))
}

fn facet_clauses(facet: FacetKey, entries: &[FacetEntry], out: &mut Vec<String>) {
    let included: Vec<String> = entries
        .iter()
        .filter(|e| !e.exclude)
        .map(|e| term(facet, e))
        .collect();

    match included.len() {
        0 => {}
        1 => out.extend(included),
        _ => out.push(format!("({})", included.join(" OR "))),
    }

    out.extend(
        entries
            .iter()
            .filter(|e| e.exclude)
            .map(|e| format!("-{}", term(facet, e))),
    );
}

/// `field:value` for one entry. Sets match on their id; every other facet
/// matches on the display name.
fn term(facet: FacetKey, entry: &FacetEntry) -> String {
    match facet {
        FacetKey::Sets => format!("{}:{}", facet.api_field(), quote(&entry.id)),
        FacetKey::Legalities => {
            // "standard_Legal" -> legalities.standard:legal
            let (format, status) = entry
                .name
                .split_once('_')
                .unwrap_or((entry.name.as_str(), "legal"));
            format!(
                "{}.{}:{}",
                facet.api_field(),
                format.to_lowercase(),
                quote(&status.to_lowercase())
            )
        }
        _ => format!("{}:{}", facet.api_field(), quote(&entry.name)),
    }
}

fn quote(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, ':' | '(' | ')' | '[' | ']' | '"'));
    if needs_quotes {
        format!("\"{}\"", value.replace('"', "\\\""))
    } else {
        value.to_string()
    }
}
