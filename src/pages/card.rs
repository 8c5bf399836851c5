//! Metadata and cross-links for a single card page.

use serde::Serialize;

use crate::api::Card;
use crate::codec::{facet_link, hp_link};
use crate::filters::{FacetKey, FieldKey, HpRange};

/// A labelled link to a single-key search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetLink {
    pub key: FieldKey,
    pub label: String,
    pub href: String,
}

impl FacetLink {
    fn new(facet: FacetKey, label: impl Into<String>, value: &str) -> Self {
        Self {
            key: FieldKey::Facet(facet),
            label: label.into(),
            href: facet_link(facet, value),
        }
    }

    fn hp(min: u16) -> Self {
        Self {
            key: FieldKey::Hp,
            label: min.to_string(),
            href: hp_link(min),
        }
    }

    fn named(facet: FacetKey, name: &str) -> Self {
        Self::new(facet, name, name)
    }
}

/// Everything a card page shows besides the card itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardPage {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub links: Vec<FacetLink>,
    pub card: Card,
}

impl CardPage {
    pub fn from_card(card: Card) -> Self {
        let title = format!("{} - {}", card.name, card.set.name);
        let description = format!(
            "Get information about {} from {}: {}.",
            card.name, card.set.series, card.set.name
        );
        Self {
            title,
            description,
            keywords: keywords(&card),
            links: links(&card),
            card,
        }
    }
}

fn keywords(card: &Card) -> Vec<String> {
    let mut keywords = vec![
        card.name.clone(),
        card.set.name.clone(),
        card.set.series.clone(),
        card.supertype.clone(),
    ];
    keywords.extend(card.types.iter().cloned());
    keywords.extend(card.subtypes.iter().cloned());
    keywords.extend(card.rarity.iter().cloned());
    keywords.extend(card.artist.iter().cloned());
    keywords.retain(|k| !k.is_empty());
    keywords.dedup();
    keywords
}

fn links(card: &Card) -> Vec<FacetLink> {
    let mut links = Vec::new();

    // Collaborations are credited as "A + B".
    if let Some(artist) = &card.artist {
        links.extend(
            artist
                .split('+')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(|a| FacetLink::new(FacetKey::Artists, a, a)),
        );
    }
    if let Some(rarity) = &card.rarity {
        links.push(FacetLink::new(FacetKey::Rarities, rarity.as_str(), rarity));
    }
    links.extend(card.subtypes.iter().map(|s| FacetLink::new(FacetKey::Subtypes, s.as_str(), s)));
    links.extend(card.types.iter().map(|t| FacetLink::new(FacetKey::Types, t.as_str(), t)));
    if let Some(hp) = card
        .hp
        .as_deref()
        .and_then(|hp| hp.trim().parse::<u16>().ok())
        .filter(|hp| (HpRange::DEFAULT.min()..=HpRange::DEFAULT.max()).contains(hp))
    {
        links.push(FacetLink::hp(hp));
    }
    if let Some(ancient_trait) = &card.ancient_trait {
        links.push(FacetLink::named(FacetKey::Traits, &ancient_trait.name));
    }
    links.extend(card.abilities.iter().map(|a| FacetLink::named(FacetKey::Abilities, &a.name)));
    links.extend(card.attacks.iter().map(|a| FacetLink::named(FacetKey::Attacks, &a.name)));

    // Weakness, resistance and retreat icons all search by energy type.
    let mut energy: Vec<&str> = card
        .weaknesses
        .iter()
        .chain(&card.resistances)
        .map(|m| m.kind.as_str())
        .chain(card.retreat_cost.iter().map(String::as_str))
        .filter(|t| !t.is_empty())
        .collect();
    energy.dedup();
    links.extend(energy.into_iter().map(|t| FacetLink::named(FacetKey::Types, t)));

    if let Some(mark) = &card.regulation_mark {
        links.push(FacetLink::new(FacetKey::Marks, mark.as_str(), mark));
    }
    if let Some(from) = &card.evolves_from {
        links.push(FacetLink::new(FacetKey::Cards, from.as_str(), from));
    }
    links.extend(card.evolves_to.iter().map(|to| FacetLink::new(FacetKey::Cards, to.as_str(), to)));
    if !card.set.id.is_empty() {
        links.push(FacetLink::new(FacetKey::Sets, card.set.name.as_str(), &card.set.id));
    }
    links.extend(card.legalities.iter().map(|(format, status)| {
        FacetLink::new(
            FacetKey::Legalities,
            format!("{format}: {status}"),
            &format!("{format}_{status}"),
        )
    }));

    links
}
