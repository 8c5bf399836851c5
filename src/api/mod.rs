//! Remote card API access: typed client, response cache, and models.

mod cache;
mod client;
mod error;
mod types;

pub use cache::{CacheKeyFn, CachePolicy, ResponseCache};
pub use client::TcgClient;
pub use error::{FetchError, SearchFailed};
pub use types::{
    Ability, AncientTrait, Attack, Card, CardImages, Cardmarket, ItemResponse, Legalities,
    ListResponse, Resource, SearchResults, Set, SetImages, TcgPlayer, TcgPlayerPrice, TypeModifier,
};
