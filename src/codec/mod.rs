//! Query codecs for the search form.
//!
//! Two canonical forms exist:
//! - [`url`]: the shareable `/search?...` form, which round-trips exactly
//! - [`api`]: the `q`/`orderBy` parameters understood by the remote card API

pub mod api;
mod error;
pub mod url;

pub use api::ApiQuery;
pub use error::CodecError;
pub use url::{decode, encode, facet_link, hp_link, SearchParams, MAX_PAGE_SIZE};
