//! View models served by the presentation routes.

mod card;

pub use card::{CardPage, FacetLink};
