//! Search form state: keys, values, actions, reducer and store.

mod action;
mod error;
mod key;
mod reducer;
mod state;
mod store;

pub use action::{FilterAction, RawAction};
pub use error::FilterError;
pub use key::{FacetKey, FieldKey, ListKey};
pub use reducer::FilterReducer;
pub use state::{Entry, FacetEntry, FieldValue, FilterState, HpRange, OrderByEntry, OrderByField};
pub use store::FilterStore;
