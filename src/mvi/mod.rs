//! Model-View-Intent (MVI) primitives for the search form.
//!
//! # Architecture
//!
//! ```text
//! Action ──→ Reducer ──→ State ──→ Query Codec ──→ Remote API
//!    ↑                                                │
//!    └────────────────────────────────────────────────┘
//! ```
//!
//! - **State**: Immutable snapshot of the search form
//! - **Action**: A typed command dispatched by the user or the URL loader
//! - **Reducer**: Pure function that validates an action and derives the next state

mod action;
mod reducer;
mod state;

pub use action::Action;
pub use reducer::Reducer;
pub use state::FormState;
