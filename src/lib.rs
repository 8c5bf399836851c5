//! Card search browser for the Pokémon TCG API.
//!
//! A typed, reducer-driven search form ([`filters`]) is encoded both as a
//! shareable URL and as a remote API query ([`codec`]), executed by a caching
//! client ([`api`]) and served over HTTP ([`server`]).

pub mod api;
pub mod codec;
pub mod config;
pub mod filters;
pub mod mvi;
pub mod pages;
pub mod server;
