//! Route table and request handlers.
//!
//! Handlers stay thin: decode the request, call the client or the filter
//! store, and serialize the outcome.

use std::sync::Arc;

use axum::extract::{Path, Query, RawQuery, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::api::{Card, Resource, SearchResults, Set, TcgClient};
use crate::codec::{ApiQuery, SearchParams};
use crate::config::Config;
use crate::filters::{FilterState, FilterStore, RawAction};
use crate::pages::CardPage;

use super::error::ServerError;
use super::health::health;

/// Shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub client: TcgClient,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(client: TcgClient, config: Config) -> Self {
        Self {
            client,
            config: Arc::new(config),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/search", get(search))
        .route("/cards/{id}", get(card))
        .route("/cards/{id}/related", get(related))
        .route("/sets", get(sets))
        .route("/sets/{id}", get(set))
        .route("/types/{resource}", get(types))
        .route("/filters", post(apply_filter))
        .route("/revalidate", post(revalidate))
        .with_state(state)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Canonical form of the request's query string.
    pub query: String,
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub data: Vec<Card>,
}

async fn search(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<SearchResponse>, ServerError> {
    let params = SearchParams::parse(query.as_deref().unwrap_or_default())?;
    let api_query = ApiQuery::from_params(&params, state.config.search.default_page_size);
    let results = state.client.get_cards(&api_query).await?;

    Ok(Json(SearchResponse {
        query: params.to_query_string(),
        page: results.page,
        page_size: results.page_size,
        total_count: results.total_count,
        data: results.data,
    }))
}

async fn card(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CardPage>, ServerError> {
    let card = state
        .client
        .get_card(&id)
        .await
        .ok_or_else(|| ServerError::not_found("card", id))?;
    Ok(Json(CardPage::from_card(card)))
}

async fn related(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SearchResults>, ServerError> {
    let card = state
        .client
        .get_card(&id)
        .await
        .ok_or_else(|| ServerError::not_found("card", id))?;
    Ok(Json(state.client.related_cards(&card).await?))
}

async fn sets(State(state): State<AppState>) -> Result<Json<Vec<Set>>, ServerError> {
    state
        .client
        .get_sets()
        .await
        .map(Json)
        .ok_or_else(|| ServerError::Unavailable {
            resource: "sets".to_string(),
        })
}

async fn set(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Set>, ServerError> {
    state
        .client
        .get_set(&id)
        .await
        .map(Json)
        .ok_or_else(|| ServerError::not_found("set", id))
}

async fn types(
    State(state): State<AppState>,
    Path(resource): Path<String>,
) -> Result<Json<Vec<String>>, ServerError> {
    let resource: Resource = resource
        .parse()
        .map_err(|_| ServerError::not_found("resource", resource))?;
    state
        .client
        .get_types(resource)
        .await
        .map(Json)
        .ok_or_else(|| ServerError::Unavailable {
            resource: resource.to_string(),
        })
}

#[derive(Debug, Deserialize)]
pub struct FilterRequest {
    /// Current query string; empty means the default form.
    #[serde(default)]
    pub query: String,
    pub action: RawAction,
}

#[derive(Debug, Serialize)]
pub struct FilterResponse {
    pub query: String,
    pub state: FilterState,
}

/// Apply one wire action to the search encoded in `query`.
///
/// Changing the filters restarts pagination; the page size is kept.
async fn apply_filter(
    Json(request): Json<FilterRequest>,
) -> Result<Json<FilterResponse>, ServerError> {
    let params = SearchParams::parse(&request.query)?;
    let mut store = FilterStore::with_state(params.filters);
    store.dispatch_raw(request.action)?;

    let mut next = SearchParams::new(store.into_state());
    next.page_size = params.page_size;

    Ok(Json(FilterResponse {
        query: next.to_query_string(),
        state: next.filters,
    }))
}

#[derive(Debug, Deserialize)]
pub struct RevalidateParams {
    pub tag: String,
}

#[derive(Debug, Serialize)]
pub struct RevalidateResponse {
    pub tag: String,
    pub invalidated: usize,
}

async fn revalidate(
    State(state): State<AppState>,
    Query(params): Query<RevalidateParams>,
) -> Json<RevalidateResponse> {
    let invalidated = state.client.revalidate_tag(&params.tag).await;
    Json(RevalidateResponse {
        tag: params.tag,
        invalidated,
    })
}
