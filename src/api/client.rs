use std::time::Duration;

use axum::body::Bytes;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::codec::ApiQuery;
use crate::config::{ApiConfig, Config, ConfigError, SecureString, API_KEY_HEADER};

use super::cache::{CachePolicy, ResponseCache};
use super::error::{FetchError, SearchFailed};
use super::types::{Card, ItemResponse, ListResponse, Resource, SearchResults, Set};

const SETS_SELECT: &str = "id,name,series,releaseDate,images";
const SETS_TAG: &str = "sets";
const CARDS_TAG: &str = "cards";

/// Client for the remote card API.
///
/// Single-item and reference lookups recover from failures by logging and
/// returning `None`; card searches report [`SearchFailed`] instead.
#[derive(Clone, Debug)]
pub struct TcgClient {
    http: Client,
    base_url: Url,
    api_key: SecureString,
    cache: ResponseCache,
}

impl TcgClient {
    pub fn new(
        api: &ApiConfig,
        api_key: SecureString,
        cache: ResponseCache,
    ) -> Result<Self, ConfigError> {
        let base_url = Url::parse(&api.base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| ConfigError::ValidationError {
                message: format!("api.base_url '{}' is not a base URL", api.base_url),
            })?;

        let http = Client::builder()
            .timeout(Duration::from_secs(api.timeout_seconds as u64))
            .connect_timeout(Duration::from_secs(api.connect_timeout_seconds as u64))
            .build()
            .map_err(|e| ConfigError::ValidationError {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            http,
            base_url,
            api_key,
            cache,
        })
    }

    /// Build a client from configuration, reading the API key from the
    /// environment.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let api_key = config.api.resolve_api_key()?;
        Self::new(&config.api, api_key, ResponseCache::new(&config.cache))
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// All sets, ordered by series.
    pub async fn get_sets(&self) -> Option<Vec<Set>> {
        let url = self.endpoint(
            &["sets"],
            &[
                ("orderBy", "series".to_string()),
                ("select", SETS_SELECT.to_string()),
            ],
        );
        self.fetch_cached::<ListResponse<Set>>(url, CachePolicy::Revalidate, &[SETS_TAG])
            .await
            .map(|list| list.data)
            .inspect_err(|error| tracing::error!(%error, "Failed to fetch sets"))
            .ok()
    }

    pub async fn get_set(&self, id: &str) -> Option<Set> {
        let url = self.endpoint(&["sets", id], &[]);
        self.fetch_cached::<ItemResponse<Set>>(url, CachePolicy::Revalidate, &[SETS_TAG])
            .await
            .map(|item| item.data)
            .inspect_err(|error| tracing::error!(%error, set_id = %id, "Failed to fetch set"))
            .ok()
    }

    /// Reference values (types, rarities, ...). Cached until the resource's
    /// tag is invalidated.
    pub async fn get_types(&self, resource: Resource) -> Option<Vec<String>> {
        let url = self.endpoint(&[resource.as_str()], &[]);
        self.fetch_cached::<ListResponse<String>>(url, CachePolicy::Forever, &[resource.as_str()])
            .await
            .map(|list| list.data)
            .inspect_err(|error| {
                tracing::error!(%error, resource = %resource, "Failed to fetch reference data")
            })
            .ok()
    }

    pub async fn get_card(&self, id: &str) -> Option<Card> {
        let url = self.endpoint(&["cards", id], &[]);
        self.fetch_cached::<ItemResponse<Card>>(url, CachePolicy::Revalidate, &[CARDS_TAG])
            .await
            .map(|item| item.data)
            .inspect_err(|error| tracing::error!(%error, card_id = %id, "Failed to fetch card"))
            .ok()
    }

    /// Run a card search. Failures are returned, never turned into an empty
    /// page.
    pub async fn get_cards(&self, query: &ApiQuery) -> Result<SearchResults, SearchFailed> {
        let url = self.endpoint(&["cards"], &query.query_pairs());
        match self
            .fetch_cached::<ListResponse<Card>>(url, CachePolicy::Revalidate, &[CARDS_TAG])
            .await
        {
            Ok(list) => {
                let total_count = list.total_count.unwrap_or(list.data.len() as u64);
                Ok(SearchResults {
                    data: list.data,
                    total_count,
                    page: query.page,
                    page_size: query.page_size,
                })
            }
            Err(source) => {
                tracing::warn!(error = %source, q = ?query.q, "Card search failed");
                Err(SearchFailed { source })
            }
        }
    }

    /// Other cards from the same set, most valuable first.
    pub async fn related_cards(&self, card: &Card) -> Result<SearchResults, SearchFailed> {
        let query = ApiQuery::related(&card.set.id, &card.name)
            .map_err(|e| SearchFailed::from(FetchError::InvalidRequest(e.to_string())))?;
        self.get_cards(&query).await
    }

    /// Drop every cached response registered under `tag`.
    pub async fn revalidate_tag(&self, tag: &str) -> usize {
        self.cache.invalidate_tag(tag).await
    }

    fn endpoint(&self, segments: &[&str], params: &[(&str, String)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !params.is_empty() {
            let mut query = url.query_pairs_mut();
            for (name, value) in params {
                query.append_pair(name, value);
            }
        }
        url
    }

    async fn fetch_cached<T: DeserializeOwned>(
        &self,
        url: Url,
        policy: CachePolicy,
        tags: &[&str],
    ) -> Result<T, FetchError> {
        let body = self
            .cache
            .get_or_fetch(&url, policy, tags, self.fetch(url.clone()))
            .await?;

        match serde_json::from_slice(&body) {
            Ok(value) => Ok(value),
            Err(e) => {
                self.cache.invalidate(&url).await;
                Err(FetchError::Decode {
                    url: url.to_string(),
                    message: e.to_string(),
                })
            }
        }
    }

    async fn fetch(&self, url: Url) -> Result<Bytes, FetchError> {
        let target = url.to_string();
        tracing::debug!(url = %target, "Fetching from card API");

        let response = self
            .http
            .get(url)
            .header(API_KEY_HEADER, self.api_key.expose())
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: target.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: target,
                status: status.as_u16(),
            });
        }

        response.bytes().await.map_err(|e| FetchError::Transport {
            url: target,
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheConfig;

    fn client(base_url: &str) -> TcgClient {
        let api = ApiConfig {
            base_url: base_url.to_string(),
            ..ApiConfig::default()
        };
        TcgClient::new(
            &api,
            SecureString::new("test-key".to_string()),
            ResponseCache::new(&CacheConfig::default()),
        )
        .unwrap()
    }

    #[test]
    fn endpoint_escapes_path_segments() {
        let client = client("https://api.example.com/v2/");
        let url = client.endpoint(&["cards", "a/b c"], &[]);
        assert_eq!(url.as_str(), "https://api.example.com/v2/cards/a%2Fb%20c");
    }

    #[test]
    fn endpoint_appends_query_pairs() {
        let client = client("https://api.example.com/v2/");
        let url = client.endpoint(&["sets"], &[("orderBy", "series".to_string())]);
        assert_eq!(url.as_str(), "https://api.example.com/v2/sets?orderBy=series");
    }

    #[test]
    fn rejects_non_base_url() {
        let api = ApiConfig {
            base_url: "mailto:someone@example.com".to_string(),
            ..ApiConfig::default()
        };
        let result = TcgClient::new(
            &api,
            SecureString::new("k".to_string()),
            ResponseCache::new(&CacheConfig::default()),
        );
        assert!(result.is_err());
    }
}
