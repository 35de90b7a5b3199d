//! Web search gateway (SerpAPI).
//!
//! Runs the Romanian-phrased queries (odds, head-to-head, form,
//! predictions) against Google results and returns organic snippets.
//! Demo mode without an API key.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::ProviderConfig;
use crate::gateways::SourceGateway;
use crate::models::{Provider, Snippet, SourceOutcome, SourceQuery};

const DEFAULT_BASE_URL: &str = "https://serpapi.com";
const ENV_KEY: &str = "SEARCH_API_KEY";
const SOURCE_LABEL: &str = "search:serpapi";

/// How many organic results to request and keep per query.
const RESULT_LIMIT: usize = 5;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
}

pub struct WebSearchGateway {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl WebSearchGateway {
    pub fn new(config: &ProviderConfig) -> Result<WebSearchGateway> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("matchdesk/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build search HTTP client")?;

        Ok(WebSearchGateway {
            http,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key: config.resolve_api_key(ENV_KEY),
        })
    }

    async fn run_search(&self, api_key: &str, text: &str) -> Result<Vec<Snippet>, String> {
        let url = format!("{}/search.json", self.base_url);
        let limit = RESULT_LIMIT.to_string();

        let response = self
            .http
            .get(&url)
            .query(&[
                ("engine", "google"),
                ("q", text),
                ("hl", "ro"),
                ("num", limit.as_str()),
                ("api_key", api_key),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    "timeout".to_string()
                } else {
                    format!("transport error: {}", e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("provider returned status {}", status));
        }

        let payload: SearchResponse = response
            .json()
            .await
            .map_err(|e| format!("malformed payload: {}", e))?;

        Ok(organic_snippets(&payload))
    }
}

/// Keep only results that carry snippet text; titles alone say nothing
/// useful about odds or form.
fn organic_snippets(payload: &SearchResponse) -> Vec<Snippet> {
    payload
        .organic_results
        .iter()
        .take(RESULT_LIMIT)
        .filter_map(|result| {
            let text = result.snippet.as_deref()?.trim();
            if text.is_empty() {
                return None;
            }
            Some(Snippet {
                title: result.title.clone(),
                text: text.to_string(),
                source: SOURCE_LABEL.to_string(),
            })
        })
        .collect()
}

#[async_trait]
impl SourceGateway for WebSearchGateway {
    fn provider(&self) -> Provider {
        Provider::Search
    }

    fn name(&self) -> &str {
        SOURCE_LABEL
    }

    fn is_live(&self) -> bool {
        self.api_key.is_some()
    }

    async fn fetch(&self, query: &SourceQuery) -> SourceOutcome {
        let Some(api_key) = self.api_key.clone() else {
            return SourceOutcome::unavailable("demo mode: no credential configured");
        };

        debug!(query = %query.id, text = %query.text, "web search");

        match self.run_search(&api_key, &query.text).await {
            Ok(snippets) => SourceOutcome::Success { snippets },
            Err(reason) => SourceOutcome::unavailable(reason),
        }
    }
}
