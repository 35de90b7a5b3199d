//! API-Football gateway (api-sports.io).
//!
//! Serves team/standings lookups. Auth is the `x-apisports-key` header;
//! without a key the gateway runs in demo mode and resolves every query to
//! an explicit unavailable outcome instead of failing hard.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::ProviderConfig;
use crate::gateways::SourceGateway;
use crate::models::{Provider, Snippet, SourceOutcome, SourceQuery};

const DEFAULT_BASE_URL: &str = "https://v3.football.api-sports.io";
const ENV_KEY: &str = "FOOTBALL_API_KEY";
const SOURCE_LABEL: &str = "football:api-sports";

#[derive(Debug, Deserialize)]
struct TeamsResponse {
    #[serde(default)]
    response: Vec<TeamEntry>,
}

#[derive(Debug, Deserialize)]
struct TeamEntry {
    team: TeamInfo,
    #[serde(default)]
    venue: Option<VenueInfo>,
}

#[derive(Debug, Deserialize)]
struct TeamInfo {
    name: String,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    founded: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct VenueInfo {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    capacity: Option<u32>,
}

pub struct FootballGateway {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl FootballGateway {
    pub fn new(config: &ProviderConfig) -> Result<FootballGateway> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("matchdesk/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build football HTTP client")?;

        Ok(FootballGateway {
            http,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key: config.resolve_api_key(ENV_KEY),
        })
    }

    async fn search_team(&self, api_key: &str, term: &str) -> Result<Vec<Snippet>, String> {
        let url = format!("{}/teams", self.base_url);

        let response = self
            .http
            .get(&url)
            .header("x-apisports-key", api_key)
            .query(&[("search", term)])
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

        let payload: TeamsResponse = response
            .json()
            .await
            .map_err(|e| format!("malformed payload: {}", e))?;

        Ok(payload.response.iter().map(team_snippet).collect())
    }
}

fn team_snippet(entry: &TeamEntry) -> Snippet {
    let mut text = format!("Echipa {}", entry.team.name);
    if let Some(country) = &entry.team.country {
        text.push_str(&format!(" ({})", country));
    }
    if let Some(founded) = entry.team.founded {
        text.push_str(&format!(", fondata {}", founded));
    }
    if let Some(venue) = &entry.venue {
        if let Some(name) = &venue.name {
            text.push_str(&format!(", stadion {}", name));
            if let Some(capacity) = venue.capacity {
                text.push_str(&format!(" ({} locuri)", capacity));
            }
        }
    }

    Snippet {
        title: Some(entry.team.name.clone()),
        text,
        source: SOURCE_LABEL.to_string(),
    }
}

#[async_trait]
impl SourceGateway for FootballGateway {
    fn provider(&self) -> Provider {
        Provider::Football
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

        debug!(query = %query.id, term = %query.text, "football lookup");

        match self.search_team(&api_key, &query.text).await {
            Ok(snippets) => SourceOutcome::Success { snippets },
            Err(reason) => SourceOutcome::unavailable(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;

    #[test]
    fn test_team_snippet_full_entry() {
        let entry: TeamEntry = serde_json::from_value(serde_json::json!({
            "team": { "name": "Rapid Bucuresti", "country": "Romania", "founded": 1923 },
            "venue": { "name": "Giulesti", "capacity": 14_047 }
        }))
        .unwrap();

        let snippet = team_snippet(&entry);
        assert_eq!(snippet.title.as_deref(), Some("Rapid Bucuresti"));
        assert_eq!(
            snippet.text,
            "Echipa Rapid Bucuresti (Romania), fondata 1923, stadion Giulesti (14047 locuri)"
        );
        assert_eq!(snippet.source, SOURCE_LABEL);
    }

    #[test]
    fn test_team_snippet_sparse_entry() {
        let entry: TeamEntry = serde_json::from_value(serde_json::json!({
            "team": { "name": "UTA" }
        }))
        .unwrap();

        assert_eq!(team_snippet(&entry).text, "Echipa UTA");
    }

    #[tokio::test]
    async fn test_demo_mode_without_credential() {
        // No api_key in config and the env override is left unset.
        let config = ProviderConfig {
            api_key: None,
            ..ProviderConfig::default()
        };
        let gateway = FootballGateway::new(&config).unwrap();

        if gateway.is_live() {
            // A developer machine may have FOOTBALL_API_KEY exported;
            // the demo-mode contract only applies without a credential.
            return;
        }

        let query = SourceQuery {
            id: "standings-home".to_string(),
            text: "Rapid".to_string(),
            provider: Provider::Football,
            category: crate::models::Category::Standings,
        };

        match gateway.fetch(&query).await {
            SourceOutcome::Unavailable { reason } => assert!(reason.contains("demo mode")),
            other => panic!("expected demo-mode Unavailable, got {:?}", other),
        }
    }
}
