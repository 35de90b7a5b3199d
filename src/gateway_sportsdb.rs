//! TheSportsDB gateway.
//!
//! Fixture/meeting lookup via the public event search endpoint. TheSportsDB
//! ships a shared free-tier key, so this gateway is live even without a
//! configured credential; a dedicated key can still be supplied via config
//! or `SPORTSDB_API_KEY`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::ProviderConfig;
use crate::gateways::SourceGateway;
use crate::models::{Provider, Snippet, SourceOutcome, SourceQuery};

const DEFAULT_BASE_URL: &str = "https://www.thesportsdb.com/api/v1/json";
/// Shared free-tier key documented by TheSportsDB.
const FREE_TIER_KEY: &str = "3";
const ENV_KEY: &str = "SPORTSDB_API_KEY";
const SOURCE_LABEL: &str = "sportsdb:thesportsdb";

#[derive(Debug, Deserialize)]
struct EventsResponse {
    /// The API returns `null` instead of an empty array when nothing matches.
    #[serde(default)]
    event: Option<Vec<EventEntry>>,
}

#[derive(Debug, Deserialize)]
struct EventEntry {
    #[serde(rename = "strEvent")]
    name: String,
    #[serde(rename = "strLeague", default)]
    league: Option<String>,
    #[serde(rename = "dateEvent", default)]
    date: Option<String>,
    #[serde(rename = "intHomeScore", default)]
    home_score: Option<String>,
    #[serde(rename = "intAwayScore", default)]
    away_score: Option<String>,
    #[serde(rename = "strVenue", default)]
    venue: Option<String>,
}

pub struct SportsDbGateway {
    http: Client,
    base_url: String,
    api_key: String,
}

impl SportsDbGateway {
    pub fn new(config: &ProviderConfig) -> Result<SportsDbGateway> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("matchdesk/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build sportsdb HTTP client")?;

        Ok(SportsDbGateway {
            http,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key: config
                .resolve_api_key(ENV_KEY)
                .unwrap_or_else(|| FREE_TIER_KEY.to_string()),
        })
    }

    async fn search_events(&self, text: &str) -> Result<Vec<Snippet>, String> {
        let url = format!("{}/{}/searchevents.php", self.base_url, self.api_key);

        let response = self
            .http
            .get(&url)
            .query(&[("e", event_term(text))])
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

        let payload: EventsResponse = response
            .json()
            .await
            .map_err(|e| format!("malformed payload: {}", e))?;

        Ok(payload
            .event
            .unwrap_or_default()
            .iter()
            .map(event_snippet)
            .collect())
    }
}

/// TheSportsDB event search expects underscores between words:
/// `"Rapid vs FCSB"` becomes `"Rapid_vs_FCSB"`.
fn event_term(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join("_")
}

fn event_snippet(entry: &EventEntry) -> Snippet {
    let mut text = entry.name.clone();

    if let Some(league) = &entry.league {
        text.push_str(&format!(" ({})", league));
    }
    if let Some(date) = entry
        .date
        .as_deref()
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    {
        text.push_str(&format!(", {}", date.format("%d.%m.%Y")));
    }
    match (&entry.home_score, &entry.away_score) {
        (Some(home), Some(away)) => text.push_str(&format!(", scor {}-{}", home, away)),
        _ => text.push_str(", programat"),
    }
    if let Some(venue) = &entry.venue {
        if !venue.is_empty() {
            text.push_str(&format!(", stadion {}", venue));
        }
    }

    Snippet {
        title: Some(entry.name.clone()),
        text,
        source: SOURCE_LABEL.to_string(),
    }
}

#[async_trait]
impl SourceGateway for SportsDbGateway {
    fn provider(&self) -> Provider {
        Provider::SportsDb
    }

    fn name(&self) -> &str {
        SOURCE_LABEL
    }

    async fn fetch(&self, query: &SourceQuery) -> SourceOutcome {
        debug!(query = %query.id, text = %query.text, "sportsdb event lookup");

        match self.search_events(&query.text).await {
            Ok(snippets) => SourceOutcome::Success { snippets },
            Err(reason) => SourceOutcome::unavailable(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_term_underscores() {
        assert_eq!(event_term("Rapid vs FCSB"), "Rapid_vs_FCSB");
        assert_eq!(event_term("  Dinamo   vs  UTA "), "Dinamo_vs_UTA");
    }

    #[test]
    fn test_event_snippet_finished_match() {
        let entry: EventEntry = serde_json::from_value(serde_json::json!({
            "strEvent": "Rapid vs FCSB",
            "strLeague": "Liga I",
            "dateEvent": "2026-03-08",
            "intHomeScore": "2",
            "intAwayScore": "2",
            "strVenue": "Giulesti"
        }))
        .unwrap();

        let snippet = event_snippet(&entry);
        assert_eq!(
            snippet.text,
            "Rapid vs FCSB (Liga I), 08.03.2026, scor 2-2, stadion Giulesti"
        );
    }

    #[test]
    fn test_event_snippet_scheduled_match() {
        let entry: EventEntry = serde_json::from_value(serde_json::json!({
            "strEvent": "Dinamo vs UTA",
            "dateEvent": "2026-09-20"
        }))
        .unwrap();

        let snippet = event_snippet(&entry);
        assert_eq!(snippet.text, "Dinamo vs UTA, 20.09.2026, programat");
    }

    #[test]
    fn test_null_event_list_is_empty_success() {
        let payload: EventsResponse =
            serde_json::from_value(serde_json::json!({ "event": null })).unwrap();
        assert!(payload.event.unwrap_or_default().is_empty());
    }
}
