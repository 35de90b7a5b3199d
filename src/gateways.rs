//! Source gateway trait and registry.
//!
//! A [`SourceGateway`] wraps one external data provider behind a narrow
//! contract: given a query, return a [`SourceOutcome`] holding either data
//! or an explicit "unavailable" value. The gateway is the isolation boundary
//! between unreliable external services and the rest of the pipeline:
//! transport errors, bad status codes, malformed payloads, and timeouts are
//! all mapped to `Unavailable` and never raised past it.
//!
//! Gateways are registered in a [`GatewayRegistry`] keyed by provider; the
//! aggregator dispatches each query to the gateway matching its provider
//! tag. A provider without a registered gateway resolves to `Unavailable`,
//! which downstream renders as a placeholder, never a request failure.

use anyhow::Result;
use async_trait::async_trait;

use crate::config::Config;
use crate::models::{Provider, SourceOutcome, SourceQuery};

/// One external data provider behind the fetch-or-unavailable contract.
#[async_trait]
pub trait SourceGateway: Send + Sync {
    /// Which provider tag this gateway serves.
    fn provider(&self) -> Provider;

    /// Instance name used in logs and the `providers` CLI listing,
    /// e.g. `"football:api-sports"`.
    fn name(&self) -> &str;

    /// Whether the gateway has a working credential. A gateway without one
    /// runs in demo mode: it stays registered but resolves every fetch to
    /// `Unavailable` instead of failing hard.
    fn is_live(&self) -> bool {
        true
    }

    /// Fetch data for one query. Must resolve within the gateway's own
    /// timeout and must never return a raised error.
    async fn fetch(&self, query: &SourceQuery) -> SourceOutcome;
}

/// Registry of configured gateways, one per provider.
pub struct GatewayRegistry {
    gateways: Vec<Box<dyn SourceGateway>>,
}

impl GatewayRegistry {
    pub fn new() -> GatewayRegistry {
        GatewayRegistry {
            gateways: Vec::new(),
        }
    }

    /// Build the registry from configuration: one gateway per enabled
    /// provider. Construction only fails on client-build errors, never on
    /// missing credentials (those degrade to demo mode).
    pub fn from_config(config: &Config) -> Result<GatewayRegistry> {
        use crate::gateway_football::FootballGateway;
        use crate::gateway_search::WebSearchGateway;
        use crate::gateway_sportsdb::SportsDbGateway;

        let mut registry = GatewayRegistry::new();

        if config.providers.football.enabled {
            registry.register(Box::new(FootballGateway::new(&config.providers.football)?));
        }
        if config.providers.search.enabled {
            registry.register(Box::new(WebSearchGateway::new(&config.providers.search)?));
        }
        if config.providers.sportsdb.enabled {
            registry.register(Box::new(SportsDbGateway::new(&config.providers.sportsdb)?));
        }

        Ok(registry)
    }

    pub fn register(&mut self, gateway: Box<dyn SourceGateway>) {
        self.gateways.push(gateway);
    }

    pub fn gateways(&self) -> &[Box<dyn SourceGateway>] {
        &self.gateways
    }

    pub fn find(&self, provider: Provider) -> Option<&dyn SourceGateway> {
        self.gateways
            .iter()
            .find(|g| g.provider() == provider)
            .map(|g| g.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.gateways.is_empty()
    }

    pub fn len(&self) -> usize {
        self.gateways.len()
    }

    /// Route one query to its provider's gateway.
    pub async fn dispatch(&self, query: &SourceQuery) -> SourceOutcome {
        match self.find(query.provider) {
            Some(gateway) => gateway.fetch(query).await,
            None => SourceOutcome::unavailable(format!(
                "no gateway configured for provider {}",
                query.provider
            )),
        }
    }
}

impl Default for GatewayRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Snippet};

    struct StaticGateway {
        provider: Provider,
        outcome: SourceOutcome,
    }

    #[async_trait]
    impl SourceGateway for StaticGateway {
        fn provider(&self) -> Provider {
            self.provider
        }

        fn name(&self) -> &str {
            "test:static"
        }

        async fn fetch(&self, _query: &SourceQuery) -> SourceOutcome {
            self.outcome.clone()
        }
    }

    fn odds_query(provider: Provider) -> SourceQuery {
        SourceQuery {
            id: "odds".to_string(),
            text: "cote Rapid vs FCSB".to_string(),
            provider,
            category: Category::Odds,
        }
    }

    #[tokio::test]
    async fn test_dispatch_routes_by_provider() {
        let mut registry = GatewayRegistry::new();
        registry.register(Box::new(StaticGateway {
            provider: Provider::Search,
            outcome: SourceOutcome::Success {
                snippets: vec![Snippet {
                    title: None,
                    text: "1X2 2.10".to_string(),
                    source: "test:static".to_string(),
                }],
            },
        }));

        let outcome = registry.dispatch(&odds_query(Provider::Search)).await;
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn test_dispatch_missing_provider_is_unavailable() {
        let registry = GatewayRegistry::new();
        let outcome = registry.dispatch(&odds_query(Provider::Football)).await;
        match outcome {
            SourceOutcome::Unavailable { reason } => {
                assert!(reason.contains("football"), "reason was: {}", reason)
            }
            other => panic!("expected Unavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_find_by_provider() {
        let mut registry = GatewayRegistry::new();
        registry.register(Box::new(StaticGateway {
            provider: Provider::SportsDb,
            outcome: SourceOutcome::unavailable("n/a"),
        }));
        assert!(registry.find(Provider::SportsDb).is_some());
        assert!(registry.find(Provider::Search).is_none());
        assert_eq!(registry.len(), 1);
    }
}
