//! Concurrent fan-out over the query plan.
//!
//! All queries are issued at once and the join waits for every outcome,
//! success or unavailable, before the pipeline moves on. Completeness wins
//! over latency here; the per-gateway timeout already bounds the worst case
//! to roughly one timeout period regardless of fan-out width.

use futures::future::join_all;
use tracing::{debug, warn};

use crate::gateways::GatewayRegistry;
use crate::models::{SourceOutcome, SourceQuery};

/// Fan the plan out to the registry and collect every outcome.
///
/// The result preserves plan order, so the merge downstream is
/// deterministic no matter which call finishes first. Partial or even total
/// provider failure never aborts the aggregation.
pub async fn aggregate(
    registry: &GatewayRegistry,
    plan: &[SourceQuery],
) -> Vec<(SourceQuery, SourceOutcome)> {
    let calls = plan.iter().map(|query| async move {
        let outcome = registry.dispatch(query).await;
        match &outcome {
            SourceOutcome::Success { snippets } => {
                debug!(query = %query.id, provider = %query.provider, snippets = snippets.len(), "query resolved");
            }
            SourceOutcome::Unavailable { reason } => {
                warn!(query = %query.id, provider = %query.provider, %reason, "query unavailable");
            }
        }
        (query.clone(), outcome)
    });

    join_all(calls).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateways::SourceGateway;
    use crate::models::{Category, Provider, Snippet};
    use async_trait::async_trait;
    use std::time::{Duration, Instant};

    struct SleepyGateway {
        provider: Provider,
        delay: Duration,
    }

    #[async_trait]
    impl SourceGateway for SleepyGateway {
        fn provider(&self) -> Provider {
            self.provider
        }

        fn name(&self) -> &str {
            "test:sleepy"
        }

        async fn fetch(&self, query: &SourceQuery) -> SourceOutcome {
            tokio::time::sleep(self.delay).await;
            SourceOutcome::Success {
                snippets: vec![Snippet {
                    title: None,
                    text: format!("raspuns pentru {}", query.id),
                    source: "test:sleepy".to_string(),
                }],
            }
        }
    }

    fn plan_of(n: usize) -> Vec<SourceQuery> {
        (0..n)
            .map(|i| SourceQuery {
                id: format!("q{}", i),
                text: "ceva".to_string(),
                provider: Provider::Search,
                category: Category::Predictions,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_fan_out_is_concurrent_not_sequential() {
        let delay = Duration::from_millis(150);
        let mut registry = GatewayRegistry::new();
        registry.register(Box::new(SleepyGateway {
            provider: Provider::Search,
            delay,
        }));

        let plan = plan_of(6);
        let started = Instant::now();
        let outcomes = aggregate(&registry, &plan).await;
        let elapsed = started.elapsed();

        assert_eq!(outcomes.len(), 6);
        assert!(elapsed >= delay, "calls cannot finish before one delay");
        // Sequential execution would take 6 * 150ms = 900ms.
        assert!(
            elapsed < delay * 3,
            "fan-out took {:?}, expected roughly one delay period",
            elapsed
        );
    }

    #[tokio::test]
    async fn test_result_preserves_plan_order() {
        let mut registry = GatewayRegistry::new();
        registry.register(Box::new(SleepyGateway {
            provider: Provider::Search,
            delay: Duration::from_millis(5),
        }));

        let plan = plan_of(4);
        let outcomes = aggregate(&registry, &plan).await;
        let ids: Vec<&str> = outcomes.iter().map(|(q, _)| q.id.as_str()).collect();
        assert_eq!(ids, vec!["q0", "q1", "q2", "q3"]);
    }

    #[tokio::test]
    async fn test_unconfigured_provider_yields_unavailable_not_panic() {
        let registry = GatewayRegistry::new();
        let plan = plan_of(3);
        let outcomes = aggregate(&registry, &plan).await;
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(|(_, o)| !o.is_success()));
    }
}
