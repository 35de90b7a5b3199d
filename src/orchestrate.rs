//! Request orchestration.
//!
//! Drives one pipeline run: validate the raw prompt, fan out the query
//! plan, normalize the outcomes, compose the prompt, and generate the
//! reply. Aggregation and normalization cannot fail (empty data flows
//! forward as placeholders), so the only typed failures are invalid input
//! and generation errors.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::aggregate::aggregate;
use crate::completion::{CompletionBackend, CompletionError};
use crate::config::Config;
use crate::extract::normalize;
use crate::fallback::synthesize_preview;
use crate::gateways::GatewayRegistry;
use crate::models::Matchup;
use crate::prompt::compose;
use crate::queries::build_query_plan;

pub const INVALID_PROMPT_MESSAGE: &str = "Te rog introdu un meci valid (exemplu: Rapid - FCSB)";
pub const INVALID_TEAMS_MESSAGE: &str =
    "Nu am putut identifica doua echipe. Foloseste formatul \"Gazde - Oaspeti\"";

#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// Caller-side problem: empty prompt or fewer than two team names.
    #[error("{0}")]
    InvalidInput(String),
    /// The generation capability failed; source unavailability never
    /// reaches this level.
    #[error(transparent)]
    Generation(#[from] CompletionError),
}

/// Result of one successful pipeline run.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub reply: String,
    /// True when the reply is the locally synthesized preview rather than
    /// live model output.
    pub synthetic: bool,
}

/// Owns the injected dependency bundle: constructed once at startup,
/// shared read-only across requests.
pub struct Orchestrator {
    #[allow(dead_code)]
    config: Arc<Config>,
    gateways: Arc<GatewayRegistry>,
    backend: Arc<dyn CompletionBackend>,
}

impl Orchestrator {
    pub fn new(
        config: Arc<Config>,
        gateways: Arc<GatewayRegistry>,
        backend: Arc<dyn CompletionBackend>,
    ) -> Orchestrator {
        Orchestrator {
            config,
            gateways,
            backend,
        }
    }

    /// Run the full pipeline for one raw match description.
    pub async fn analyze(&self, raw: &str) -> Result<Analysis, AnalyzeError> {
        // Validating
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(AnalyzeError::InvalidInput(INVALID_PROMPT_MESSAGE.into()));
        }
        let matchup = Matchup::parse(raw)
            .ok_or_else(|| AnalyzeError::InvalidInput(INVALID_TEAMS_MESSAGE.into()))?;
        info!(home = %matchup.home, away = %matchup.away, "analyzing match");

        // Aggregating
        let plan = build_query_plan(&matchup);
        let outcomes = aggregate(&self.gateways, &plan).await;
        let live_sources = outcomes.iter().filter(|(_, o)| o.is_success()).count();
        debug!(
            queries = plan.len(),
            live_sources, "aggregation complete"
        );

        // Normalizing
        let record = normalize(&outcomes, &matchup);

        // Generating: demo mode skips the provider entirely and answers
        // with the labeled synthetic preview.
        if !self.backend.is_live() {
            info!("generation backend in demo mode, synthesizing preview");
            return Ok(Analysis {
                reply: synthesize_preview(&matchup, None),
                synthetic: true,
            });
        }

        let request = compose(&record, &matchup);
        let reply = self.backend.complete(&request).await?;
        info!(model = %self.backend.model_name(), "analysis generated");

        Ok(Analysis {
            reply,
            synthetic: false,
        })
    }
}
