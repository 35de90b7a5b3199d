//! # matchdesk
//!
//! A football match analysis service. One request flows strictly one way:
//!
//! ```text
//! "Rapid - FCSB"
//!       │ parse
//!       ▼
//! ┌──────────┐  fan-out   ┌───────────────────┐
//! │ QueryPlan │──────────▶│ Source Gateways   │  football / search / sportsdb
//! └──────────┘            └─────────┬─────────┘
//!                                   │ outcomes (success or unavailable)
//!                                   ▼
//!                          ┌────────────────┐
//!                          │ AnalysisRecord │  category-keyed, never sparse
//!                          └───────┬────────┘
//!                                  │ compose
//!                                  ▼
//!                          ┌────────────────┐
//!                          │  Completion    │  OpenAI-compatible chat API
//!                          └───────┬────────┘
//!                                  ▼
//!                        {"reply": ..., "success": true}
//! ```
//!
//! Providers that fail or lack credentials degrade to explicit
//! "unavailable" markers instead of failing the request; without a
//! generation credential the service answers with a clearly labeled
//! synthetic preview.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration + env credential overrides |
//! | [`models`] | Core data types |
//! | [`queries`] | Deterministic query plan construction |
//! | [`gateways`] | Gateway trait and registry |
//! | [`gateway_football`] | API-Football gateway |
//! | [`gateway_search`] | Web search gateway |
//! | [`gateway_sportsdb`] | TheSportsDB gateway |
//! | [`aggregate`] | Concurrent fan-out and full join |
//! | [`extract`] | Keyword-routed snippet classification |
//! | [`prompt`] | Prompt composition |
//! | [`completion`] | Completion backend abstraction |
//! | [`fallback`] | Labeled synthetic preview |
//! | [`orchestrate`] | Pipeline orchestration |
//! | [`server`] | HTTP API |

pub mod aggregate;
pub mod completion;
pub mod config;
pub mod extract;
pub mod fallback;
pub mod gateway_football;
pub mod gateway_search;
pub mod gateway_sportsdb;
pub mod gateways;
pub mod models;
pub mod orchestrate;
pub mod prompt;
pub mod queries;
pub mod server;
