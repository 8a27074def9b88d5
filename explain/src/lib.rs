//! @ai:module:intent Uncoder explain service library
//! @ai:module:layer infrastructure
//! @ai:module:public_api client, config, explainer, language, rate_limiter, transcript
//! @ai:module:stateless false
//!
//! # Uncoder Explain
//!
//! The async service layer around the Uncoder core: completion-API clients
//! (direct and proxied), rate limiting, and the Explainer that composes
//! windowing, prompt rendering, querying, and response parsing.

pub mod client;
pub mod config;
pub mod explainer;
pub mod language;
pub mod rate_limiter;
pub mod transcript;

pub use client::{
    ClientError, CompletionClient, CompletionClientTrait, MockCompletionClient, ProxyClient,
};
pub use config::{ApiConfig, ExplainConfig, PathConfig};
pub use explainer::{BlockExplanation, Explainer, Walkthrough};
pub use language::detect_language;
pub use rate_limiter::RateLimiter;
pub use transcript::{list_transcripts, RunRecord};
