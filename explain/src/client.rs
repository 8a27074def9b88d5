//! @ai:module:intent Completion API clients for prompt queries
//! @ai:module:layer infrastructure
//! @ai:module:public_api CompletionClientTrait, CompletionClient, ProxyClient, MockCompletionClient, ClientError
//! @ai:module:stateless false

use crate::config::ApiConfig;
use crate::rate_limiter::RateLimiter;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// @ai:intent Transport-level failures of a completion client
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("OPENAI_API_KEY not set in environment")]
    MissingApiKey,

    #[error("completion API error ({status}): {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("completion response contained no choices")]
    EmptyChoices,

    #[error("completion request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// @ai:intent Trait for completion API clients
#[allow(async_fn_in_trait)]
pub trait CompletionClientTrait: Send + Sync {
    /// @ai:intent Send a prompt and return the raw completion text
    async fn complete(&self, prompt: &str, stop: &[&str]) -> Result<String, ClientError>;
}

/// @ai:intent Completions endpoint request body
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    presence_penalty: f32,
    frequency_penalty: f32,
    best_of: u32,
    n: u32,
    stream: bool,
    stop: &'a [&'a str],
}

/// @ai:intent Completions endpoint response body
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    text: String,
}

/// @ai:intent Direct completion API client with rate limiting
pub struct CompletionClient {
    client: reqwest::Client,
    config: ApiConfig,
    rate_limiter: Arc<RateLimiter>,
    api_key: String,
}

impl CompletionClient {
    /// @ai:intent Create a new completion client
    /// @ai:pre OPENAI_API_KEY environment variable is set
    /// @ai:effects env
    pub fn new(config: ApiConfig) -> Result<Self, ClientError> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| ClientError::MissingApiKey)?;
        Self::with_api_key(config, api_key)
    }

    /// @ai:intent Create a client with an explicit key (for testing)
    /// @ai:effects pure
    pub fn with_api_key(config: ApiConfig, api_key: String) -> Result<Self, ClientError> {
        let rate_limiter = Arc::new(RateLimiter::from_api(&config));
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()?;

        Ok(Self {
            client,
            config,
            rate_limiter,
            api_key,
        })
    }
}

impl CompletionClientTrait for CompletionClient {
    /// @ai:intent Query the completions endpoint with the fixed parameter set
    /// @ai:effects network
    async fn complete(&self, prompt: &str, stop: &[&str]) -> Result<String, ClientError> {
        self.rate_limiter.acquire().await;

        let request = CompletionRequest {
            prompt,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            top_p: self.config.top_p,
            presence_penalty: self.config.presence_penalty,
            frequency_penalty: self.config.frequency_penalty,
            best_of: self.config.best_of,
            n: self.config.n,
            stream: false,
            stop,
        };

        let url = format!(
            "{}/{}/completions",
            self.config.api_url, self.config.engine
        );

        tracing::debug!("Sending completion request to {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }

        let parsed: CompletionResponse = response.json().await?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(ClientError::EmptyChoices)?;

        Ok(choice.text)
    }
}

/// @ai:intent Explain proxy request body
#[derive(Debug, Serialize)]
struct ProxyRequest<'a> {
    prompt: &'a str,
    #[serde(rename = "isBlock")]
    is_block: bool,
}

/// @ai:intent Explain proxy response body
#[derive(Debug, Deserialize)]
struct ProxyResponse {
    output: String,
}

/// @ai:intent Client that routes through a server holding the API key
pub struct ProxyClient {
    client: reqwest::Client,
    host_url: String,
    rate_limiter: Arc<RateLimiter>,
}

impl ProxyClient {
    /// @ai:intent Create a proxy client for the given host
    /// @ai:effects pure
    pub fn new(host_url: String, requests_per_minute: u32) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()?;

        Ok(Self {
            client,
            host_url,
            rate_limiter: Arc::new(RateLimiter::new(requests_per_minute)),
        })
    }
}

impl CompletionClientTrait for ProxyClient {
    /// @ai:intent Query the proxy, which applies the stop policy server-side
    /// @ai:effects network
    async fn complete(&self, prompt: &str, stop: &[&str]) -> Result<String, ClientError> {
        self.rate_limiter.acquire().await;

        // The proxy derives the stop list from isBlock; the fence stop marks
        // a block prompt.
        let request = ProxyRequest {
            prompt,
            is_block: stop.iter().any(|s| *s == "```"),
        };

        let url = format!("{}/api/explain", self.host_url);

        tracing::debug!("Sending proxied completion request to {}", url);

        let response = self.client.post(&url).json(&request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }

        let parsed: ProxyResponse = response.json().await?;
        Ok(parsed.output)
    }
}

/// @ai:intent Mock client for tests and dry runs
pub struct MockCompletionClient {
    response: String,
}

impl MockCompletionClient {
    /// @ai:intent Create a mock client that returns a fixed response
    /// @ai:effects pure
    pub fn new(response: String) -> Self {
        Self { response }
    }
}

impl CompletionClientTrait for MockCompletionClient {
    /// @ai:intent Return mock response
    /// @ai:effects pure
    async fn complete(&self, _prompt: &str, _stop: &[&str]) -> Result<String, ClientError> {
        Ok(self.response.clone())
    }
}
