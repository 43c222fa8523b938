use crate::rate_limiter::RateLimiter;
use anyhow::{Context, Result, bail};
use reqwest::Client;
use std::time::Duration;

/// HTTP client with a per-request timeout and a minimum interval between requests
pub struct RateLimitedClient {
    client: Client,
    rate_limiter: RateLimiter,
}

impl RateLimitedClient {
    pub fn new(user_agent: &str, timeout_secs: u64, rate_limit_ms: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            rate_limiter: RateLimiter::new(rate_limit_ms),
        })
    }

    /// GET `url`, failing on non-success status
    pub async fn get_text(&self, url: &str) -> Result<String> {
        self.rate_limiter.wait().await;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        let status = response.status();
        if !status.is_success() {
            bail!("GET {} returned {}", url, status);
        }

        response.text().await.context("Failed to read response body")
    }
}
