// src/gateway.rs
//! Fetch gateway: a pass-through proxy that takes a target URL plus an
//! access key and returns the rendered page body. Marketplaces block or
//! throttle direct requests, so every adapter goes through it.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::config::GatewayConfig;
use crate::error::FetchCause;

#[async_trait]
pub trait FetchGateway: Send + Sync {
    /// Fetch `target_url` and return the response body.
    async fn fetch_page(&self, target_url: &str) -> Result<String, FetchCause>;
    fn name(&self) -> &'static str;
}

/// `GET {base}?api_key={key}&url={target}` against a ScraperAPI-style service.
#[derive(Clone)]
pub struct ScraperApiGateway {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl ScraperApiGateway {
    pub fn new(cfg: &GatewayConfig) -> Result<Self, reqwest::Error> {
        let timeout = cfg.timeout();
        let client = Client::builder()
            .user_agent(cfg.user_agent.clone())
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
            timeout,
        })
    }

    fn map_err(&self, e: reqwest::Error) -> FetchCause {
        if e.is_timeout() {
            return FetchCause::Timeout(self.timeout);
        }
        if let Some(status) = e.status() {
            return FetchCause::Status(status.as_u16());
        }
        // strip the request URL; it carries the access key
        FetchCause::Transport(e.without_url().to_string())
    }
}

#[async_trait]
impl FetchGateway for ScraperApiGateway {
    async fn fetch_page(&self, target_url: &str) -> Result<String, FetchCause> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[("api_key", self.api_key.as_str()), ("url", target_url)])
            .send()
            .await
            .map_err(|e| self.map_err(e))?;

        let status = resp.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), target_url, "gateway non-success");
            return Err(FetchCause::Status(status.as_u16()));
        }

        let body = resp.text().await.map_err(|e| self.map_err(e))?;
        tracing::debug!(target_url, bytes = body.len(), "gateway body received");
        Ok(body)
    }

    fn name(&self) -> &'static str {
        "scraperapi"
    }
}
