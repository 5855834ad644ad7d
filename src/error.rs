// src/error.rs
use std::time::Duration;

use thiserror::Error;

use crate::marketplace::Marketplace;

/// Why a single marketplace fetch failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchCause {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("gateway returned HTTP {0}")]
    Status(u16),
    #[error("timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),
    #[error("could not parse page: {0}")]
    Parse(String),
}

impl FetchCause {
    /// Short label used as a metrics dimension.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchCause::Transport(_) => "transport",
            FetchCause::Status(_) => "status",
            FetchCause::Timeout(_) => "timeout",
            FetchCause::Parse(_) => "parse",
        }
    }
}

/// A failed adapter invocation; carries the source and the underlying cause.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{marketplace}: {cause}")]
pub struct FetchError {
    pub marketplace: Marketplace,
    #[source]
    pub cause: FetchCause,
}

impl FetchError {
    pub fn new(marketplace: Marketplace, cause: FetchCause) -> Self {
        Self { marketplace, cause }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("product name must not be empty")]
    Empty,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("gateway api key is missing (set SCRAPER_API_KEY)")]
    MissingApiKey,
    #[error("gateway base url must be http(s), got {0:?}")]
    InvalidBaseUrl(String),
    #[error("fetch timeout must be greater than zero")]
    ZeroTimeout,
    #[error("{0} points to non-existent path")]
    MissingFile(&'static str),
    #[error("invalid value for {name}: {value:?}")]
    InvalidEnv { name: &'static str, value: String },
    #[error("parsing config toml: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("reading config: {0}")]
    Io(#[from] std::io::Error),
}
