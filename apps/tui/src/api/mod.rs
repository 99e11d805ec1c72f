// Fetch layer for the racing backend
// One trait seam so the refresh loop can run against HTTP or a stub

pub mod client;
pub mod decode;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{AiAnswer, MarketMover, OddsSnapshot, Prediction, Roughie};

pub use client::HttpFeedClient;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },
    #[error("malformed JSON from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type FetchResult<T> = Result<T, FetchError>;

/// The backend feeds. Every call is a single attempt with no retry.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_odds(&self) -> FetchResult<OddsSnapshot>;

    async fn fetch_market_movers(&self) -> FetchResult<Vec<MarketMover>>;

    async fn fetch_predictions(&self) -> FetchResult<Vec<Prediction>>;

    async fn fetch_roughies(&self) -> FetchResult<Vec<Roughie>>;

    async fn fetch_ai_prediction(&self, race_id: &str) -> FetchResult<AiAnswer>;

    async fn ask_ai_insights(&self, query: &str) -> FetchResult<AiAnswer>;
}

/// Feeds refreshed on every cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    Odds,
    MarketMovers,
    Predictions,
    Roughies,
}

impl Feed {
    pub const ALL: [Self; 4] = [
        Self::Odds,
        Self::MarketMovers,
        Self::Predictions,
        Self::Roughies,
    ];

    pub const fn path(self) -> &'static str {
        match self {
            Self::Odds => "/odds",
            Self::MarketMovers => "/market-movers",
            Self::Predictions => "/predictions",
            Self::Roughies => "/roughies",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Odds => "odds",
            Self::MarketMovers => "market movers",
            Self::Predictions => "predictions",
            Self::Roughies => "roughies",
        }
    }
}
