use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use super::decode::{
    decode_ai_prediction, decode_insights, decode_movers, decode_odds, decode_predictions,
    decode_roughies,
};
use super::{Feed, FeedSource, FetchError, FetchResult};
use crate::config::REQUEST_TIMEOUT;
use crate::domain::{AiAnswer, MarketMover, OddsSnapshot, Prediction, Roughie};

/// `reqwest` client for the racing backend
#[derive(Debug, Clone)]
pub struct HttpFeedClient {
    client: Client,
    base_url: String,
}

impl HttpFeedClient {
    pub fn new(base_url: &str) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_body(&self, path: &str) -> FetchResult<(String, Vec<u8>)> {
        let url = self.endpoint(path);
        debug!(event = "fetch.request", method = "GET", url = %url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                endpoint: url.clone(),
                source,
            })?;

        read_body(url, response).await
    }

    async fn post_body(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> FetchResult<(String, Vec<u8>)> {
        let url = self.endpoint(path);
        debug!(event = "fetch.request", method = "POST", url = %url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                endpoint: url.clone(),
                source,
            })?;

        read_body(url, response).await
    }
}

async fn read_body(url: String, response: reqwest::Response) -> FetchResult<(String, Vec<u8>)> {
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            endpoint: url,
            status: status.as_u16(),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|source| FetchError::Transport {
            endpoint: url.clone(),
            source,
        })?;

    Ok((url, bytes.to_vec()))
}

fn decoded<T>(endpoint: String, result: serde_json::Result<T>) -> FetchResult<T> {
    result.map_err(|source| FetchError::Decode { endpoint, source })
}

#[async_trait]
impl FeedSource for HttpFeedClient {
    async fn fetch_odds(&self) -> FetchResult<OddsSnapshot> {
        let (url, body) = self.get_body(Feed::Odds.path()).await?;
        decoded(url, decode_odds(&body))
    }

    async fn fetch_market_movers(&self) -> FetchResult<Vec<MarketMover>> {
        let (url, body) = self.get_body(Feed::MarketMovers.path()).await?;
        decoded(url, decode_movers(&body))
    }

    async fn fetch_predictions(&self) -> FetchResult<Vec<Prediction>> {
        let (url, body) = self.get_body(Feed::Predictions.path()).await?;
        decoded(url, decode_predictions(&body))
    }

    async fn fetch_roughies(&self) -> FetchResult<Vec<Roughie>> {
        let (url, body) = self.get_body(Feed::Roughies.path()).await?;
        decoded(url, decode_roughies(&body))
    }

    async fn fetch_ai_prediction(&self, race_id: &str) -> FetchResult<AiAnswer> {
        let path = format!("/ai-prediction/{}", urlencoding::encode(race_id));
        let (url, body) = self.get_body(&path).await?;
        decoded(url, decode_ai_prediction(&body))
    }

    async fn ask_ai_insights(&self, query: &str) -> FetchResult<AiAnswer> {
        let (url, body) = self
            .post_body("/ai-insights", &json!({ "query": query }))
            .await?;
        decoded(url, decode_insights(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_on_base_is_ignored() {
        let client = HttpFeedClient::new("http://localhost:8000/api/").expect("client");
        assert_eq!(
            client.endpoint(Feed::MarketMovers.path()),
            "http://localhost:8000/api/market-movers"
        );
    }
}
