use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{SearchDocument, SearchError, SearchSource};
use crate::config::SearchConfig;

/// Tavily网页检索
pub struct TavilySearch {
    client: Client,
    api_url: String,
    api_key: String,
    max_results: u32,
}

#[derive(Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    search_depth: &'a str,
    max_results: u32,
    include_answer: bool,
}

#[derive(Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Deserialize)]
struct TavilyResult {
    url: String,
    #[serde(default)]
    content: String,
}

impl TavilySearch {
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            api_url: config.tavily_api_url.clone(),
            api_key: config.tavily_api_key.clone(),
            max_results: config.web_max_results,
        })
    }
}

#[async_trait]
impl SearchSource for TavilySearch {
    fn name(&self) -> &'static str {
        "tavily"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchDocument>, SearchError> {
        if self.api_key.is_empty() {
            return Err(SearchError::MissingApiKey("tavily"));
        }

        let response = self
            .client
            .post(&self.api_url)
            .json(&TavilyRequest {
                api_key: &self.api_key,
                query,
                search_depth: "basic",
                max_results: self.max_results,
                include_answer: false,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SearchError::ApiError {
                provider: "tavily",
                status: response.status(),
            });
        }

        let body: TavilyResponse = response.json().await?;
        Ok(body
            .results
            .into_iter()
            .map(|r| SearchDocument::web(r.url, r.content))
            .collect())
    }
}
