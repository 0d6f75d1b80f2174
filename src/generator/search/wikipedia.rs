use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use super::{SearchDocument, SearchError, SearchSource};
use crate::config::SearchConfig;

const USER_AGENT: &str = concat!("deep-researcher/", env!("CARGO_PKG_VERSION"));

/// 基于MediaWiki API的知识库检索
pub struct WikipediaSearch {
    client: Client,
    language: String,
    max_docs: u32,
    max_doc_chars: usize,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    query: Option<SearchQueryBlock>,
}

#[derive(Deserialize)]
struct SearchQueryBlock {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Deserialize)]
struct ExtractResponse {
    #[serde(default)]
    query: Option<ExtractQueryBlock>,
}

#[derive(Deserialize)]
struct ExtractQueryBlock {
    #[serde(default)]
    pages: HashMap<String, ExtractPage>,
}

#[derive(Deserialize)]
struct ExtractPage {
    #[serde(default)]
    extract: String,
}

impl WikipediaSearch {
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            language: config.wikipedia_language.clone(),
            max_docs: config.wikipedia_max_docs,
            max_doc_chars: config.wikipedia_max_doc_chars,
        })
    }

    fn api_url(&self) -> String {
        format!("https://{}.wikipedia.org/w/api.php", self.language)
    }

    async fn get_json<T: for<'a> Deserialize<'a>>(
        &self,
        params: &[(&str, &str)],
    ) -> Result<T, SearchError> {
        let response = self
            .client
            .get(self.api_url())
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SearchError::ApiError {
                provider: "wikipedia",
                status: response.status(),
            });
        }

        Ok(response.json().await?)
    }

    async fn find_titles(&self, query: &str) -> Result<Vec<String>, SearchError> {
        let limit = self.max_docs.to_string();
        let body: SearchResponse = self
            .get_json(&[
                ("action", "query"),
                ("list", "search"),
                ("format", "json"),
                ("srsearch", query),
                ("srlimit", limit.as_str()),
            ])
            .await?;

        Ok(body
            .query
            .map(|q| q.search.into_iter().map(|hit| hit.title).collect())
            .unwrap_or_default())
    }

    async fn fetch_extract(&self, title: &str) -> Result<String, SearchError> {
        let body: ExtractResponse = self
            .get_json(&[
                ("action", "query"),
                ("prop", "extracts"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("format", "json"),
                ("titles", title),
            ])
            .await?;

        let extract = body
            .query
            .and_then(|q| q.pages.into_values().next())
            .map(|page| page.extract)
            .unwrap_or_default();
        Ok(truncate_chars(&extract, self.max_doc_chars))
    }
}

/// 条目标题对应的页面地址
fn page_url(language: &str, title: &str) -> String {
    format!(
        "https://{}.wikipedia.org/wiki/{}",
        language,
        title.replace(' ', "_")
    )
}

/// 按字符截断，避免切断多字节字符
fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// 逐条获取正文；单条失败跳过并告警，全部失败时返回最后一个错误
async fn gather_documents<F, Fut>(
    language: &str,
    titles: Vec<String>,
    fetch: F,
) -> Result<Vec<SearchDocument>, SearchError>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<String, SearchError>>,
{
    let mut documents = Vec::with_capacity(titles.len());
    let mut fetched = 0usize;
    let mut last_error = None;

    for title in titles {
        let content = match fetch(title.clone()).await {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("⚠️ [wikipedia] 获取条目「{}」失败，已跳过: {}", title, e);
                last_error = Some(e);
                continue;
            }
        };
        fetched += 1;
        if content.trim().is_empty() {
            continue;
        }
        documents.push(SearchDocument::wiki(page_url(language, &title), title, content));
    }

    match last_error {
        Some(e) if fetched == 0 => Err(e),
        _ => Ok(documents),
    }
}

#[async_trait]
impl SearchSource for WikipediaSearch {
    fn name(&self) -> &'static str {
        "wikipedia"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchDocument>, SearchError> {
        let titles = self.find_titles(query).await?;
        gather_documents(&self.language, titles, |title| async move {
            self.fetch_extract(&title).await
        })
        .await
    }
}
