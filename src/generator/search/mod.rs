//! 检索源：为专家回答提供网页与知识库上下文

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod web;
pub mod wikipedia;

/// 检索错误
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("missing API key for {0}")]
    MissingApiKey(&'static str),
    #[error("request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("{provider} returned HTTP {status}")]
    ApiError {
        provider: &'static str,
        status: reqwest::StatusCode,
    },
}

/// 文档来源类型，决定上下文中的渲染格式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DocumentKind {
    Web,
    Wiki,
}

/// 一篇检索得到的文档
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchDocument {
    pub kind: DocumentKind,
    /// 文档地址
    pub url: String,
    /// 页面标识，仅知识库文档使用
    pub page: String,
    pub content: String,
}

impl SearchDocument {
    pub fn web(url: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind: DocumentKind::Web,
            url: url.into(),
            page: String::new(),
            content: content.into(),
        }
    }

    pub fn wiki(
        url: impl Into<String>,
        page: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            kind: DocumentKind::Wiki,
            url: url.into(),
            page: page.into(),
            content: content.into(),
        }
    }

    /// 渲染为专家可引用的文档块
    pub fn render(&self) -> String {
        match self.kind {
            DocumentKind::Web => format!(
                "<Document href=\"{}\"/>\n{}\n</Document>",
                self.url, self.content
            ),
            DocumentKind::Wiki => format!(
                "<Document source=\"{}\" page=\"{}\"/>\n{}\n</Document>",
                self.url, self.page, self.content
            ),
        }
    }
}

/// 将检索结果拼接为一条上下文
pub fn format_documents(documents: &[SearchDocument]) -> String {
    documents
        .iter()
        .map(SearchDocument::render)
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

/// 检索源抽象
#[async_trait]
pub trait SearchSource: Send + Sync {
    /// 检索源名称，用于日志
    fn name(&self) -> &'static str;

    async fn search(&self, query: &str) -> Result<Vec<SearchDocument>, SearchError>;
}

/// 尽力而为的检索：查询为空或检索失败时记录告警并返回空上下文
pub async fn search_best_effort(source: &dyn SearchSource, query: &str) -> String {
    let query = query.trim();
    if query.is_empty() {
        tracing::warn!("⚠️ [{}] 检索语句为空，使用空上下文", source.name());
        return String::new();
    }

    match source.search(query).await {
        Ok(documents) => {
            tracing::debug!(
                "   🔎 [{}] 检索 \"{}\" 得到 {} 篇文档",
                source.name(),
                query,
                documents.len()
            );
            format_documents(&documents)
        }
        Err(e) => {
            tracing::warn!("⚠️ [{}] 检索 \"{}\" 失败，使用空上下文: {}", source.name(), query, e);
            String::new()
        }
    }
}
