//! 离线测试工具：预置模型回复，使工作流在无网络时可完整运行

use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;

use crate::config::{CacheConfig, Config, LLMConfig};
use crate::generator::context::GeneratorContext;
use crate::generator::search::{SearchDocument, SearchError, SearchSource};
use crate::generator::step_forward_agent::StepForwardAgent;

/// 启用缓存、模型地址不可达的配置
pub(crate) fn offline_config(temp_dir: &TempDir) -> Config {
    Config {
        topic: Some("Urban air mobility".to_string()),
        output_path: temp_dir.path().join("output"),
        internal_path: temp_dir.path().join(".deep-researcher"),
        skip_connection_check: true,
        llm: LLMConfig {
            api_base_url: "http://127.0.0.1:9".to_string(),
            retry_attempts: 1,
            retry_delay_ms: 0,
            timeout_seconds: 2,
            ..Default::default()
        },
        cache: CacheConfig {
            enabled: true,
            cache_dir: temp_dir.path().join("cache"),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// 返回固定文档的检索源
pub(crate) struct StaticSource {
    pub docs: Vec<SearchDocument>,
}

#[async_trait]
impl SearchSource for StaticSource {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn search(&self, _query: &str) -> Result<Vec<SearchDocument>, SearchError> {
        Ok(self.docs.clone())
    }
}

pub(crate) fn offline_context(
    config: Config,
    web_docs: Vec<SearchDocument>,
    wiki_docs: Vec<SearchDocument>,
) -> GeneratorContext {
    GeneratorContext::with_search_sources(
        config,
        Arc::new(StaticSource { docs: web_docs }),
        Arc::new(StaticSource { docs: wiki_docs }),
    )
    .unwrap()
}

/// 按Agent对该输入的缓存键写入回复，之后的execute直接命中缓存
pub(crate) async fn seed_reply<A: StepForwardAgent>(
    context: &GeneratorContext,
    agent: &A,
    input: &A::Input,
    reply: &A::Output,
) {
    let (params, _) = agent.execute_params(context, input);
    context
        .cache_manager
        .write()
        .await
        .set_with_tokens(&params.cache_scope, &params.cache_key(), reply, None)
        .await
        .unwrap();
}
