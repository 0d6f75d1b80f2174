use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::generator::context::GeneratorContext;
use crate::llm::client::utils::estimate_token_usage;

/// 单次LLM调用的参数
pub struct AgentExecuteParams {
    pub prompt_sys: String,
    pub prompt_user: String,
    /// 缓存分类，形如 `interview/question`
    pub cache_scope: String,
    /// 日志标签
    pub log_tag: String,
}

impl AgentExecuteParams {
    pub(crate) fn cache_key(&self) -> String {
        format!("{}\n---\n{}", self.prompt_sys, self.prompt_user)
    }
}

/// 调用LLM生成文本，命中缓存时直接返回
pub async fn prompt(context: &GeneratorContext, params: AgentExecuteParams) -> Result<String> {
    let cache_key = params.cache_key();
    if let Some(cached) = context
        .cache_manager
        .read()
        .await
        .get::<String>(&params.cache_scope, &cache_key)
        .await?
    {
        tracing::debug!("   ♻️ [{}] 使用缓存结果", params.log_tag);
        return Ok(cached);
    }

    tracing::debug!("   🤖 [{}] 正在调用模型...", params.log_tag);
    let reply = context
        .llm_client
        .prompt(&params.prompt_sys, &params.prompt_user)
        .await?;

    let token_usage = estimate_token_usage(&cache_key, &reply);
    context
        .cache_manager
        .write()
        .await
        .set_with_tokens(&params.cache_scope, &cache_key, &reply, Some(token_usage))
        .await?;

    Ok(reply)
}

/// 调用LLM提取结构化数据，命中缓存时直接返回
pub async fn extract<T>(context: &GeneratorContext, params: AgentExecuteParams) -> Result<T>
where
    T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static,
{
    let cache_key = params.cache_key();
    if let Some(cached) = context
        .cache_manager
        .read()
        .await
        .get::<T>(&params.cache_scope, &cache_key)
        .await?
    {
        tracing::debug!("   ♻️ [{}] 使用缓存结果", params.log_tag);
        return Ok(cached);
    }

    tracing::debug!("   🤖 [{}] 正在提取结构化结果...", params.log_tag);
    let result: T = context
        .llm_client
        .extract(&params.prompt_sys, &params.prompt_user)
        .await?;

    let output_text = serde_json::to_string(&result)?;
    let token_usage = estimate_token_usage(&cache_key, &output_text);
    context
        .cache_manager
        .write()
        .await
        .set_with_tokens(&params.cache_scope, &cache_key, &result, Some(token_usage))
        .await?;

    Ok(result)
}
